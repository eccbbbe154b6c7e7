//! 에러 타입 정의.

use psx_data::DataError;
use std::fmt;

/// Collector 에러 타입
#[derive(Debug)]
pub enum CollectorError {
    /// 설정 에러
    Config(String),
    /// 회사 디렉토리 로드 실패
    Directory(DataError),
    /// HTTP 세션 생성 실패
    Session(DataError),
    /// 저장소 쓰기 실패
    Sink(DataError),
}

impl fmt::Display for CollectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "Configuration error: {}", msg),
            Self::Directory(e) => write!(f, "Company directory error: {}", e),
            Self::Session(e) => write!(f, "Session error: {}", e),
            Self::Sink(e) => write!(f, "Sink error: {}", e),
        }
    }
}

impl std::error::Error for CollectorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Directory(e) | Self::Session(e) | Self::Sink(e) => Some(e),
            Self::Config(_) => None,
        }
    }
}

/// Result 타입 별칭
pub type Result<T> = std::result::Result<T, CollectorError>;
