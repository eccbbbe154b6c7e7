//! 데이터 모듈 오류 타입.

use thiserror::Error;

/// 데이터 관련 오류.
#[derive(Debug, Error)]
pub enum DataError {
    /// HTTP 클라이언트 오류 (요청 생성, 본문 읽기 등)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// 재시도 후에도 요청 실패
    #[error("{step} request failed: {source}")]
    RequestFailed {
        step: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// 2xx가 아닌 응답
    #[error("{step} returned HTTP {status}")]
    HttpStatus {
        step: &'static str,
        status: reqwest::StatusCode,
    },

    /// CSV 읽기/쓰기 오류
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// 파일 입출력 오류
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// 설정 오류
    #[error("Configuration error: {0}")]
    Config(String),

    /// 잘못된 데이터 형식
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

pub type Result<T> = std::result::Result<T, DataError>;
