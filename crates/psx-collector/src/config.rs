//! 환경변수 기반 설정 모듈.

use crate::error::CollectorError;
use crate::Result;
use chrono_tz::Tz;
use psx_data::{RetryPolicy, SessionConfig};
use std::path::PathBuf;
use std::time::Duration;

/// Collector 전체 설정
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// 데이터 포털 접속 설정
    pub source: SourceConfig,
    /// 회사 디렉토리 설정
    pub directory: DirectoryConfig,
    /// 출력 설정
    pub output: OutputConfig,
    /// 일별 수집 설정
    pub daily_collect: DailyCollectConfig,
}

/// 데이터 포털 접속 설정
#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// 포털 기본 URL
    pub base_url: String,
    /// GET 타임아웃 (초)
    pub get_timeout_secs: u64,
    /// POST 타임아웃 (초)
    pub post_timeout_secs: u64,
    /// 최대 시도 횟수 (최초 포함)
    pub retry_max_attempts: u32,
    /// 첫 재시도 대기 시간 (밀리초)
    pub retry_backoff_ms: u64,
}

/// 회사 디렉토리 설정
#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    /// 디렉토리 CSV 경로
    pub company_list: PathBuf,
    /// 앞에서부터 N개 종목만 수집 (없으면 전체)
    pub symbol_limit: Option<usize>,
}

/// 출력 설정
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// 누적 CSV 경로
    pub csv_path: PathBuf,
}

/// 일별 수집 설정
#[derive(Debug, Clone)]
pub struct DailyCollectConfig {
    /// 종목 간 딜레이 (밀리초)
    pub request_delay_ms: u64,
    /// "어제"를 계산할 타임존
    pub timezone: Tz,
}

impl CollectorConfig {
    /// 환경변수에서 설정 로드 (`.env` 포함)
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 주어진 조회 함수로 설정 로드
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let timezone_name =
            lookup("PSX_TIMEZONE").unwrap_or_else(|| "Asia/Karachi".to_string());
        let timezone: Tz = timezone_name.parse().map_err(|e| {
            CollectorError::Config(format!("알 수 없는 타임존 {}: {}", timezone_name, e))
        })?;

        Ok(Self {
            source: SourceConfig {
                base_url: lookup("PSX_BASE_URL")
                    .unwrap_or_else(|| psx_data::provider::psx::DEFAULT_BASE_URL.to_string()),
                get_timeout_secs: parse_or(&lookup, "PSX_GET_TIMEOUT_SECS", 15),
                post_timeout_secs: parse_or(&lookup, "PSX_POST_TIMEOUT_SECS", 25),
                retry_max_attempts: parse_or(&lookup, "PSX_RETRY_MAX_ATTEMPTS", 5),
                retry_backoff_ms: parse_or(&lookup, "PSX_RETRY_BACKOFF_MS", 1000),
            },
            directory: DirectoryConfig {
                company_list: lookup("PSX_COMPANY_LIST")
                    .unwrap_or_else(|| "Companies_listed_PSX_Cleaned.csv".to_string())
                    .into(),
                symbol_limit: lookup("PSX_SYMBOL_LIMIT").and_then(|v| v.parse().ok()),
            },
            output: OutputConfig {
                csv_path: lookup("PSX_OUTPUT_CSV")
                    .unwrap_or_else(|| "PSX_Historical_update.csv".to_string())
                    .into(),
            },
            daily_collect: DailyCollectConfig {
                request_delay_ms: parse_or(&lookup, "PSX_REQUEST_DELAY_MS", 300),
                timezone,
            },
        })
    }
}

impl SourceConfig {
    /// HTTP 세션 설정으로 변환
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            base_url: self.base_url.clone(),
            retry: RetryPolicy::with_backoff(
                self.retry_max_attempts,
                Duration::from_millis(self.retry_backoff_ms),
            ),
            get_timeout: Duration::from_secs(self.get_timeout_secs),
            post_timeout: Duration::from_secs(self.post_timeout_secs),
            ..SessionConfig::default()
        }
    }
}

impl DailyCollectConfig {
    /// 종목 간 딜레이를 Duration으로 반환
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }
}

/// 값을 파싱 (없거나 실패 시 기본값 사용)
fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> T {
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<CollectorConfig> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        CollectorConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();

        assert_eq!(config.source.base_url, "https://dps.psx.com.pk");
        assert_eq!(config.directory.company_list, PathBuf::from("Companies_listed_PSX_Cleaned.csv"));
        assert_eq!(config.directory.symbol_limit, None);
        assert_eq!(config.output.csv_path, PathBuf::from("PSX_Historical_update.csv"));
        assert_eq!(config.daily_collect.request_delay(), Duration::from_millis(300));
        assert_eq!(config.daily_collect.timezone, chrono_tz::Asia::Karachi);

        let session = config.source.session_config();
        assert_eq!(session.get_timeout, Duration::from_secs(15));
        assert_eq!(session.post_timeout, Duration::from_secs(25));
        assert_eq!(session.retry.max_attempts, 5);
        assert_eq!(session.retry.backoff_base, Duration::from_secs(1));
    }

    #[test]
    fn test_overrides_and_invalid_numbers() {
        let config = load(&[
            ("PSX_BASE_URL", "http://127.0.0.1:9000"),
            ("PSX_REQUEST_DELAY_MS", "not-a-number"),
            ("PSX_SYMBOL_LIMIT", "5"),
            ("PSX_RETRY_MAX_ATTEMPTS", "2"),
        ])
        .unwrap();

        assert_eq!(config.source.base_url, "http://127.0.0.1:9000");
        assert_eq!(config.daily_collect.request_delay_ms, 300);
        assert_eq!(config.directory.symbol_limit, Some(5));
        assert_eq!(config.source.session_config().retry.max_attempts, 2);
    }

    #[test]
    fn test_unknown_timezone_is_error() {
        let result = load(&[("PSX_TIMEZONE", "Mars/Olympus")]);
        assert!(matches!(result, Err(CollectorError::Config(_))));
    }
}
