//! 일시적 실패에 대한 재시도 정책.

use reqwest::{Method, StatusCode};
use std::io::ErrorKind;
use std::time::Duration;

/// `Retry-After` 헤더로 기다릴 수 있는 최대 시간
const MAX_RETRY_AFTER: Duration = Duration::from_secs(60);

/// 세션에 주입되는 재시도 정책.
///
/// 지연 시간은 `backoff_base * 2^retry` (retry는 0부터) 입니다.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// 최초 시도를 포함한 최대 시도 횟수
    pub max_attempts: u32,
    /// 첫 재시도 전 대기 시간
    pub backoff_base: Duration,
    /// 재시도 대상 HTTP 상태 코드
    pub retry_statuses: Vec<u16>,
    /// 재시도 허용 메서드
    pub retry_methods: Vec<Method>,
    /// 응답의 `Retry-After`(초) 반영 여부
    pub respect_retry_after: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            backoff_base: Duration::from_secs(1),
            retry_statuses: vec![429, 500, 502, 503, 504],
            retry_methods: vec![Method::HEAD, Method::GET, Method::OPTIONS, Method::POST],
            respect_retry_after: true,
        }
    }
}

impl RetryPolicy {
    /// 시도 횟수와 기본 대기 시간만 바꾼 정책
    pub fn with_backoff(max_attempts: u32, backoff_base: Duration) -> Self {
        Self {
            max_attempts,
            backoff_base,
            ..Self::default()
        }
    }

    pub fn should_retry_status(&self, status: StatusCode) -> bool {
        self.retry_statuses.contains(&status.as_u16())
    }

    pub fn allows_method(&self, method: &Method) -> bool {
        self.retry_methods.contains(method)
    }

    /// 재시도하면 성공할 수 있는 오류인지 확인.
    ///
    /// 연결 실패, 타임아웃, 연결 후 끊김(reset/abort/EOF)이 해당됩니다.
    pub fn is_transient(err: &reqwest::Error) -> bool {
        err.is_timeout() || err.is_connect() || is_dropped_connection(err)
    }

    /// `retry`번째(0부터) 재시도 전 대기 시간
    pub fn backoff_delay(&self, retry: u32) -> Duration {
        self.backoff_base
            .checked_mul(2u32.saturating_pow(retry))
            .unwrap_or(Duration::MAX)
    }

    /// 서버가 요구한 대기 시간과 백오프 중 큰 값
    pub fn delay_with_retry_after(&self, retry: u32, retry_after: Option<Duration>) -> Duration {
        let backoff = self.backoff_delay(retry);
        match retry_after {
            Some(wait) if self.respect_retry_after => backoff.max(wait.min(MAX_RETRY_AFTER)),
            _ => backoff,
        }
    }
}

/// 원인 체인에 끊긴 연결을 나타내는 I/O 오류가 있는지 확인
fn is_dropped_connection(err: &(dyn std::error::Error + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        if let Some(io) = e.downcast_ref::<std::io::Error>() {
            if is_dropped_io_kind(io.kind()) {
                return true;
            }
        }
        current = e.source();
    }
    false
}

fn is_dropped_io_kind(kind: ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted
            | ErrorKind::BrokenPipe
            | ErrorKind::UnexpectedEof
    )
}

/// `Retry-After: <seconds>` 헤더 파싱 (HTTP-date 형식은 무시)
pub(crate) fn parse_retry_after(headers: &reqwest::header::HeaderMap) -> Option<Duration> {
    headers
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}
