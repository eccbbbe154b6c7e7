//! PSX 데이터 포털 HTTP 세션.
//!
//! 과거 시세 페이지는 GET으로 받은 세션 쿠키가 있어야 POST 조회에 응답하므로
//! 쿠키 저장소를 가진 하나의 `reqwest::Client`를 전체 실행 동안 재사용합니다.

use super::retry::{parse_retry_after, RetryPolicy};
use crate::error::{DataError, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONNECTION, REFERER};
use reqwest::{Client, Request, Response};
use std::time::Duration;
use tracing::warn;

/// PSX 데이터 포털 기본 URL.
pub const DEFAULT_BASE_URL: &str = "https://dps.psx.com.pk";

/// 과거 시세 페이지 경로.
const HISTORICAL_PATH: &str = "/historical";

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64)";

const ACCEPT_HTML: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";

/// 세션 설정.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// 포털 기본 URL (테스트에서는 mock 서버 주소)
    pub base_url: String,
    pub user_agent: String,
    /// 재시도 정책
    pub retry: RetryPolicy,
    /// 세션 확립 GET 타임아웃
    pub get_timeout: Duration,
    /// 데이터 조회 POST 타임아웃
    pub post_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            retry: RetryPolicy::default(),
            get_timeout: Duration::from_secs(15),
            post_timeout: Duration::from_secs(25),
        }
    }
}

impl SessionConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

/// 재사용 가능한 PSX 세션.
#[derive(Debug, Clone)]
pub struct PsxSession {
    client: Client,
    historical_url: String,
    retry: RetryPolicy,
    get_timeout: Duration,
    post_timeout: Duration,
}

/// 세션 생성.
///
/// 네트워크 요청은 하지 않으며, 실패는 개별 요청 시점에 드러납니다.
pub fn create_session(config: SessionConfig) -> Result<PsxSession> {
    PsxSession::new(config)
}

impl PsxSession {
    pub fn new(config: SessionConfig) -> Result<Self> {
        let historical_url = format!(
            "{}{}",
            config.base_url.trim_end_matches('/'),
            HISTORICAL_PATH
        );

        let mut headers = HeaderMap::new();
        headers.insert(
            REFERER,
            HeaderValue::from_str(&historical_url)
                .map_err(|e| DataError::Config(format!("잘못된 Referer: {}", e)))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
        headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));

        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .cookie_store(true)
            .build()?;

        Ok(Self {
            client,
            historical_url,
            retry: config.retry,
            get_timeout: config.get_timeout,
            post_timeout: config.post_timeout,
        })
    }

    /// 과거 시세 페이지 URL
    pub fn historical_url(&self) -> &str {
        &self.historical_url
    }

    /// 세션 확립용 GET
    pub async fn get_historical(&self) -> Result<Response> {
        let request = self
            .client
            .get(&self.historical_url)
            .timeout(self.get_timeout)
            .build()?;
        self.execute(request, "GET").await
    }

    /// 월별 시세 조회 POST
    pub async fn post_historical(&self, form: &[(&str, String)]) -> Result<Response> {
        let request = self
            .client
            .post(&self.historical_url)
            .form(form)
            .timeout(self.post_timeout)
            .build()?;
        self.execute(request, "POST").await
    }

    /// 재시도 정책을 적용해 요청 실행.
    ///
    /// 재시도 대상 상태 코드로 시도 횟수를 모두 소진하면 마지막 응답을 그대로 반환합니다.
    pub async fn execute(&self, request: Request, step: &'static str) -> Result<Response> {
        let max_attempts = if self.retry.allows_method(request.method()) {
            self.retry.max_attempts.max(1)
        } else {
            1
        };

        let mut attempt = 1;
        loop {
            let current = request.try_clone().ok_or_else(|| {
                DataError::InvalidData(format!("{} 요청을 복제할 수 없습니다", step))
            })?;
            let is_last = attempt >= max_attempts;

            let retry_after = match self.client.execute(current).await {
                Ok(response) if !is_last && self.retry.should_retry_status(response.status()) => {
                    warn!(
                        step,
                        attempt,
                        status = %response.status(),
                        "재시도 대상 응답"
                    );
                    parse_retry_after(response.headers())
                }
                Ok(response) => return Ok(response),
                Err(e) if !is_last && RetryPolicy::is_transient(&e) => {
                    warn!(step, attempt, error = %e, "일시적 요청 실패");
                    None
                }
                Err(e) => return Err(DataError::RequestFailed { step, source: e }),
            };

            tokio::time::sleep(self.retry.delay_with_retry_after(attempt - 1, retry_after)).await;
            attempt += 1;
        }
    }
}
