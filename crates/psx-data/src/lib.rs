//! PSX 데이터 수집 및 저장.
//!
//! 이 crate는 다음을 제공합니다:
//! - PSX 데이터 포털 HTTP 세션 (재시도 정책 포함)
//! - 과거 시세 HTML 테이블 파서
//! - 종목별 일별 시세 조회 (GET → POST 2단계 프로토콜)
//! - 회사 디렉토리 로더
//! - CSV 저장소 (신규 생성 / 이어쓰기)

pub mod error;
pub mod provider;
pub mod storage;

pub use error::{DataError, Result};

pub use provider::psx::{
    create_session, fetch_day, try_fetch_day, DailyTableSource, DayTable, PsxSession,
    RetryPolicy, SessionConfig, SkipReason, SkippedRow,
};
pub use provider::{CompanyDirectoryProvider, CsvCompanyDirectory};
pub use storage::csv_sink::{deliver, CsvFileSink, Delivery, TabularSink};
