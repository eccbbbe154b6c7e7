//! PSX 일별 시세 수집기.
//!
//! cron 등으로 하루 한 번 실행되어 다음을 수행합니다:
//! - 회사 디렉토리의 종목별로 전일(PKT) 시세 조회
//! - 정렬/중복 제거/섹터·회사명 결합
//! - 누적 CSV 파일에 저장 (최초 생성 또는 이어쓰기)

pub mod config;
pub mod error;
pub mod modules;
pub mod stats;

pub use config::CollectorConfig;
pub use error::{CollectorError, Result};
pub use stats::CollectionStats;
