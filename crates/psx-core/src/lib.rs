//! # PSX Core
//!
//! PSX 일별 시세 수집기의 핵심 도메인 모델을 제공합니다.
//!
//! - 일별 OHLCV 레코드 (`DailyRecord`)
//! - 종목 기준 정보 및 회사 디렉토리 (`SymbolReference`, `CompanyDirectory`)
//! - 수집 대상 기간 (`TargetPeriod`)
//! - 로깅 인프라

pub mod domain;
pub mod logging;

pub use domain::*;
pub use logging::*;
