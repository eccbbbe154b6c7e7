//! 데이터 Provider 모듈.
//!
//! ## PSX 데이터 포털
//! - `PsxSession`: 쿠키/헤더/재시도 정책을 가진 재사용 세션
//! - `fetch_day`: 종목 하나의 특정 일자 시세 조회
//!
//! ## 회사 디렉토리
//! - `CompanyDirectoryProvider`: 수집 대상 종목 목록 제공 trait
//! - `CsvCompanyDirectory`: CSV 파일 기반 구현

pub mod directory;
pub mod psx;

pub use directory::{CompanyDirectoryProvider, CsvCompanyDirectory};
