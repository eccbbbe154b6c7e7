//! 도메인 모델.

pub mod daily_record;
pub mod period;
pub mod symbol;

pub use daily_record::DailyRecord;
pub use period::TargetPeriod;
pub use symbol::{CompanyDirectory, SymbolReference};
