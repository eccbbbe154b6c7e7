//! PSX 데이터 포털 (dps.psx.com.pk) 과거 시세 Provider.
//!
//! ```rust,ignore
//! let session = create_session(SessionConfig::default())?;
//! let records = fetch_day(&session, "OGDC", 2024, 3, date).await;
//! ```

pub mod fetcher;
pub mod retry;
pub mod session;
pub mod table;

pub use fetcher::{fetch_day, try_fetch_day, DailyTableSource};
pub use retry::RetryPolicy;
pub use session::{create_session, PsxSession, SessionConfig, DEFAULT_BASE_URL};
pub use table::{
    parse_history_table, parse_row, parse_table_date, DayTable, RawTableRow, SkipReason,
    SkippedRow,
};
