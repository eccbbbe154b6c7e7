//! 데이터 수집 모듈.

pub mod daily_collect;

pub use daily_collect::{
    build_batch, collect_daily, deliver_batch, run_daily, DailyCollection, RunOptions,
};
