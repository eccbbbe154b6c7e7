//! 수집 대상 기간.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use chrono_tz::Tz;

/// 한 번의 실행이 수집하는 날짜와 조회 연/월.
///
/// 연/월은 항상 `target_date`에서 파생됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetPeriod {
    pub target_date: NaiveDate,
    pub year: i32,
    pub month: u32,
}

impl TargetPeriod {
    /// 특정 날짜를 대상으로 생성
    pub fn for_date(target_date: NaiveDate) -> Self {
        Self {
            target_date,
            year: target_date.year(),
            month: target_date.month(),
        }
    }

    /// 주어진 타임존 기준 "어제"를 대상으로 생성
    ///
    /// `now`는 UTC 시각이며, 타임존 변환 후 하루를 뺍니다.
    pub fn yesterday_in(tz: Tz, now: DateTime<Utc>) -> Self {
        let local_today = now.with_timezone(&tz).date_naive();
        Self::for_date(local_today - Duration::days(1))
    }
}

impl std::fmt::Display for TargetPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}-{:02})", self.target_date, self.year, self.month)
    }
}
