//! 종목별 일별 시세 조회.
//!
//! 포털은 세션 상태에 의존하므로 반드시 아래 순서를 따릅니다:
//! 1. `GET /historical` 로 세션 쿠키 확보
//! 2. `POST /historical` (symbol, year, month) 로 해당 월 전체 테이블 조회
//! 3. 테이블에서 대상 일자 행만 추출

use super::session::PsxSession;
use super::table::{parse_history_table, DayTable};
use crate::error::{DataError, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use psx_core::DailyRecord;
use tracing::{debug, instrument, warn};

/// 종목 하나의 일별 테이블 조회 소스.
#[async_trait]
pub trait DailyTableSource: Send + Sync {
    /// 대상 일자의 레코드와 건너뛴 행 목록 조회
    async fn fetch_table(
        &self,
        symbol: &str,
        year: i32,
        month: u32,
        target_date: NaiveDate,
    ) -> Result<DayTable>;
}

#[async_trait]
impl DailyTableSource for PsxSession {
    async fn fetch_table(
        &self,
        symbol: &str,
        year: i32,
        month: u32,
        target_date: NaiveDate,
    ) -> Result<DayTable> {
        try_fetch_day(self, symbol, year, month, target_date).await
    }
}

/// 대상 일자의 레코드와 건너뛴 행 목록을 조회.
///
/// 요청 실패나 2xx가 아닌 응답은 `Err`로 반환됩니다.
/// 형식이 맞지 않는 행은 오류가 아니며 `DayTable::skipped`에 담깁니다.
#[instrument(skip(session), fields(url = %session.historical_url()))]
pub async fn try_fetch_day(
    session: &PsxSession,
    symbol: &str,
    year: i32,
    month: u32,
    target_date: NaiveDate,
) -> Result<DayTable> {
    let response = session.get_historical().await?;
    if !response.status().is_success() {
        return Err(DataError::HttpStatus {
            step: "GET",
            status: response.status(),
        });
    }

    let form = [
        ("symbol", symbol.to_string()),
        ("year", year.to_string()),
        ("month", month.to_string()),
    ];
    let response = session.post_historical(&form).await?;
    if !response.status().is_success() {
        return Err(DataError::HttpStatus {
            step: "POST",
            status: response.status(),
        });
    }

    let html = response
        .text()
        .await
        .map_err(|e| DataError::RequestFailed {
            step: "POST",
            source: e,
        })?;

    let table = parse_history_table(&html, symbol, target_date);

    for skipped in &table.skipped {
        debug!(row = skipped.index, reason = %skipped.reason, "행 건너뜀");
    }
    debug!(
        records = table.records.len(),
        skipped = table.skipped.len(),
        "테이블 파싱 완료"
    );

    Ok(table)
}

/// 대상 일자의 레코드 조회.
///
/// 모든 실패는 경고 로그만 남기고 빈 목록을 반환하므로 배치를 중단시키지 않습니다.
pub async fn fetch_day(
    session: &PsxSession,
    symbol: &str,
    year: i32,
    month: u32,
    target_date: NaiveDate,
) -> Vec<DailyRecord> {
    match try_fetch_day(session, symbol, year, month, target_date).await {
        Ok(table) => table.records,
        Err(e) => {
            warn!(
                symbol,
                period = %format!("{}/{}", month, year),
                error = %e,
                "일별 시세 조회 실패"
            );
            Vec::new()
        }
    }
}
