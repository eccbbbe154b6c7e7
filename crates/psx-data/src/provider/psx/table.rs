//! 과거 시세 HTML 테이블 파서.
//!
//! 포털 응답의 `tbody.tbl__body` 행은 `[Date, Open, High, Low, Close, Volume]`
//! 6개 셀로 구성됩니다. 형식이 맞지 않는 행은 오류가 아니라 `SkipReason`으로 보고됩니다.

use chrono::NaiveDate;
use psx_core::DailyRecord;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use scraper::{Html, Selector};
use std::str::FromStr;
use thiserror::Error;

/// 결과 테이블 행 셀렉터
const ROW_SELECTOR: &str = "tbody.tbl__body tr";

/// 한 행의 셀 수
pub const CELLS_PER_ROW: usize = 6;

/// 날짜 셀에 허용하는 형식 (앞에서부터 시도)
const DATE_FORMATS: &[&str] = &[
    "%b %d, %Y", // Mar 5, 2024
    "%B %d, %Y", // March 5, 2024
    "%d %b %Y",  // 05 Mar 2024
    "%d %B %Y",  // 05 March 2024
    "%d-%b-%Y",  // 05-Mar-2024
    "%Y-%m-%d",  // 2024-03-05
    "%Y/%m/%d",  // 2024/03/05
    "%m/%d/%Y",  // 03/05/2024
];

/// 행을 건너뛴 이유.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    /// 셀 수가 6개가 아님 (헤더/푸터/빈 결과 행 등)
    #[error("expected 6 cells, found {0}")]
    CellCount(usize),

    /// 날짜 셀 파싱 실패
    #[error("unparseable date: {0:?}")]
    InvalidDate(String),

    /// 대상 일자가 아님
    #[error("date {0} is not the target date")]
    DateMismatch(NaiveDate),

    /// 숫자 셀 파싱 실패 또는 음수
    #[error("invalid {field}: {value:?}")]
    InvalidNumber { field: &'static str, value: String },
}

/// 테이블 한 행의 원본 셀 텍스트.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTableRow {
    pub date: String,
    pub open: String,
    pub high: String,
    pub low: String,
    pub close: String,
    pub volume: String,
}

impl RawTableRow {
    /// 셀 텍스트 목록에서 생성 (정확히 6개여야 함)
    pub fn from_cells(cells: &[String]) -> Result<Self, SkipReason> {
        match cells {
            [date, open, high, low, close, volume] => Ok(Self {
                date: date.clone(),
                open: strip_thousands(open),
                high: strip_thousands(high),
                low: strip_thousands(low),
                close: strip_thousands(close),
                volume: strip_thousands(volume),
            }),
            _ => Err(SkipReason::CellCount(cells.len())),
        }
    }

    /// 대상 일자의 레코드로 변환.
    ///
    /// 날짜 검사가 숫자 변환보다 먼저 수행됩니다.
    pub fn into_record(self, symbol: &str, target_date: NaiveDate) -> Result<DailyRecord, SkipReason> {
        let date =
            parse_table_date(&self.date).ok_or_else(|| SkipReason::InvalidDate(self.date.clone()))?;

        if date != target_date {
            return Err(SkipReason::DateMismatch(date));
        }

        Ok(DailyRecord::new(
            symbol,
            date,
            parse_price("Open", &self.open)?,
            parse_price("High", &self.high)?,
            parse_price("Low", &self.low)?,
            parse_price("Close", &self.close)?,
            parse_volume(&self.volume)?,
        ))
    }
}

/// 건너뛴 행 (행 번호는 0부터).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    pub index: usize,
    pub reason: SkipReason,
}

/// 테이블 파싱 결과.
#[derive(Debug, Clone, Default)]
pub struct DayTable {
    pub records: Vec<DailyRecord>,
    pub skipped: Vec<SkippedRow>,
}

/// 셀 텍스트 목록 하나를 레코드로 파싱
pub fn parse_row(
    cells: &[String],
    symbol: &str,
    target_date: NaiveDate,
) -> Result<DailyRecord, SkipReason> {
    RawTableRow::from_cells(cells)?.into_record(symbol, target_date)
}

/// HTML 문서에서 결과 테이블 행의 셀 텍스트를 추출
pub fn extract_rows(html: &str) -> Vec<Vec<String>> {
    let document = Html::parse_document(html);

    let row_selector = match Selector::parse(ROW_SELECTOR) {
        Ok(s) => s,
        Err(_) => return Vec::new(),
    };
    let cell_selector = match Selector::parse("td") {
        Ok(s) => s,
        Err(_) => return Vec::new(),
    };

    document
        .select(&row_selector)
        .map(|tr| {
            tr.select(&cell_selector)
                .map(|td| td.text().map(str::trim).collect::<String>())
                .collect()
        })
        .collect()
}

/// HTML 응답 전체를 파싱해 대상 일자의 레코드만 추출
pub fn parse_history_table(html: &str, symbol: &str, target_date: NaiveDate) -> DayTable {
    let mut table = DayTable::default();

    for (index, cells) in extract_rows(html).iter().enumerate() {
        match parse_row(cells, symbol, target_date) {
            Ok(record) => table.records.push(record),
            Err(reason) => table.skipped.push(SkippedRow { index, reason }),
        }
    }

    table
}

/// 날짜 셀 파싱 (여러 형식 허용)
pub fn parse_table_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
}

/// 천 단위 구분자 제거
fn strip_thousands(text: &str) -> String {
    text.trim().replace(',', "")
}

/// 가격 셀 파싱 (음수 불가)
fn parse_price(field: &'static str, text: &str) -> Result<Decimal, SkipReason> {
    match Decimal::from_str(text) {
        Ok(value) if !value.is_sign_negative() => Ok(value),
        _ => Err(SkipReason::InvalidNumber {
            field,
            value: text.to_string(),
        }),
    }
}

/// 거래량 셀 파싱.
///
/// "1234.0" 같은 소수 표기를 허용하며 소수점 이하는 버립니다.
fn parse_volume(text: &str) -> Result<i64, SkipReason> {
    Decimal::from_str(text)
        .ok()
        .filter(|v| !v.is_sign_negative())
        .and_then(|v| v.trunc().to_i64())
        .ok_or_else(|| SkipReason::InvalidNumber {
            field: "Volume",
            value: text.to_string(),
        })
}
