//! 일별 OHLCV 레코드.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 한 종목의 하루치 시세.
///
/// 필드 순서가 곧 CSV 컬럼 순서입니다:
/// `Date, Open, High, Low, Close, Volume, Year, Month, Symbol, Sector, Company Name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DailyRecord {
    /// 거래일
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    /// 시가
    #[serde(rename = "Open")]
    pub open: Decimal,
    /// 고가
    #[serde(rename = "High")]
    pub high: Decimal,
    /// 저가
    #[serde(rename = "Low")]
    pub low: Decimal,
    /// 종가
    #[serde(rename = "Close")]
    pub close: Decimal,
    /// 거래량
    #[serde(rename = "Volume")]
    pub volume: i64,
    /// 연도 (거래일 기준)
    #[serde(rename = "Year")]
    pub year: i32,
    /// 월 (거래일 기준)
    #[serde(rename = "Month")]
    pub month: u32,
    /// 종목 코드
    #[serde(rename = "Symbol")]
    pub symbol: String,
    /// 섹터 (디렉토리에 없으면 None)
    #[serde(rename = "Sector")]
    pub sector: Option<String>,
    /// 회사명 (디렉토리에 없으면 None)
    #[serde(rename = "Company Name")]
    pub company_name: Option<String>,
}

impl DailyRecord {
    /// 새 레코드 생성.
    ///
    /// 연도/월은 요청 파라미터가 아니라 `date`에서 파생됩니다.
    pub fn new(
        symbol: impl Into<String>,
        date: NaiveDate,
        open: Decimal,
        high: Decimal,
        low: Decimal,
        close: Decimal,
        volume: i64,
    ) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
            year: date.year(),
            month: date.month(),
            symbol: symbol.into(),
            sector: None,
            company_name: None,
        }
    }

    /// 섹터/회사명 메타데이터 설정
    pub fn with_metadata(mut self, sector: Option<String>, company_name: Option<String>) -> Self {
        self.sector = sector;
        self.company_name = company_name;
        self
    }

    /// 배치 내 정렬/중복 판정 키 (종목, 거래일)
    pub fn key(&self) -> (&str, NaiveDate) {
        (&self.symbol, self.date)
    }
}
