//! 종목 기준 정보와 회사 디렉토리.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 종목 기준 정보 (디렉토리의 한 행).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolReference {
    /// 종목 코드 (예: OGDC, HBL)
    #[serde(rename = "Symbol")]
    pub symbol: String,
    /// 회사명
    #[serde(rename = "Company Name")]
    pub company_name: String,
    /// 섹터
    #[serde(rename = "Sector")]
    pub sector: String,
}

impl SymbolReference {
    pub fn new(
        symbol: impl Into<String>,
        company_name: impl Into<String>,
        sector: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            company_name: company_name.into(),
            sector: sector.into(),
        }
    }
}

/// 회사 디렉토리.
///
/// 기준 목록의 순서를 유지하며, 같은 종목이 여러 번 나오면 첫 번째 항목만 사용합니다.
#[derive(Debug, Clone, Default)]
pub struct CompanyDirectory {
    entries: Vec<SymbolReference>,
    index: HashMap<String, usize>,
}

impl CompanyDirectory {
    /// 기준 정보 목록으로 디렉토리 생성
    pub fn from_entries(entries: impl IntoIterator<Item = SymbolReference>) -> Self {
        let mut directory = Self::default();
        for entry in entries {
            if directory.index.contains_key(&entry.symbol) {
                tracing::warn!(symbol = %entry.symbol, "중복 종목 무시");
                continue;
            }
            directory
                .index
                .insert(entry.symbol.clone(), directory.entries.len());
            directory.entries.push(entry);
        }
        directory
    }

    /// 종목 코드로 기준 정보 조회
    pub fn lookup(&self, symbol: &str) -> Option<&SymbolReference> {
        self.index.get(symbol).map(|&i| &self.entries[i])
    }

    /// 기준 목록 순서대로 종목 코드 반환
    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.symbol.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 주어진 종목만 남김 (기준 목록 순서 유지)
    pub fn retain_symbols(&mut self, symbols: &[String]) {
        self.entries.retain(|e| symbols.iter().any(|s| s == &e.symbol));
        self.rebuild_index();
    }

    /// 앞에서부터 `limit`개 종목만 남김
    pub fn truncate(&mut self, limit: usize) {
        self.entries.truncate(limit);
        self.rebuild_index();
    }

    fn rebuild_index(&mut self) {
        self.index = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.symbol.clone(), i))
            .collect();
    }
}
