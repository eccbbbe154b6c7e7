//! 회사 디렉토리 Provider.
//!
//! 수집 대상 종목과 섹터/회사명 기준 정보를 제공합니다.

use crate::error::{DataError, Result};
use psx_core::{CompanyDirectory, SymbolReference};
use std::path::{Path, PathBuf};

/// 회사 디렉토리 Provider trait.
pub trait CompanyDirectoryProvider {
    /// Provider 이름 (로그용)
    fn name(&self) -> &str;

    /// 전체 디렉토리 로드
    fn load(&self) -> Result<CompanyDirectory>;
}

/// CSV 파일 기반 디렉토리.
///
/// 헤더는 `Symbol`, `Company Name`, `Sector` 이며 다른 컬럼은 무시합니다.
#[derive(Debug, Clone)]
pub struct CsvCompanyDirectory {
    path: PathBuf,
}

impl CsvCompanyDirectory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CompanyDirectoryProvider for CsvCompanyDirectory {
    fn name(&self) -> &str {
        "csv"
    }

    fn load(&self) -> Result<CompanyDirectory> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(&self.path)?;

        let mut entries = Vec::new();
        for row in reader.deserialize::<SymbolReference>() {
            let entry = row?;
            // 빈 종목 코드 행 무시
            if entry.symbol.is_empty() {
                continue;
            }
            entries.push(entry);
        }

        if entries.is_empty() {
            return Err(DataError::InvalidData(format!(
                "회사 디렉토리에 종목이 없습니다: {}",
                self.path.display()
            )));
        }

        tracing::info!(
            path = %self.path.display(),
            count = entries.len(),
            "회사 디렉토리 로드 완료"
        );

        Ok(CompanyDirectory::from_entries(entries))
    }
}
