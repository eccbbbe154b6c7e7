//! 이어쓰기 전용 CSV 저장소.
//!
//! 대상 파일이 없으면 헤더와 함께 생성하고, 있으면 헤더 없이 행만 덧붙입니다.
//! 덧붙이기는 내용을 확인하지 않으므로 같은 배치를 두 번 전달하면 행이 중복됩니다.

use crate::error::Result;
use serde::Serialize;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

/// 표 형식 레코드 저장소.
pub trait TabularSink {
    /// 대상이 이미 존재하는지 확인
    fn exists(&self) -> bool;

    /// 헤더와 함께 새로 생성
    fn create_with_header<T: Serialize>(&mut self, records: &[T]) -> Result<()>;

    /// 헤더 없이 덧붙이기
    fn append<T: Serialize>(&mut self, records: &[T]) -> Result<()>;
}

/// 전달 결과.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// 새로 생성 (행 수)
    Created(usize),
    /// 기존 대상에 덧붙임 (행 수)
    Appended(usize),
}

/// 배치를 저장소에 전달.
///
/// 대상이 없으면 생성, 있으면 덧붙이기.
pub fn deliver<S: TabularSink, T: Serialize>(sink: &mut S, records: &[T]) -> Result<Delivery> {
    if sink.exists() {
        sink.append(records)?;
        Ok(Delivery::Appended(records.len()))
    } else {
        sink.create_with_header(records)?;
        Ok(Delivery::Created(records.len()))
    }
}

/// CSV 파일 저장소.
#[derive(Debug, Clone)]
pub struct CsvFileSink {
    path: PathBuf,
}

impl CsvFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TabularSink for CsvFileSink {
    fn exists(&self) -> bool {
        self.path.exists()
    }

    fn create_with_header<T: Serialize>(&mut self, records: &[T]) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(true)
            .from_path(&self.path)?;

        for record in records {
            writer.serialize(record)?;
        }
        writer.flush()?;

        Ok(())
    }

    fn append<T: Serialize>(&mut self, records: &[T]) -> Result<()> {
        let file = OpenOptions::new().append(true).open(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        for record in records {
            writer.serialize(record)?;
        }
        writer.flush()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use psx_core::DailyRecord;
    use rust_decimal_macros::dec;

    const HEADER: &str = "Date,Open,High,Low,Close,Volume,Year,Month,Symbol,Sector,Company Name";

    fn sample() -> Vec<DailyRecord> {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        vec![
            DailyRecord::new("ABC", date, dec!(100.50), dec!(105.00), dec!(99.00), dec!(102.25), 1_000_000)
                .with_metadata(Some("BANKS".to_string()), Some("Abc Bank, Ltd".to_string())),
            DailyRecord::new("XYZ", date, dec!(10), dec!(11), dec!(9), dec!(10.5), 500),
        ]
    }

    #[test]
    fn test_create_then_append() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = CsvFileSink::new(dir.path().join("out.csv"));
        let records = sample();

        assert!(!sink.exists());
        assert_eq!(deliver(&mut sink, &records).unwrap(), Delivery::Created(2));
        assert!(sink.exists());

        let content = std::fs::read_to_string(sink.path()).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], HEADER);
        assert_eq!(
            lines[1],
            "2024-03-05,100.50,105.00,99.00,102.25,1000000,2024,3,ABC,BANKS,\"Abc Bank, Ltd\""
        );
        assert_eq!(lines[2], "2024-03-05,10,11,9,10.5,500,2024,3,XYZ,,");

        assert_eq!(deliver(&mut sink, &records[..1]).unwrap(), Delivery::Appended(1));
        let content = std::fs::read_to_string(sink.path()).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines.iter().filter(|l| **l == HEADER).count(), 1);
        assert_eq!(lines[3], lines[1]);
    }

    #[test]
    fn test_same_batch_twice_duplicates_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let records = sample();

        deliver(&mut CsvFileSink::new(&path), &records).unwrap();
        deliver(&mut CsvFileSink::new(&path), &records).unwrap();
        deliver(&mut CsvFileSink::new(&path), &records).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let rows: Vec<DailyRecord> = reader.deserialize().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0], rows[2]);
        assert_eq!(rows[1], rows[5]);
    }
}
