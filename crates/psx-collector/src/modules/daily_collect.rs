//! 일별 시세 배치 수집 모듈.
//!
//! 디렉토리 순서대로 종목을 하나씩 조회하고, 모은 레코드를 정렬/중복 제거/메타데이터
//! 결합한 뒤 CSV 저장소에 한 번에 전달합니다.

use crate::error::CollectorError;
use crate::{CollectionStats, CollectorConfig, Result};
use psx_core::{CompanyDirectory, DailyRecord, TargetPeriod};
use psx_data::{
    create_session, deliver, CompanyDirectoryProvider, CsvCompanyDirectory, CsvFileSink,
    DailyTableSource, Delivery, TabularSink,
};
use std::collections::HashSet;
use std::time::{Duration, Instant};

/// 수집 결과
#[derive(Debug, Default)]
pub struct DailyCollection {
    /// 정렬/중복 제거 전 레코드
    pub records: Vec<DailyRecord>,
    pub stats: CollectionStats,
}

/// 한 번의 실행 옵션 (CLI 인자)
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// 수집 대상 일자
    pub period: TargetPeriod,
    /// 특정 종목만 수집 (디렉토리 순서 유지)
    pub symbols: Option<Vec<String>>,
    /// 앞에서부터 N개 종목만 수집 (설정값보다 우선)
    pub limit: Option<usize>,
    /// 조회만 하고 저장하지 않음
    pub dry_run: bool,
}

impl RunOptions {
    pub fn new(period: TargetPeriod) -> Self {
        Self {
            period,
            symbols: None,
            limit: None,
            dry_run: false,
        }
    }
}

/// 디렉토리의 모든 종목에 대해 대상 일자 시세 수집.
///
/// 종목별 실패는 통계에만 반영되고 배치를 중단시키지 않습니다.
/// 종목 사이에는 `request_delay`만큼 대기하며 마지막 종목 뒤에는 대기하지 않습니다.
pub async fn collect_daily<S: DailyTableSource + ?Sized>(
    source: &S,
    directory: &CompanyDirectory,
    period: &TargetPeriod,
    request_delay: Duration,
) -> DailyCollection {
    let start = Instant::now();
    let mut collection = DailyCollection::default();
    let stats = &mut collection.stats;
    let total = directory.len();

    tracing::info!(
        symbols = total,
        target_date = %period.target_date,
        year = period.year,
        month = period.month,
        "일별 시세 수집 시작"
    );

    for (idx, symbol) in directory.symbols().enumerate() {
        stats.total += 1;

        tracing::debug!(
            symbol = symbol,
            progress = format!("{}/{}", idx + 1, total),
            "조회 시작"
        );

        match source
            .fetch_table(symbol, period.year, period.month, period.target_date)
            .await
        {
            Ok(table) => {
                stats.skipped_rows += table.skipped.len();
                if table.records.is_empty() {
                    stats.empty += 1;
                    tracing::debug!(symbol = symbol, "대상 일자 데이터 없음");
                } else {
                    stats.success += 1;
                    stats.total_records += table.records.len();
                    tracing::info!(symbol = symbol, records = table.records.len(), "조회 완료");
                    collection.records.extend(table.records);
                }
            }
            Err(e) => {
                stats.errors += 1;
                tracing::warn!(
                    symbol = symbol,
                    period = %format!("{}/{}", period.month, period.year),
                    error = %e,
                    "일별 시세 조회 실패"
                );
            }
        }

        // 마지막 종목 뒤에는 대기하지 않음
        if idx + 1 < total && !request_delay.is_zero() {
            tokio::time::sleep(request_delay).await;
        }
    }

    stats.elapsed = start.elapsed();
    collection
}

/// 저장할 배치 구성.
///
/// (종목, 일자) 순 정렬 → 완전 중복 제거 → 같은 키의 나머지 행은 첫 행만 유지 →
/// 섹터/회사명 결합. 디렉토리에 없는 종목은 메타데이터가 비어 있습니다.
///
/// 같은 (종목, 일자)에 값이 다른 행이 여러 개면 첫 행만 남고 나머지는 버려집니다.
pub fn build_batch(mut records: Vec<DailyRecord>, directory: &CompanyDirectory) -> Vec<DailyRecord> {
    records.sort_by(|a, b| a.key().cmp(&b.key()));

    let mut seen = HashSet::new();
    records.retain(|r| seen.insert(r.clone()));

    // 값이 달라도 키가 같으면 버림 (결과는 (종목, 일자) 기준 유일)
    records.dedup_by(|later, first| {
        let same = later.key() == first.key();
        if same {
            tracing::warn!(
                symbol = %later.symbol,
                date = %later.date,
                "같은 종목/일자의 서로 다른 행, 첫 행만 유지"
            );
        }
        same
    });

    records
        .into_iter()
        .map(|record| match directory.lookup(&record.symbol) {
            Some(reference) => {
                let sector = Some(reference.sector.clone());
                let company_name = Some(reference.company_name.clone());
                record.with_metadata(sector, company_name)
            }
            None => {
                tracing::debug!(symbol = %record.symbol, "디렉토리에 없는 종목");
                record
            }
        })
        .collect()
}

/// 배치를 저장소에 전달.
///
/// 빈 배치는 쓰지 않고 `None`을 반환합니다.
pub fn deliver_batch<S: TabularSink>(
    sink: &mut S,
    records: &[DailyRecord],
) -> psx_data::Result<Option<Delivery>> {
    if records.is_empty() {
        tracing::warn!("저장할 레코드가 없습니다");
        return Ok(None);
    }

    let delivery = deliver(sink, records)?;
    match delivery {
        Delivery::Created(rows) => tracing::info!(rows, "새 파일 생성"),
        Delivery::Appended(rows) => tracing::info!(rows, "기존 파일에 추가"),
    }
    Ok(Some(delivery))
}

/// 설정과 실행 옵션으로 전체 일별 수집 실행.
pub async fn run_daily(config: &CollectorConfig, options: &RunOptions) -> Result<CollectionStats> {
    let provider = CsvCompanyDirectory::new(&config.directory.company_list);
    let mut directory = provider.load().map_err(CollectorError::Directory)?;
    tracing::info!(
        provider = provider.name(),
        path = %provider.path().display(),
        count = directory.len(),
        "회사 디렉토리 로드 완료"
    );

    if let Some(symbols) = &options.symbols {
        directory.retain_symbols(symbols);
        tracing::info!(count = directory.len(), "특정 종목만 수집");
    }
    if let Some(limit) = options.limit.or(config.directory.symbol_limit) {
        directory.truncate(limit);
    }

    if directory.is_empty() {
        tracing::warn!("수집할 종목이 없습니다");
        return Ok(CollectionStats::new());
    }

    let session =
        create_session(config.source.session_config()).map_err(CollectorError::Session)?;

    let collection = collect_daily(
        &session,
        &directory,
        &options.period,
        config.daily_collect.request_delay(),
    )
    .await;

    let batch = build_batch(collection.records, &directory);

    if options.dry_run {
        tracing::info!(records = batch.len(), "dry-run: 저장 생략");
    } else {
        let mut sink = CsvFileSink::new(&config.output.csv_path);
        if let Some(delivery) = deliver_batch(&mut sink, &batch).map_err(CollectorError::Sink)? {
            tracing::info!(path = %sink.path().display(), ?delivery, "저장 완료");
        }
    }

    Ok(collection.stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use psx_core::SymbolReference;
    use rust_decimal_macros::dec;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    fn record(symbol: &str, day: u32, close: rust_decimal::Decimal) -> DailyRecord {
        DailyRecord::new(symbol, date(day), dec!(1), dec!(2), dec!(0.5), close, 100)
    }

    fn directory() -> CompanyDirectory {
        CompanyDirectory::from_entries(vec![
            SymbolReference::new("XYZ", "Xyz Ltd", "TECH"),
            SymbolReference::new("ABC", "Abc Corp", "BANKS"),
        ])
    }

    #[test]
    fn test_build_batch_sorts_and_joins_metadata() {
        let batch = build_batch(
            vec![record("XYZ", 5, dec!(10)), record("ABC", 5, dec!(20))],
            &directory(),
        );

        let symbols: Vec<_> = batch.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["ABC", "XYZ"]);
        assert_eq!(batch[0].sector.as_deref(), Some("BANKS"));
        assert_eq!(batch[0].company_name.as_deref(), Some("Abc Corp"));
        assert_eq!(batch[1].sector.as_deref(), Some("TECH"));
    }

    #[test]
    fn test_build_batch_removes_duplicates() {
        let batch = build_batch(
            vec![
                record("ABC", 5, dec!(20)),
                record("ABC", 5, dec!(21)),
                record("ABC", 5, dec!(20)),
            ],
            &directory(),
        );

        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].close, dec!(20));
    }

    #[test]
    fn test_build_batch_unknown_symbol_keeps_empty_metadata() {
        let batch = build_batch(vec![record("NEW", 5, dec!(1))], &directory());

        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].sector, None);
        assert_eq!(batch[0].company_name, None);
    }

    /// 네트워크 없이 종목마다 대상 일자 행 하나를 돌려주는 소스
    struct StaticSource {
        calls: std::sync::Mutex<Vec<(String, tokio::time::Instant)>>,
    }

    impl StaticSource {
        fn new() -> Self {
            Self {
                calls: std::sync::Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait::async_trait]
    impl DailyTableSource for StaticSource {
        async fn fetch_table(
            &self,
            symbol: &str,
            _year: i32,
            _month: u32,
            target_date: NaiveDate,
        ) -> psx_data::Result<psx_data::DayTable> {
            self.calls
                .lock()
                .unwrap()
                .push((symbol.to_string(), tokio::time::Instant::now()));
            Ok(psx_data::DayTable {
                records: vec![DailyRecord::new(
                    symbol,
                    target_date,
                    dec!(1),
                    dec!(1),
                    dec!(1),
                    dec!(1),
                    10,
                )],
                skipped: Vec::new(),
            })
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_request_delay_between_symbols_only() {
        let directory = CompanyDirectory::from_entries(vec![
            SymbolReference::new("AAA", "Aaa", "S1"),
            SymbolReference::new("BBB", "Bbb", "S2"),
            SymbolReference::new("CCC", "Ccc", "S3"),
        ]);
        let period = TargetPeriod::for_date(date(5));
        let source = StaticSource::new();

        let start = tokio::time::Instant::now();
        let collection =
            collect_daily(&source, &directory, &period, Duration::from_millis(300)).await;

        // 종목 3개 → 대기 2번
        assert_eq!(start.elapsed(), Duration::from_millis(600));
        assert_eq!(collection.stats.success, 3);
        assert_eq!(collection.records.len(), 3);

        let calls = source.calls.lock().unwrap();
        let offsets: Vec<_> = calls.iter().map(|(_, at)| *at - start).collect();
        assert_eq!(
            offsets,
            vec![
                Duration::ZERO,
                Duration::from_millis(300),
                Duration::from_millis(600),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_symbol_does_not_wait() {
        let directory =
            CompanyDirectory::from_entries(vec![SymbolReference::new("AAA", "Aaa", "S1")]);
        let source = StaticSource::new();

        let start = tokio::time::Instant::now();
        collect_daily(
            &source,
            &directory,
            &TargetPeriod::for_date(date(5)),
            Duration::from_millis(300),
        )
        .await;

        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[derive(Default)]
    struct MemorySink {
        writes: usize,
    }

    impl TabularSink for MemorySink {
        fn exists(&self) -> bool {
            self.writes > 0
        }

        fn create_with_header<T: serde::Serialize>(&mut self, _: &[T]) -> psx_data::Result<()> {
            self.writes += 1;
            Ok(())
        }

        fn append<T: serde::Serialize>(&mut self, _: &[T]) -> psx_data::Result<()> {
            self.writes += 1;
            Ok(())
        }
    }

    #[test]
    fn test_deliver_batch_skips_empty() {
        let mut sink = MemorySink::default();

        assert_eq!(deliver_batch(&mut sink, &[]).unwrap(), None);
        assert_eq!(sink.writes, 0);

        let batch = vec![record("ABC", 5, dec!(1))];
        assert_eq!(
            deliver_batch(&mut sink, &batch).unwrap(),
            Some(Delivery::Created(1))
        );
        assert_eq!(
            deliver_batch(&mut sink, &batch).unwrap(),
            Some(Delivery::Appended(1))
        );
    }
}
