//! 수집 통계 구조체.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 수집 작업 통계
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectionStats {
    /// 조회한 종목 수
    pub total: usize,
    /// 대상 일자 레코드를 받은 종목 수
    pub success: usize,
    /// 조회는 성공했지만 대상 일자 행이 없는 종목 수
    pub empty: usize,
    /// 요청 실패 종목 수
    pub errors: usize,
    /// 수집된 레코드 수 (중복 제거 전)
    pub total_records: usize,
    /// 건너뛴 테이블 행 수
    pub skipped_rows: usize,
    /// 소요 시간
    #[serde(skip)]
    pub elapsed: Duration,
}

impl CollectionStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// 성공률 계산 (%)
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.success as f64 / self.total as f64) * 100.0
        }
    }

    /// 통계 요약 로그 출력
    pub fn log_summary(&self, operation: &str) {
        tracing::info!(
            operation = operation,
            total = self.total,
            success = self.success,
            empty = self.empty,
            errors = self.errors,
            total_records = self.total_records,
            skipped_rows = self.skipped_rows,
            success_rate = format!("{:.1}%", self.success_rate()),
            elapsed = format!("{:.1}s", self.elapsed.as_secs_f64()),
            "수집 완료"
        );
    }
}
