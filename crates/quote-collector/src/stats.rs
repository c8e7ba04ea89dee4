//! 수집 통계 구조체.

use std::time::Duration;

use crate::modules::UpdateOutcome;

/// 수집 작업 통계
///
/// 요약 로그용이며 프로세스 종료 코드에는 영향을 주지 않습니다.
#[derive(Debug, Clone, Default)]
pub struct CollectionStats {
    /// 총 종목 수
    pub total: usize,
    /// 성공 횟수
    pub success: usize,
    /// 건너뛴 횟수 (조회 결과 없음)
    pub skipped: usize,
    /// 에러 횟수 (패닉, 시간 초과 포함)
    pub errors: usize,
    /// 저장된 총 시세 수
    pub total_quotes: usize,
    /// 새로 추가된 시세 수
    pub added_quotes: usize,
    /// 종가 충돌 건수
    pub conflicts: usize,
    /// 소요 시간
    pub elapsed: Duration,
}

impl CollectionStats {
    /// 새 통계 객체 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 종목 하나의 결과 반영
    pub fn record(&mut self, outcome: &UpdateOutcome) {
        self.total += 1;
        match outcome {
            UpdateOutcome::Done(report) => {
                self.success += 1;
                self.total_quotes += report.merged_count;
                self.added_quotes += report.added;
                self.conflicts += report.conflicts;
            }
            UpdateOutcome::Skipped => self.skipped += 1,
            UpdateOutcome::Failed(_) => self.errors += 1,
        }
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
            skipped = self.skipped,
            errors = self.errors,
            total_quotes = self.total_quotes,
            added_quotes = self.added_quotes,
            conflicts = self.conflicts,
            success_rate = format!("{:.1}%", self.success_rate()),
            elapsed = format!("{:.1}s", self.elapsed.as_secs_f64()),
            "수집 완료"
        );
    }
}
