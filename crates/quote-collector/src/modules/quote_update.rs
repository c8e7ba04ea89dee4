//! 종목별 시세 업데이트 모듈.
//!
//! `Start → Fetched → OldLoaded → Merged → Persisted → Done` 순서로 진행하며,
//! 첫 에러에서 `Failed`, 조회 결과가 비어 있으면 `Skipped`로 즉시 종료합니다.
//! 어느 경우에도 저장 전에 종료하면 기존 파일은 변경되지 않습니다.

use quote_core::{merge_quotes, DateRange, QuoteError, QuoteLoader, QuoteStore};
use std::fmt;
use std::time::{Duration, Instant};

/// 업데이트 진행 단계
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateStage {
    Start,
    Fetched,
    OldLoaded,
    Merged,
    Persisted,
    Done,
}

impl fmt::Display for UpdateStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Start => "start",
            Self::Fetched => "fetched",
            Self::OldLoaded => "old_loaded",
            Self::Merged => "merged",
            Self::Persisted => "persisted",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// 업데이트 결과 요약 (관측용)
#[derive(Debug, Clone)]
pub struct UpdateReport {
    pub isin: String,
    /// 기존 저장 시세 수
    pub old_count: usize,
    /// 새로 조회한 시세 수
    pub new_count: usize,
    /// 병합 후 시세 수
    pub merged_count: usize,
    /// 추가된 시세 수 (merged - old)
    pub added: usize,
    /// 같은 날짜, 다른 종가 건수
    pub conflicts: usize,
    pub old_range: Option<DateRange>,
    pub new_range: Option<DateRange>,
    pub merged_range: Option<DateRange>,
    pub elapsed: Duration,
}

/// 실패 정보
#[derive(Debug)]
pub struct UpdateFailure {
    /// 실패 직전에 도달한 단계
    pub stage: UpdateStage,
    pub error: QuoteError,
}

/// 종목 하나의 업데이트 결과
#[derive(Debug)]
pub enum UpdateOutcome {
    /// 병합 결과 저장 완료
    Done(UpdateReport),
    /// 조회 결과 없음 (저장하지 않음)
    Skipped,
    /// 실패 (실패 단계 이후 작업 없음)
    Failed(UpdateFailure),
}

impl UpdateOutcome {
    fn failed(stage: UpdateStage, error: QuoteError) -> Self {
        Self::Failed(UpdateFailure { stage, error })
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// 종목 하나의 시세를 조회, 병합, 저장합니다.
///
/// 에러는 반환하지 않고 `UpdateOutcome::Failed`로 보고합니다.
pub async fn update_quotes(loader: &dyn QuoteLoader, store: &dyn QuoteStore) -> UpdateOutcome {
    let start = Instant::now();
    let isin = loader.isin();

    tracing::info!(isin, name = loader.name(), "시세 조회 시작");

    // 1. 조회
    let new_quotes = match loader.load_quotes().await {
        Ok(quotes) => quotes,
        Err(e) => {
            tracing::error!(isin, stage = %UpdateStage::Start, error = %e, "시세 조회 실패");
            return UpdateOutcome::failed(UpdateStage::Start, e);
        }
    };

    if new_quotes.is_empty() {
        tracing::warn!(isin, "조회된 시세 없음, 건너뜀");
        return UpdateOutcome::Skipped;
    }

    // 2. 기존 시세 로드
    let old_quotes = match store.read(isin).await {
        Ok(Some(quotes)) => quotes,
        Ok(None) => {
            tracing::warn!(isin, "기존 시세 없음, 새로 생성");
            Vec::new()
        }
        Err(e) => {
            tracing::error!(isin, stage = %UpdateStage::Fetched, error = %e, "기존 시세 로드 실패");
            return UpdateOutcome::failed(UpdateStage::Fetched, e);
        }
    };

    // 3. 병합
    let merged = merge_quotes(&old_quotes, &new_quotes);
    if merged.has_conflicts() {
        tracing::warn!(isin, count = merged.conflicts.len(), "종가 충돌 발견");
    }
    for conflict in &merged.conflicts {
        tracing::warn!(
            isin,
            date = %conflict.date.format("%Y-%m-%d"),
            old_close = conflict.old_close,
            new_close = conflict.new_close,
            "같은 날짜에 다른 종가, 새 값 사용"
        );
    }

    // 4. 저장
    if let Err(e) = store.write(isin, &merged.quotes).await {
        tracing::error!(isin, stage = %UpdateStage::Merged, error = %e, "시세 저장 실패");
        return UpdateOutcome::failed(UpdateStage::Merged, e);
    }

    // 5. 보고
    let report = UpdateReport {
        isin: isin.to_string(),
        old_count: old_quotes.len(),
        new_count: new_quotes.len(),
        merged_count: merged.quotes.len(),
        added: merged.quotes.len().saturating_sub(old_quotes.len()),
        conflicts: merged.conflicts.len(),
        old_range: DateRange::of(&old_quotes),
        new_range: DateRange::of(&new_quotes),
        merged_range: DateRange::of(&merged.quotes),
        elapsed: start.elapsed(),
    };

    tracing::debug!(
        isin,
        old = ?report.old_range.map(|r| r.to_string()),
        new = ?report.new_range.map(|r| r.to_string()),
        merged = ?report.merged_range.map(|r| r.to_string()),
        "날짜 범위"
    );
    tracing::info!(
        isin,
        added = report.added,
        old = report.old_count,
        new = report.new_count,
        conflicts = report.conflicts,
        elapsed = format!("{:.2}s", report.elapsed.as_secs_f64()),
        "시세 업데이트 완료"
    );

    UpdateOutcome::Done(report)
}
