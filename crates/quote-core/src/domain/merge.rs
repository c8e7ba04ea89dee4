//! 시세 병합 엔진.
//!
//! 기존 저장 시계열과 새로 조회한 시세를 하나의 중복 없는,
//! 날짜 오름차순 시계열로 합칩니다.
//!
//! # 규칙
//!
//! 1. 모든 날짜를 UTC로 정규화한 뒤 비교합니다.
//! 2. `existing`으로 맵을 채운 뒤 `incoming`으로 항목별 덮어씁니다.
//!    같은 날짜에 종가가 다르면 `incoming` 값을 유지하고 충돌을 기록합니다.
//! 3. 결과는 정규화된 날짜 오름차순입니다.
//! 4. 허용 오차 없음: 저장 정밀도까지 정확히 같은 시각만 중복으로 봅니다.
//!
//! 충돌은 에러가 아닌 데이터 품질 신호입니다. 로깅은 호출 측 책임입니다.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

use super::Quote;

/// 같은 날짜, 다른 종가 (소프트 충돌).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuoteConflict {
    /// 정규화된 날짜
    pub date: DateTime<Utc>,
    /// 덮어쓰기 전 종가
    pub old_close: f32,
    /// 채택된 종가
    pub new_close: f32,
}

/// 병합 결과.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeOutcome {
    /// 날짜 오름차순, 중복 없는 시계열 (UTC 오프셋)
    pub quotes: Vec<Quote>,
    /// 발견된 소프트 충돌 (발생 순서)
    pub conflicts: Vec<QuoteConflict>,
}

impl MergeOutcome {
    /// 충돌 여부.
    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }
}

/// 두 시세 묶음을 병합합니다.
///
/// 순수 함수입니다. 같은 날짜는 마지막 인자(`incoming`)가 이깁니다.
pub fn merge_quotes(existing: &[Quote], incoming: &[Quote]) -> MergeOutcome {
    let mut by_date: BTreeMap<DateTime<Utc>, Quote> = existing
        .iter()
        .map(|q| (q.utc_date(), q.normalized()))
        .collect();

    let mut conflicts = Vec::new();

    for quote in incoming {
        let quote = quote.normalized();
        let date = quote.utc_date();

        if let Some(previous) = by_date.insert(date, quote) {
            if previous.close != quote.close {
                conflicts.push(QuoteConflict {
                    date,
                    old_close: previous.close,
                    new_close: quote.close,
                });
            }
        }
    }

    MergeOutcome {
        quotes: by_date.into_values().collect(),
        conflicts,
    }
}

/// 충돌 정보가 필요 없을 때의 병합.
pub fn merge(existing: &[Quote], incoming: &[Quote]) -> Vec<Quote> {
    merge_quotes(existing, incoming).quotes
}
