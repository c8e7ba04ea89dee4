//! 종목 플릿 실행 모듈.
//!
//! 등록된 종목마다 독립 태스크를 하나씩 띄우고 모두 끝날 때까지 기다립니다.
//! 한 종목의 실패(에러, 패닉, 시간 초과)는 다른 종목에 영향을 주지 않습니다.

use quote_core::{quote_span, QuoteError, QuoteLoader, QuoteStore, SecurityRegistry};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::{JoinError, JoinSet};
use tracing::Instrument;

use super::quote_update::{update_quotes, UpdateFailure, UpdateOutcome, UpdateStage};
use crate::config::FleetConfig;
use crate::CollectionStats;

/// 플릿 실행 옵션
#[derive(Debug, Clone, Default)]
pub struct FleetOptions {
    /// 종목별 제한 시간 (None이면 HTTP 타임아웃에만 의존)
    pub task_timeout: Option<Duration>,
}

impl From<&FleetConfig> for FleetOptions {
    fn from(config: &FleetConfig) -> Self {
        Self {
            task_timeout: config.task_timeout(),
        }
    }
}

/// 모든 종목의 시세를 동시에 업데이트합니다.
///
/// 모든 태스크가 끝난 뒤에만 반환합니다.
pub async fn run_fleet(
    securities: &SecurityRegistry,
    store: Arc<dyn QuoteStore>,
    options: &FleetOptions,
) -> CollectionStats {
    let start = Instant::now();
    let mut stats = CollectionStats::new();

    if securities.is_empty() {
        tracing::warn!("업데이트할 종목이 없습니다");
        stats.elapsed = start.elapsed();
        return stats;
    }

    tracing::info!(securities = securities.len(), "시세 업데이트 시작");

    let mut pending: HashSet<String> = HashSet::new();
    let mut failed: Vec<String> = Vec::new();
    let mut tasks = JoinSet::new();

    for loader in securities.iter() {
        let loader = Arc::clone(loader);
        let store = Arc::clone(&store);
        let task_timeout = options.task_timeout;
        let span = quote_span!("quote_update", loader.isin());

        pending.insert(loader.isin().to_string());
        tasks.spawn(
            async move {
                let outcome = run_task(loader.as_ref(), store.as_ref(), task_timeout).await;
                (loader.isin().to_string(), outcome)
            }
            .instrument(span),
        );
    }

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((isin, outcome)) => {
                pending.remove(&isin);
                if outcome.is_failed() {
                    failed.push(isin);
                }
                stats.record(&outcome);
            }
            Err(e) => {
                tracing::error!(error = %e, "업데이트 태스크 비정상 종료");
                stats.record(&aborted(&e));
            }
        }
    }

    for isin in &pending {
        tracing::error!(isin = %isin, "결과 없이 종료된 종목");
    }
    failed.extend(pending);

    if !failed.is_empty() {
        failed.sort();
        tracing::warn!(count = failed.len(), isins = ?failed, "업데이트 실패 종목");
    }

    stats.elapsed = start.elapsed();
    stats
}

/// 결과를 돌려주지 못한 태스크 (패닉, 취소)
fn aborted(err: &JoinError) -> UpdateOutcome {
    let reason = if err.is_panic() {
        "update task panicked"
    } else {
        "update task cancelled"
    };
    UpdateOutcome::Failed(UpdateFailure {
        stage: UpdateStage::Start,
        error: QuoteError::Internal(reason.to_string()),
    })
}

async fn run_task(
    loader: &dyn QuoteLoader,
    store: &dyn QuoteStore,
    task_timeout: Option<Duration>,
) -> UpdateOutcome {
    let Some(limit) = task_timeout else {
        return update_quotes(loader, store).await;
    };

    match tokio::time::timeout(limit, update_quotes(loader, store)).await {
        Ok(outcome) => outcome,
        Err(_) => {
            tracing::error!(
                isin = loader.isin(),
                timeout = format!("{:.1}s", limit.as_secs_f64()),
                "시세 업데이트 시간 초과"
            );
            UpdateOutcome::Failed(UpdateFailure {
                stage: UpdateStage::Start,
                error: QuoteError::Timeout(format!(
                    "{} exceeded {:.1}s",
                    loader.isin(),
                    limit.as_secs_f64()
                )),
            })
        }
    }
}
