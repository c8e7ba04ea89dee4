//! 플릿 실행 통합 테스트.

use async_trait::async_trait;
use chrono::NaiveDate;
use quote_collector::modules::{run_fleet, FleetOptions};
use quote_core::{Quote, QuoteError, QuoteLoader, QuoteResult, QuoteStore, SecurityRegistry};
use quote_data::JsonFileStore;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

enum Behavior {
    Quotes(f32),
    Empty,
    Error,
    Panic,
    Hang,
}

struct ScriptedLoader {
    isin: String,
    behavior: Behavior,
}

#[async_trait]
impl QuoteLoader for ScriptedLoader {
    fn name(&self) -> &str {
        "scripted"
    }

    fn isin(&self) -> &str {
        &self.isin
    }

    async fn load_quotes(&self) -> QuoteResult<Vec<Quote>> {
        let day = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        match self.behavior {
            Behavior::Quotes(close) => Ok(vec![Quote::on_day(day, close)]),
            Behavior::Empty => Ok(Vec::new()),
            Behavior::Error => Err(QuoteError::Fetch("connection reset".to_string())),
            Behavior::Panic => panic!("loader exploded"),
            Behavior::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(Vec::new())
            }
        }
    }
}

fn registry(entries: Vec<(&str, Behavior)>) -> SecurityRegistry {
    let mut registry = SecurityRegistry::new();
    for (isin, behavior) in entries {
        registry
            .register(Arc::new(ScriptedLoader {
                isin: isin.to_string(),
                behavior,
            }))
            .unwrap();
    }
    registry
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_failures_are_isolated() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(JsonFileStore::new(dir.path()));

    let securities = registry(vec![
        ("OK1", Behavior::Quotes(1.0)),
        ("ERR", Behavior::Error),
        ("PANIC", Behavior::Panic),
        ("EMPTY", Behavior::Empty),
        ("OK2", Behavior::Quotes(2.0)),
    ]);

    let stats = run_fleet(&securities, store.clone(), &FleetOptions::default()).await;

    assert_eq!(stats.total, 5);
    assert_eq!(stats.success, 2);
    assert_eq!(stats.skipped, 1);
    assert_eq!(stats.errors, 2);
    assert_eq!(stats.added_quotes, 2);

    assert!(store.read("OK1").await.unwrap().is_some());
    assert!(store.read("OK2").await.unwrap().is_some());
    assert!(store.read("ERR").await.unwrap().is_none());
    assert!(store.read("PANIC").await.unwrap().is_none());
    assert!(store.read("EMPTY").await.unwrap().is_none());
}

#[tokio::test]
async fn test_task_timeout_marks_failed() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(JsonFileStore::new(dir.path()));

    let securities = registry(vec![("SLOW", Behavior::Hang), ("FAST", Behavior::Quotes(3.0))]);
    let options = FleetOptions {
        task_timeout: Some(Duration::from_millis(200)),
    };

    let stats = run_fleet(&securities, store, &options).await;

    assert_eq!(stats.total, 2);
    assert_eq!(stats.success, 1);
    assert_eq!(stats.errors, 1);
}

#[tokio::test]
async fn test_empty_registry() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(JsonFileStore::new(dir.path()));

    let stats = run_fleet(&SecurityRegistry::new(), store, &FleetOptions::default()).await;

    assert_eq!(stats.total, 0);
    assert_eq!(stats.success_rate(), 0.0);
}
