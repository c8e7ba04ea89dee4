//! 종목별 JSON 파일 저장소.
//!
//! 파일 하나에 `[{"date": RFC 3339, "close": number}, ...]` 배열 하나를 저장합니다.
//! 쓰기는 `.json.tmp`에 기록 후 rename으로 교체하므로, 실패해도
//! 기존 파일은 이전 내용 그대로 남습니다.

use async_trait::async_trait;
use quote_core::{Quote, QuoteError, QuoteResult, QuoteStore};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::error::DataError;

/// JSON 파일 기반 시세 저장소.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// 종목 파일 경로.
    ///
    /// 식별자가 디렉터리를 벗어나지 못하도록 경로 구분자를 거부합니다.
    pub fn path_for(&self, isin: &str) -> QuoteResult<PathBuf> {
        let isin = isin.trim();
        if isin.is_empty() || isin == "." || isin == ".." || isin.contains(['/', '\\']) {
            return Err(QuoteError::InvalidIdentity {
                identity: isin.to_string(),
                reason: "not usable as a file name".to_string(),
            });
        }
        Ok(self.dir.join(format!("{}.json", isin)))
    }

    async fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), DataError> {
        let tmp_path = path.with_extension("json.tmp");
        let io_err = |source| DataError::IoError {
            path: tmp_path.display().to_string(),
            source,
        };

        let mut file = fs::File::create(&tmp_path).await.map_err(io_err)?;
        file.write_all(contents).await.map_err(io_err)?;
        file.sync_all().await.map_err(io_err)?;
        drop(file);

        fs::rename(&tmp_path, path).await.map_err(|source| DataError::IoError {
            path: path.display().to_string(),
            source,
        })
    }
}

#[async_trait]
impl QuoteStore for JsonFileStore {
    async fn read(&self, isin: &str) -> QuoteResult<Option<Vec<Quote>>> {
        let path = self.path_for(isin)?;

        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(DataError::IoError {
                    path: path.display().to_string(),
                    source,
                }
                .into())
            }
        };

        let quotes: Vec<Quote> = serde_json::from_slice(&bytes).map_err(|e| {
            QuoteError::Storage(format!("corrupt quote file {}: {}", path.display(), e))
        })?;

        debug!(isin, path = %path.display(), count = quotes.len(), "시세 파일 읽기 완료");
        Ok(Some(quotes))
    }

    async fn write(&self, isin: &str, quotes: &[Quote]) -> QuoteResult<()> {
        let path = self.path_for(isin)?;

        // JSON은 NaN/무한대를 표현하지 못해 null로 기록되고, 이후 읽기가 실패함
        if let Some(bad) = quotes.iter().find(|q| !q.close.is_finite()) {
            return Err(QuoteError::Serialization(format!(
                "non-finite close {} on {} for {}",
                bad.close,
                bad.date.to_rfc3339(),
                isin
            )));
        }

        let contents = serde_json::to_vec_pretty(quotes)?;

        fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| DataError::IoError {
                path: self.dir.display().to_string(),
                source,
            })?;

        if let Err(e) = Self::write_atomic(&path, &contents).await {
            let _ = fs::remove_file(path.with_extension("json.tmp")).await;
            return Err(e.into());
        }

        debug!(isin, path = %path.display(), count = quotes.len(), "시세 파일 저장 완료");
        Ok(())
    }
}
