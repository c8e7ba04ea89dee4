//! 종목 CSV 로딩.
//!
//! 형식: `ISIN,Name,Loader` 헤더 + 종목당 한 행. `#`으로 시작하는 줄은 주석입니다.
//!
//! ```text
//! ISIN,Name,Loader
//! IT0005273013.MOT,BTP Italia 2025,borsaitaliana
//! # LU0119620416.LU0119620416:EUR,Global Brands,financialtimes
//! ```
//!
//! 필드 수가 3이 아닌 행이 있으면 테이블 전체가 무효입니다. 알 수 없는 로더나
//! 잘못된 식별자는 해당 행만 건너뜁니다.

use quote_core::{QuoteError, SecurityRegistry};
use quote_data::LoaderRegistry;
use std::io::Read;
use std::path::Path;

use crate::error::{CollectorError, Result};

/// 행당 필드 수
const FIELDS_PER_RECORD: usize = 3;

/// CSV에서 종목 레지스트리를 구성합니다.
pub fn load_securities<R: Read>(reader: R, loaders: &LoaderRegistry) -> Result<SecurityRegistry> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let header_len = csv_reader.headers()?.len();
    if header_len != 0 && header_len != FIELDS_PER_RECORD {
        return Err(CollectorError::Csv(format!(
            "header has {} fields, expected {}",
            header_len, FIELDS_PER_RECORD
        )));
    }

    let mut records = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        if record.len() != FIELDS_PER_RECORD {
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            return Err(CollectorError::Csv(format!(
                "line {}: wrong number of fields ({}, expected {})",
                line,
                record.len(),
                FIELDS_PER_RECORD
            )));
        }
        records.push(record);
    }

    let mut registry = SecurityRegistry::new();

    for record in &records {
        let (identity, name, source) = (&record[0], &record[1], &record[2]);

        let loader = match loaders.create(source, name, identity) {
            Ok(loader) => loader,
            Err(e) => {
                tracing::error!(identity, name, loader = source, error = %e, "로더 생성 실패, 행 건너뜀");
                continue;
            }
        };

        let isin = loader.isin().to_string();
        match registry.register(loader) {
            Ok(()) => {
                tracing::info!(isin = %isin, name, loader = source, "종목 등록");
            }
            Err(QuoteError::DuplicateSecurity(_)) => {
                tracing::warn!(isin = %isin, name, loader = source, "중복 종목, 나중 행 무시");
            }
            Err(e) => {
                tracing::error!(isin = %isin, name, error = %e, "종목 등록 실패");
            }
        }
    }

    Ok(registry)
}

/// 파일 경로에서 종목 레지스트리를 구성합니다.
pub fn load_securities_from_path(
    path: impl AsRef<Path>,
    loaders: &LoaderRegistry,
) -> Result<SecurityRegistry> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|source| CollectorError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let registry = load_securities(file, loaders)?;
    tracing::info!(path = %path.display(), count = registry.len(), "종목 테이블 로드 완료");
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaders() -> LoaderRegistry {
        LoaderRegistry::builtin(Default::default())
    }

    fn load(csv: &str) -> Result<SecurityRegistry> {
        load_securities(csv.as_bytes(), &loaders())
    }

    #[test]
    fn test_load_valid_table() {
        let registry = load(
            "ISIN,Name,Loader\n\
             IT0005273013.MOT, BTP Italia ,borsaitaliana\n\
             # commented out\n\
             LU0119620416.FUND.AH,Global Brands,morganstanley\n",
        )
        .unwrap();

        assert_eq!(registry.len(), 2);
        let btp = registry.get("IT0005273013").unwrap();
        assert_eq!(btp.name(), "BTP Italia");
        assert!(registry.contains("LU0119620416"));
    }

    #[test]
    fn test_duplicate_keeps_first_row() {
        let registry = load(
            "ISIN,Name,Loader\n\
             IT0001.MOT,First,borsaitaliana\n\
             IT0001.SYM,Second,financialtimes\n",
        )
        .unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("IT0001").unwrap().name(), "First");
    }

    #[test]
    fn test_bad_rows_are_skipped() {
        let registry = load(
            "ISIN,Name,Loader\n\
             IT0001.MOT,Unknown source,yahoo\n\
             IT0002,Missing market,borsaitaliana\n\
             IT0003,Pension,secondapensione\n",
        )
        .unwrap();

        assert_eq!(registry.len(), 1);
        assert!(registry.contains("IT0003"));
    }

    #[test]
    fn test_wrong_field_count_is_fatal() {
        let err = load(
            "ISIN,Name,Loader\n\
             IT0001.MOT,Name,borsaitaliana\n\
             IT0002.MOT,Name\n",
        )
        .unwrap_err();

        assert!(matches!(err, CollectorError::Csv(ref msg) if msg.contains("line 3")));
    }

    #[test]
    fn test_empty_table() {
        assert!(load("").unwrap().is_empty());
        assert!(load("ISIN,Name,Loader\n").unwrap().is_empty());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_securities_from_path("/nonexistent/securities.csv", &loaders()).unwrap_err();
        assert!(matches!(err, CollectorError::Io { .. }));
    }
}
