//! 시세 저장소 구현.
//!
//! - `JsonFileStore`: 종목별 JSON 파일 (`{dir}/{ISIN}.json`)

pub mod json_file;

pub use json_file::JsonFileStore;
