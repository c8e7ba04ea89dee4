//! 시세 수집 파이프라인의 도메인 모델.

mod loader;
mod merge;
mod quote;
mod security;
mod store;

pub use loader::*;
pub use merge::*;
pub use quote::*;
pub use security::*;
pub use store::*;
