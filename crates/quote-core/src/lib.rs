//! # Quote Core
//!
//! 시세 수집 시스템의 핵심 도메인 모델 및 계약을 제공합니다.
//!
//! 이 크레이트는 파이프라인 전반에서 사용되는 기본 타입을 제공합니다:
//! - 정규화된 시세 값 타입 (`Quote`)
//! - 시세 로더 / 저장소 trait
//! - 병합 엔진 (중복 제거, 충돌 감지)
//! - 종목 레지스트리
//! - 로깅 인프라

pub mod domain;
pub mod error;
pub mod logging;

pub use domain::*;
pub use error::*;
pub use logging::*;
