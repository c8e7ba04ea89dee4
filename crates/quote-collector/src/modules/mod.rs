//! 시세 수집 모듈.

pub mod fleet;
pub mod quote_update;

pub use fleet::{run_fleet, FleetOptions};
pub use quote_update::{update_quotes, UpdateFailure, UpdateOutcome, UpdateReport, UpdateStage};
