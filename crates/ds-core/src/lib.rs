//! ds-core: Shared types for the depot safety predictor
//!
//! This crate has zero internal crate dependencies and defines the
//! canonical types used across all other ds-* crates.

pub mod assessment;
pub mod profile;
pub mod report;
pub mod task;

/// Re-export commonly used types.
pub mod prelude {
    pub use crate::assessment::{
        Priority, RiskAssessment, RiskLevel, SafetyMeasures, TaskScore, TimedRiskPoint,
    };
    pub use crate::profile::{Gender, PersonProfile, ProfileError, ProfileInput};
    pub use crate::report::{
        DevicePreference, Forecast, Guidance, Horizon, PredictionMode, PredictionReport,
        PredictionRequest, RunMetadata,
    };
    pub use crate::task::TaskCategory;
}
