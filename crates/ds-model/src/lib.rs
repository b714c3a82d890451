//! ds-model: Rule-based risk estimator, task recommender and keyword/measure selector.
//!
//! Pipeline: RiskTables → ScoreEstimator (+ task ranking) and KeywordSelector
//! (+ analysis, measures) → PredictionReport. The two halves never read each
//! other's output.

pub mod analysis;
pub mod clock;
pub mod estimator;
pub mod keywords;
pub mod measures;
pub mod model;
pub mod recommender;
pub mod tables;

use thiserror::Error;

pub use model::{SafetyModel, TableSource};
pub use tables::RiskTables;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model not ready: {0}")]
    Unavailable(String),
    #[error("invalid rule tables: {0}")]
    InvalidTables(String),
    #[error("io error: {0}")]
    Io(String),
}
