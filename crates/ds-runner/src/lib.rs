//! ds-runner: Prediction worker — runs requests off the caller's thread.

pub mod worker;

use ds_core::report::PredictionRequest;
use ds_model::{ModelError, SafetyModel};
use std::sync::Arc;
use thiserror::Error;

pub use worker::{PredictionOutcome, PredictionWorker};

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("prediction failed: {0}")]
    Model(#[from] ModelError),
    #[error("worker task failed: {0}")]
    Join(String),
}

/// Run one request on the blocking pool and wait for it.
pub async fn execute(
    model: Arc<SafetyModel>,
    request: PredictionRequest,
) -> Result<PredictionOutcome, WorkerError> {
    PredictionWorker::new(model).run(request).await
}
