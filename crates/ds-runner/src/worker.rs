//! Prediction worker — offloads a request onto tokio's blocking pool and
//! hands the result back as a future or through a completion callback.
//!
//! Requests share nothing mutable: the model is read through an `Arc` and
//! every outcome is a fresh value.

use crate::WorkerError;
use ds_core::assessment::TaskScore;
use ds_core::profile::PersonProfile;
use ds_core::report::{PredictionReport, PredictionRequest, RunMetadata};
use ds_core::task::TaskCategory;
use ds_model::{ModelError, SafetyModel};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinHandle;

/// A finished prediction plus the metadata needed to export it.
#[derive(Debug, Clone)]
pub struct PredictionOutcome {
    pub report: PredictionReport,
    pub metadata: RunMetadata,
    pub elapsed_ms: u64,
}

#[derive(Debug, Clone)]
pub struct PredictionWorker {
    model: Arc<SafetyModel>,
}

impl PredictionWorker {
    pub fn new(model: Arc<SafetyModel>) -> Self {
        Self { model }
    }

    /// Whether the model has finished loading; callers gate their predict
    /// action on this.
    pub fn is_ready(&self) -> bool {
        self.model.is_ready()
    }

    /// Start a prediction on the blocking pool.
    pub fn submit(
        &self,
        request: PredictionRequest,
    ) -> JoinHandle<Result<PredictionOutcome, ModelError>> {
        let model = Arc::clone(&self.model);
        tokio::task::spawn_blocking(move || run_request(&model, &request))
    }

    /// Start a prediction and wait for it.
    pub async fn run(&self, request: PredictionRequest) -> Result<PredictionOutcome, WorkerError> {
        flatten(self.submit(request).await)
    }

    /// Start a prediction and invoke `on_complete` with the result once it
    /// finishes. The callback runs on an async task, not on the blocking pool.
    pub fn submit_with_callback<F>(
        &self,
        request: PredictionRequest,
        on_complete: F,
    ) -> JoinHandle<()>
    where
        F: FnOnce(Result<PredictionOutcome, WorkerError>) + Send + 'static,
    {
        let handle = self.submit(request);
        tokio::spawn(async move {
            let result = flatten(handle.await);
            if let Err(e) = &result {
                tracing::warn!("prediction failed: {e}");
            }
            on_complete(result);
        })
    }

    /// Rank candidate tasks on the blocking pool.
    pub async fn recommend(
        &self,
        profile: PersonProfile,
        candidates: Option<Vec<TaskCategory>>,
        seed: Option<u64>,
    ) -> Result<Vec<TaskScore>, WorkerError> {
        let model = Arc::clone(&self.model);
        let joined = tokio::task::spawn_blocking(move || {
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            model.recommend_safest_tasks(&profile, candidates.as_deref(), &mut rng)
        })
        .await;
        flatten(joined)
    }
}

fn run_request(
    model: &SafetyModel,
    request: &PredictionRequest,
) -> Result<PredictionOutcome, ModelError> {
    let started = Instant::now();
    let (report, metadata) = model.predict_with_metadata(request)?;
    let elapsed_ms = started.elapsed().as_millis() as u64;
    tracing::info!(
        report_id = %report.id,
        mode = %report.mode,
        task = %report.task,
        elapsed_ms,
        "prediction completed"
    );
    Ok(PredictionOutcome {
        report,
        metadata,
        elapsed_ms,
    })
}

fn flatten<T>(
    joined: Result<Result<T, ModelError>, tokio::task::JoinError>,
) -> Result<T, WorkerError> {
    match joined {
        Ok(result) => result.map_err(WorkerError::from),
        Err(e) => {
            tracing::error!("Task join error: {e}");
            Err(WorkerError::Join(e.to_string()))
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
