//! Application state shared across commands.

use crate::config::AppConfig;
use anyhow::{Context, Result};
use ds_model::{SafetyModel, TableSource};
use ds_runner::PredictionWorker;
use std::sync::Arc;

pub struct AppState {
    pub config: AppConfig,

    /// Safety model; unloaded until [`AppState::load_model`] finishes.
    pub model: Arc<SafetyModel>,

    /// Runs predictions off the async runtime.
    pub worker: PredictionWorker,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let model = Arc::new(SafetyModel::default());
        let worker = PredictionWorker::new(Arc::clone(&model));
        Self {
            config,
            model,
            worker,
        }
    }

    fn table_source(&self) -> TableSource {
        match &self.config.tables_path {
            Some(path) => TableSource::File(path.clone()),
            None => TableSource::Builtin,
        }
    }

    /// Load the configured rule tables on the blocking pool.
    pub async fn load_model(&self) -> Result<()> {
        let model = Arc::clone(&self.model);
        let source = self.table_source();
        tokio::task::spawn_blocking(move || model.load(source))
            .await
            .context("table loading task failed")?
            .context("failed to load risk tables")?;
        Ok(())
    }
}
