//! Safety Model — owns the loaded rule tables and runs full predictions.
//!
//! A model starts unloaded; every prediction entry point returns
//! [`ModelError::Unavailable`] until [`SafetyModel::load`] succeeds, so a
//! front-end can keep its predict action disabled while tables load.

use crate::analysis::analyze_risk;
use crate::clock::{Clock, SystemClock};
use crate::estimator::ScoreEstimator;
use crate::keywords::select_keywords;
use crate::measures::recommend_measures;
use crate::recommender::recommend_safest_tasks;
use crate::tables::RiskTables;
use crate::ModelError;
use ds_core::assessment::TaskScore;
use ds_core::profile::PersonProfile;
use ds_core::report::{Forecast, Guidance, PredictionReport, PredictionRequest, RunMetadata};
use ds_core::task::TaskCategory;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// Where to load rule tables from.
#[derive(Debug, Clone)]
pub enum TableSource {
    Builtin,
    File(PathBuf),
    Json(String),
}

#[derive(Debug, Clone)]
struct LoadedTables {
    tables: Arc<RiskTables>,
    fingerprint: String,
}

#[derive(Debug)]
pub struct SafetyModel {
    loaded: RwLock<Option<LoadedTables>>,
    clock: Arc<dyn Clock>,
}

impl Default for SafetyModel {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl SafetyModel {
    /// An unloaded model reading time from `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            loaded: RwLock::new(None),
            clock,
        }
    }

    /// Convenience: a model already loaded with the built-in tables.
    pub fn with_builtin_tables(clock: Arc<dyn Clock>) -> Result<Self, ModelError> {
        let model = Self::new(clock);
        model.load(TableSource::Builtin)?;
        Ok(model)
    }

    /// Load (or replace) the rule tables.
    pub fn load(&self, source: TableSource) -> Result<(), ModelError> {
        let tables = match &source {
            TableSource::Builtin => RiskTables::builtin(),
            TableSource::File(path) => Arc::new(RiskTables::from_path(path)?),
            TableSource::Json(json) => Arc::new(RiskTables::from_json(json)?),
        };
        let fingerprint = tables.fingerprint()?;
        tracing::info!(
            version = %tables.version,
            fingerprint = %&fingerprint[..12],
            source = %source_label(&source),
            "risk tables loaded"
        );

        let mut guard = self
            .loaded
            .write()
            .map_err(|_| ModelError::Unavailable("model state lock poisoned".into()))?;
        *guard = Some(LoadedTables {
            tables,
            fingerprint,
        });
        Ok(())
    }

    pub fn is_ready(&self) -> bool {
        self.loaded.read().map(|g| g.is_some()).unwrap_or(false)
    }

    fn loaded(&self) -> Result<LoadedTables, ModelError> {
        let guard = self
            .loaded
            .read()
            .map_err(|_| ModelError::Unavailable("model state lock poisoned".into()))?;
        guard
            .clone()
            .ok_or_else(|| ModelError::Unavailable("rule tables have not been loaded".into()))
    }

    /// The currently loaded tables.
    pub fn tables(&self) -> Result<Arc<RiskTables>, ModelError> {
        Ok(self.loaded()?.tables)
    }

    /// A score estimator bound to the loaded tables and this model's clock.
    pub fn estimator(&self) -> Result<ScoreEstimator, ModelError> {
        Ok(ScoreEstimator::new(self.tables()?, Arc::clone(&self.clock)))
    }

    /// Rank candidate tasks (default candidates when `None`).
    pub fn recommend_safest_tasks<R: Rng + ?Sized>(
        &self,
        profile: &PersonProfile,
        candidates: Option<&[TaskCategory]>,
        rng: &mut R,
    ) -> Result<Vec<TaskScore>, ModelError> {
        let estimator = self.estimator()?;
        Ok(recommend_safest_tasks(&estimator, profile, candidates, rng))
    }

    /// Run a request with a generator seeded from `request.seed` (or entropy).
    pub fn predict(&self, request: &PredictionRequest) -> Result<PredictionReport, ModelError> {
        Ok(self.predict_with_metadata(request)?.0)
    }

    /// Run a request and describe how it was produced. Both halves come from
    /// the same tables snapshot, even if `load` runs concurrently.
    pub fn predict_with_metadata(
        &self,
        request: &PredictionRequest,
    ) -> Result<(PredictionReport, RunMetadata), ModelError> {
        let mut rng = match request.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let loaded = self.loaded()?;
        let report = self.predict_on(&loaded.tables, request, &mut rng);
        let metadata = RunMetadata {
            mode: report.mode,
            device: request.device,
            horizon: report.horizon,
            generated_at: report.generated_at,
            tables_version: loaded.tables.version.to_string(),
            tables_fingerprint: loaded.fingerprint,
        };
        Ok((report, metadata))
    }

    pub fn predict_with_rng<R: Rng + ?Sized>(
        &self,
        request: &PredictionRequest,
        rng: &mut R,
    ) -> Result<PredictionReport, ModelError> {
        let tables = self.tables()?;
        Ok(self.predict_on(&tables, request, rng))
    }

    fn predict_on<R: Rng + ?Sized>(
        &self,
        tables: &Arc<RiskTables>,
        request: &PredictionRequest,
        rng: &mut R,
    ) -> PredictionReport {
        let estimator = ScoreEstimator::new(Arc::clone(tables), Arc::clone(&self.clock));
        let profile = &request.profile;
        let task = &request.task;

        tracing::debug!(
            mode = %request.mode,
            task = %task,
            horizon = %request.horizon,
            "running prediction"
        );

        let forecast = if request.mode.runs_forecast() {
            let points = estimator.forecast(profile, task, request.horizon.hours(), rng);
            let safest = recommend_safest_tasks(
                &estimator,
                profile,
                request.candidates.as_deref(),
                rng,
            );
            Some(Forecast::new(points, safest))
        } else {
            None
        };

        let guidance = if request.mode.runs_guidance() {
            let keywords =
                select_keywords(&tables.keywords, profile, task, request.keyword_count, rng);
            let analysis = analyze_risk(profile, task, &keywords);
            let measures = recommend_measures(
                &tables.measures,
                profile,
                task,
                &keywords,
                request.measure_count,
            );
            Some(Guidance {
                keywords,
                analysis,
                measures,
            })
        } else {
            None
        };

        PredictionReport {
            id: Uuid::new_v4(),
            mode: request.mode,
            profile: profile.clone(),
            task: task.clone(),
            horizon: request.horizon,
            generated_at: self.clock.now(),
            forecast,
            guidance,
        }
    }
}

fn source_label(source: &TableSource) -> String {
    match source {
        TableSource::Builtin => "builtin".into(),
        TableSource::File(path) => path.display().to_string(),
        TableSource::Json(_) => "inline".into(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use ds_core::assessment::RiskLevel;
    use ds_core::profile::Gender;
    use ds_core::report::{Horizon, PredictionMode};

    fn profile() -> PersonProfile {
        PersonProfile::new("Kim", Gender::Male, 30, 5).unwrap()
    }

    fn quiet_tables_json() -> String {
        let mut t = RiskTables::default_tables();
        t.scoring.jitter = 0.0;
        t.to_json_pretty().unwrap()
    }

    fn loaded_model(hour: u32) -> SafetyModel {
        let model = SafetyModel::new(Arc::new(FixedClock::at_hour(hour)));
        model.load(TableSource::Json(quiet_tables_json())).unwrap();
        model
    }

    #[test]
    fn unloaded_model_is_unavailable() {
        let model = SafetyModel::new(Arc::new(FixedClock::at_hour(10)));
        assert!(!model.is_ready());
        let req = PredictionRequest::new(profile(), TaskCategory::LaminatedArmor);
        assert!(matches!(model.predict(&req), Err(ModelError::Unavailable(_))));
        assert!(matches!(model.estimator(), Err(ModelError::Unavailable(_))));
    }

    #[test]
    fn failed_load_leaves_model_unready() {
        let model = SafetyModel::new(Arc::new(FixedClock::at_hour(10)));
        let err = model.load(TableSource::Json("{ not json".into())).unwrap_err();
        assert!(matches!(err, ModelError::InvalidTables(_)));
        assert!(!model.is_ready());
    }

    #[test]
    fn integrated_prediction_has_both_halves() {
        let model = loaded_model(10);
        let req = PredictionRequest::new(profile(), TaskCategory::LaminatedArmor)
            .with_horizon(Horizon::Day)
            .with_seed(1);
        let report = model.predict(&req).unwrap();

        let forecast = report.forecast.as_ref().unwrap();
        assert_eq!(forecast.points.len(), 24);
        assert_eq!(forecast.safest_tasks.len(), 4);

        let guidance = report.guidance.as_ref().unwrap();
        assert_eq!(guidance.keywords.len(), 10);
        assert_eq!(guidance.measures.measures.len(), 5);
        assert!(guidance.analysis.contains("Laminated armor"));

        let assessment = report.assessment().unwrap();
        assert_eq!(assessment.score, 5.5);
        assert_eq!(assessment.level, RiskLevel::Low);
        assert_eq!(assessment.keywords, guidance.keywords);
    }

    #[test]
    fn ml_mode_skips_guidance() {
        let model = loaded_model(23);
        let req = PredictionRequest::new(profile(), TaskCategory::WeaponsSystems)
            .with_mode(PredictionMode::Ml)
            .with_horizon(Horizon::Hour);
        let report = model.predict(&req).unwrap();
        assert!(report.guidance.is_none());
        let forecast = report.forecast.unwrap();
        assert_eq!(forecast.points.len(), 1);
        assert_eq!(forecast.points[0].score, 8.1);
        assert_eq!(forecast.points[0].level, RiskLevel::High);
    }

    #[test]
    fn dl_mode_skips_forecast() {
        let model = loaded_model(10);
        let req = PredictionRequest::new(profile(), TaskCategory::ElectricalSystems)
            .with_mode(PredictionMode::Dl)
            .with_seed(4);
        let report = model.predict(&req).unwrap();
        assert!(report.forecast.is_none());
        assert!(report.assessment().is_none());
        assert!(report.guidance.is_some());
    }

    #[test]
    fn seeded_requests_are_reproducible() {
        let model = SafetyModel::with_builtin_tables(Arc::new(FixedClock::at_hour(14))).unwrap();
        let req = PredictionRequest::new(profile(), TaskCategory::HydraulicSystems).with_seed(77);
        let a = model.predict(&req).unwrap();
        let b = model.predict(&req).unwrap();
        assert_eq!(a.forecast, b.forecast);
        assert_eq!(a.guidance, b.guidance);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn dumped_tables_reload_to_same_scores() {
        let builtin = SafetyModel::with_builtin_tables(Arc::new(FixedClock::at_hour(3))).unwrap();
        let json = RiskTables::builtin().to_json_pretty().unwrap();
        let reloaded = SafetyModel::new(Arc::new(FixedClock::at_hour(3)));
        reloaded.load(TableSource::Json(json)).unwrap();

        let req = PredictionRequest::new(profile(), TaskCategory::EngineMaintenance)
            .with_horizon(Horizon::Week)
            .with_seed(5);
        assert_eq!(
            builtin.predict(&req).unwrap().forecast,
            reloaded.predict(&req).unwrap().forecast
        );
    }

    #[test]
    fn metadata_carries_fingerprint() {
        let model = loaded_model(10);
        let req = PredictionRequest::new(profile(), TaskCategory::LaminatedArmor).with_seed(1);
        let (report, meta) = model.predict_with_metadata(&req).unwrap();
        assert_eq!(meta.tables_version, "1.0.0");
        assert_eq!(meta.tables_fingerprint.len(), 64);
        assert_eq!(meta.generated_at, report.generated_at);
    }

    #[test]
    fn metadata_matches_tables_used_for_report() {
        let model = SafetyModel::new(Arc::new(FixedClock::at_hour(10)));
        let req = PredictionRequest::new(profile(), TaskCategory::LaminatedArmor)
            .with_mode(PredictionMode::Ml)
            .with_horizon(Horizon::Hour);

        let mut first = RiskTables::default_tables();
        first.scoring.jitter = 0.0;
        let mut second = first.clone();
        second.version = semver::Version::new(1, 1, 0);
        second
            .scoring
            .task_risk
            .insert("laminated-armor".into(), 9.0);

        for tables in [first, second] {
            model
                .load(TableSource::Json(tables.to_json_pretty().unwrap()))
                .unwrap();
            let (report, meta) = model.predict_with_metadata(&req).unwrap();
            let expected = ScoreEstimator::new(
                Arc::new(tables.clone()),
                Arc::new(FixedClock::at_hour(10)),
            )
            .raw_score(&profile(), &TaskCategory::LaminatedArmor, 10);

            assert_eq!(meta.tables_fingerprint, tables.fingerprint().unwrap());
            assert_eq!(meta.tables_version, tables.version.to_string());
            let score = report.forecast.unwrap().points[0].score;
            assert_eq!(score, (expected * 10.0).round() / 10.0);
        }
    }

    #[test]
    fn oversized_jitter_document_is_refused() {
        let mut tables = RiskTables::default_tables();
        tables.scoring.jitter = 1e308;
        let model = SafetyModel::new(Arc::new(FixedClock::at_hour(10)));
        let err = model
            .load(TableSource::Json(tables.to_json_pretty().unwrap()))
            .unwrap_err();
        assert!(matches!(err, ModelError::InvalidTables(_)));
        assert!(!model.is_ready());
    }
}
