//! Report types — prediction modes, horizons and the assembled report.

use crate::assessment::{RiskAssessment, SafetyMeasures, TaskScore, TimedRiskPoint};
use crate::profile::PersonProfile;
use crate::task::TaskCategory;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Prediction mode
// ---------------------------------------------------------------------------

/// Which halves of the predictor run for a request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PredictionMode {
    /// Score forecast and task ranking only.
    Ml,
    /// Keywords, analysis and safety measures only.
    Dl,
    /// Both.
    #[default]
    Integrated,
}

impl PredictionMode {
    pub fn runs_forecast(self) -> bool {
        matches!(self, PredictionMode::Ml | PredictionMode::Integrated)
    }

    pub fn runs_guidance(self) -> bool {
        matches!(self, PredictionMode::Dl | PredictionMode::Integrated)
    }
}

impl fmt::Display for PredictionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredictionMode::Ml => f.write_str("ml"),
            PredictionMode::Dl => f.write_str("dl"),
            PredictionMode::Integrated => f.write_str("integrated"),
        }
    }
}

impl FromStr for PredictionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ml" => Ok(PredictionMode::Ml),
            "dl" => Ok(PredictionMode::Dl),
            "integrated" | "통합" => Ok(PredictionMode::Integrated),
            other => Err(format!(
                "unknown prediction mode '{other}' (expected ml, dl or integrated)"
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Horizon
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Horizon {
    Hour,
    #[default]
    Day,
    Week,
    /// The full multi-month hourly span.
    Full,
}

impl Horizon {
    /// Number of hourly points in the horizon.
    pub fn hours(self) -> u32 {
        match self {
            Horizon::Hour => 1,
            Horizon::Day => 24,
            Horizon::Week => 168,
            Horizon::Full => 3672,
        }
    }
}

impl fmt::Display for Horizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Horizon::Full => f.write_str("full"),
            other => write!(f, "{}h", other.hours()),
        }
    }
}

impl FromStr for Horizon {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1" | "1h" | "hour" => Ok(Horizon::Hour),
            "24" | "24h" | "day" => Ok(Horizon::Day),
            "168" | "168h" | "week" => Ok(Horizon::Week),
            "full" | "3672" | "3672h" => Ok(Horizon::Full),
            other => Err(format!(
                "unknown horizon '{other}' (expected 1h, 24h, 168h or full)"
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Device preference
// ---------------------------------------------------------------------------

/// Compute device requested by the user. Recorded in run metadata.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DevicePreference {
    #[default]
    Auto,
    Cpu,
    Gpu,
}

impl fmt::Display for DevicePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DevicePreference::Auto => f.write_str("auto"),
            DevicePreference::Cpu => f.write_str("cpu"),
            DevicePreference::Gpu => f.write_str("gpu"),
        }
    }
}

impl FromStr for DevicePreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(DevicePreference::Auto),
            "cpu" => Ok(DevicePreference::Cpu),
            "gpu" | "cuda" => Ok(DevicePreference::Gpu),
            other => Err(format!("unknown device '{other}' (expected auto, cpu or gpu)")),
        }
    }
}

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// Maximum number of keywords a request may ask for.
pub const MAX_KEYWORDS: usize = 10;
/// Maximum number of safety measures a request may ask for.
pub const MAX_MEASURES: usize = 5;

/// One prediction request, as submitted from the front-end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub profile: PersonProfile,
    pub task: TaskCategory,

    #[serde(default)]
    pub mode: PredictionMode,

    #[serde(default)]
    pub horizon: Horizon,

    #[serde(default)]
    pub device: DevicePreference,

    /// Seed for the jitter/shuffle generator. `None` draws from entropy.
    #[serde(default)]
    pub seed: Option<u64>,

    #[serde(default = "default_keyword_count")]
    pub keyword_count: usize,

    #[serde(default = "default_measure_count")]
    pub measure_count: usize,

    /// Tasks to rank; `None` uses [`TaskCategory::default_candidates`].
    #[serde(default)]
    pub candidates: Option<Vec<TaskCategory>>,
}

fn default_keyword_count() -> usize {
    MAX_KEYWORDS
}

fn default_measure_count() -> usize {
    MAX_MEASURES
}

impl PredictionRequest {
    pub fn new(profile: PersonProfile, task: TaskCategory) -> Self {
        Self {
            profile,
            task,
            mode: PredictionMode::default(),
            horizon: Horizon::default(),
            device: DevicePreference::default(),
            seed: None,
            keyword_count: MAX_KEYWORDS,
            measure_count: MAX_MEASURES,
            candidates: None,
        }
    }

    pub fn with_mode(mut self, mode: PredictionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_horizon(mut self, horizon: Horizon) -> Self {
        self.horizon = horizon;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// Score half of a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub points: Vec<TimedRiskPoint>,
    pub safest_tasks: Vec<TaskScore>,
    pub mean_score: f64,
    pub peak: Option<TimedRiskPoint>,
}

impl Forecast {
    pub fn new(points: Vec<TimedRiskPoint>, safest_tasks: Vec<TaskScore>) -> Self {
        let mean_score = if points.is_empty() {
            0.0
        } else {
            let sum: f64 = points.iter().map(|p| p.score).sum();
            (sum / points.len() as f64 * 10.0).round() / 10.0
        };
        // First maximum wins.
        let peak = points
            .iter()
            .fold(None::<&TimedRiskPoint>, |best, p| match best {
                Some(b) if b.score >= p.score => Some(b),
                _ => Some(p),
            })
            .cloned();
        Self {
            points,
            safest_tasks,
            mean_score,
            peak,
        }
    }

    /// The point for the current hour.
    pub fn current(&self) -> Option<&TimedRiskPoint> {
        self.points.first()
    }
}

/// Keyword half of a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guidance {
    pub keywords: Vec<String>,
    pub analysis: String,
    pub measures: SafetyMeasures,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionReport {
    pub id: Uuid,
    pub mode: PredictionMode,
    pub profile: PersonProfile,
    pub task: TaskCategory,
    pub horizon: Horizon,
    pub generated_at: DateTime<Local>,

    /// Present for `ml` and `integrated` modes.
    #[serde(default)]
    pub forecast: Option<Forecast>,

    /// Present for `dl` and `integrated` modes.
    #[serde(default)]
    pub guidance: Option<Guidance>,
}

impl PredictionReport {
    /// Combined assessment; only available when both halves ran.
    pub fn assessment(&self) -> Option<RiskAssessment> {
        let point = self.forecast.as_ref()?.current()?;
        let guidance = self.guidance.as_ref()?;
        Some(RiskAssessment {
            score: point.score,
            level: point.level,
            keywords: guidance.keywords.clone(),
            recommendations: guidance.measures.measures.clone(),
        })
    }
}

/// Run metadata written alongside an exported report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMetadata {
    pub mode: PredictionMode,
    pub device: DevicePreference,
    pub horizon: Horizon,
    pub generated_at: DateTime<Local>,
    pub tables_version: String,
    pub tables_fingerprint: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::RiskLevel;
    use chrono::TimeZone;

    fn point(offset: u32, score: f64) -> TimedRiskPoint {
        TimedRiskPoint {
            offset_hours: offset,
            timestamp: Local.timestamp_opt(1_700_000_000 + offset as i64 * 3600, 0).unwrap(),
            hour_of_day: offset % 24,
            score,
            level: RiskLevel::from_score(score),
        }
    }

    #[test]
    fn horizon_hours() {
        assert_eq!(Horizon::Hour.hours(), 1);
        assert_eq!(Horizon::Day.hours(), 24);
        assert_eq!(Horizon::Week.hours(), 168);
        assert_eq!(Horizon::Full.hours(), 3672);
        assert_eq!("168h".parse::<Horizon>().unwrap(), Horizon::Week);
        assert_eq!(Horizon::Day.to_string(), "24h");
    }

    #[test]
    fn mode_is_exhaustive() {
        assert_eq!("ML".parse::<PredictionMode>().unwrap(), PredictionMode::Ml);
        assert_eq!("통합".parse::<PredictionMode>().unwrap(), PredictionMode::Integrated);
        assert!("ML+DL hybrid".parse::<PredictionMode>().is_err());
        assert!(PredictionMode::Integrated.runs_forecast());
        assert!(PredictionMode::Integrated.runs_guidance());
        assert!(!PredictionMode::Ml.runs_guidance());
        assert!(!PredictionMode::Dl.runs_forecast());
    }

    #[test]
    fn forecast_summary_stats() {
        let f = Forecast::new(vec![point(0, 5.0), point(1, 7.5), point(2, 7.5)], vec![]);
        assert_eq!(f.mean_score, 6.7);
        assert_eq!(f.peak.as_ref().map(|p| p.offset_hours), Some(1));
        assert_eq!(f.current().map(|p| p.score), Some(5.0));
    }

    #[test]
    fn empty_forecast() {
        let f = Forecast::new(vec![], vec![]);
        assert_eq!(f.mean_score, 0.0);
        assert!(f.peak.is_none());
    }
}
