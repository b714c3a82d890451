//! Assessment types — scores, levels, keywords and safety measures.

use crate::task::TaskCategory;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lower bound of the risk score range.
pub const SCORE_MIN: f64 = 0.0;
/// Upper bound of the risk score range.
pub const SCORE_MAX: f64 = 10.0;

// ---------------------------------------------------------------------------
// Risk level
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub const HIGH_THRESHOLD: f64 = 8.0;
    pub const MEDIUM_THRESHOLD: f64 = 6.0;

    pub fn from_score(score: f64) -> Self {
        if score >= Self::HIGH_THRESHOLD {
            RiskLevel::High
        } else if score >= Self::MEDIUM_THRESHOLD {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => f.write_str("low"),
            RiskLevel::Medium => f.write_str("medium"),
            RiskLevel::High => f.write_str("high"),
        }
    }
}

// ---------------------------------------------------------------------------
// Forecast points
// ---------------------------------------------------------------------------

/// One hourly point of a forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedRiskPoint {
    /// Hours after the start of the forecast.
    pub offset_hours: u32,

    /// Wall-clock time of this point.
    pub timestamp: DateTime<Local>,

    /// Local hour of day (0-23) that drove the time factor.
    pub hour_of_day: u32,

    pub score: f64,
    pub level: RiskLevel,
}

/// A candidate task with its estimated score, as ranked by the recommender.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskScore {
    pub task: TaskCategory,
    pub score: f64,
    pub level: RiskLevel,
    /// Short human-readable line, e.g. "risk score 5.5 - low".
    pub note: String,
}

impl TaskScore {
    pub fn new(task: TaskCategory, score: f64) -> Self {
        let level = RiskLevel::from_score(score);
        Self {
            note: format!("risk score {score:.1} - {level}"),
            task,
            score,
            level,
        }
    }
}

// ---------------------------------------------------------------------------
// Safety measures
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::High => f.write_str("high"),
            Priority::Medium => f.write_str("medium"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyMeasures {
    pub measures: Vec<String>,
    pub summary: String,
    pub priority: Priority,
}

// ---------------------------------------------------------------------------
// RiskAssessment
// ---------------------------------------------------------------------------

/// The combined result handed to presentation and export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub score: f64,
    pub level: RiskLevel,
    pub keywords: Vec<String>,
    pub recommendations: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_thresholds() {
        assert_eq!(RiskLevel::from_score(8.0), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(7.99), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(6.0), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(5.99), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(SCORE_MIN), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(SCORE_MAX), RiskLevel::High);
    }

    #[test]
    fn task_score_note() {
        let ts = TaskScore::new(TaskCategory::EngineMaintenance, 6.2);
        assert_eq!(ts.level, RiskLevel::Medium);
        assert_eq!(ts.note, "risk score 6.2 - medium");
    }
}
