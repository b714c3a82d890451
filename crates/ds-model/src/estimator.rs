//! Score Estimator — bounded risk score from profile, task and time of day.
//!
//! score = clamp((base + task) / 2 * time_factor + jitter, 0, 10), one decimal.

use crate::clock::Clock;
use crate::tables::RiskTables;
use chrono::{Duration, Timelike};
use ds_core::assessment::{RiskLevel, TimedRiskPoint, SCORE_MAX, SCORE_MIN};
use ds_core::profile::PersonProfile;
use ds_core::task::TaskCategory;
use rand::Rng;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct ScoreEstimator {
    tables: Arc<RiskTables>,
    clock: Arc<dyn Clock>,
}

impl ScoreEstimator {
    pub fn new(tables: Arc<RiskTables>, clock: Arc<dyn Clock>) -> Self {
        Self { tables, clock }
    }

    /// Personal component: age distance from the reference age (capped) plus
    /// a penalty for each year short of the novice threshold.
    pub fn base_risk(&self, profile: &PersonProfile) -> f64 {
        let s = &self.tables.scoring;
        let age_gap = profile.age().abs_diff(s.reference_age) as f64;
        let age_penalty = (age_gap * s.age_weight).min(s.age_cap);
        let missing_years = s.novice_years.saturating_sub(profile.service_years()) as f64;
        s.base_risk + age_penalty + missing_years * s.novice_weight
    }

    /// Task component, falling back to the default for unlisted tasks.
    pub fn task_risk(&self, task: &TaskCategory) -> f64 {
        let s = &self.tables.scoring;
        s.task_risk(task).unwrap_or_else(|| {
            tracing::debug!(task = %task, "no task risk entry, using default");
            s.default_task_risk
        })
    }

    pub fn time_factor(&self, hour_of_day: u32) -> f64 {
        self.tables.scoring.time_bands.factor(hour_of_day % 24)
    }

    /// Score before jitter, clamping and rounding.
    pub fn raw_score(&self, profile: &PersonProfile, task: &TaskCategory, hour_of_day: u32) -> f64 {
        (self.base_risk(profile) + self.task_risk(task)) / 2.0 * self.time_factor(hour_of_day)
    }

    /// Final score for a specific hour of day.
    pub fn score_at_hour<R: Rng + ?Sized>(
        &self,
        profile: &PersonProfile,
        task: &TaskCategory,
        hour_of_day: u32,
        rng: &mut R,
    ) -> f64 {
        let raw = self.raw_score(profile, task, hour_of_day);
        self.finish(raw, rng)
    }

    /// Score `hour_offset` hours from now.
    pub fn estimate<R: Rng + ?Sized>(
        &self,
        profile: &PersonProfile,
        task: &TaskCategory,
        hour_offset: u32,
        rng: &mut R,
    ) -> f64 {
        let hour = hour_of_day(self.clock.now().hour(), hour_offset);
        self.score_at_hour(profile, task, hour, rng)
    }

    /// One point per hour for `hours` consecutive hours starting now.
    pub fn forecast<R: Rng + ?Sized>(
        &self,
        profile: &PersonProfile,
        task: &TaskCategory,
        hours: u32,
        rng: &mut R,
    ) -> Vec<TimedRiskPoint> {
        let start = self.clock.now();
        let midpoint = (self.base_risk(profile) + self.task_risk(task)) / 2.0;

        (0..hours)
            .map(|offset| {
                let hour = hour_of_day(start.hour(), offset);
                let score = self.finish(midpoint * self.time_factor(hour), rng);
                TimedRiskPoint {
                    offset_hours: offset,
                    timestamp: start + Duration::hours(offset as i64),
                    hour_of_day: hour,
                    score,
                    level: RiskLevel::from_score(score),
                }
            })
            .collect()
    }

    fn finish<R: Rng + ?Sized>(&self, raw: f64, rng: &mut R) -> f64 {
        // Overflowing weights (inf * 0 is NaN) read as maximum risk.
        if !raw.is_finite() {
            tracing::warn!(raw, "non-finite raw score, reporting the upper bound");
            return SCORE_MAX;
        }
        let amplitude = self.tables.scoring.jitter.clamp(0.0, SCORE_MAX);
        let jitter = if amplitude > 0.0 {
            rng.gen_range(-amplitude..=amplitude)
        } else {
            0.0
        };
        round_one_decimal((raw + jitter).clamp(SCORE_MIN, SCORE_MAX))
    }
}

fn hour_of_day(start_hour: u32, offset: u32) -> u32 {
    (start_hour + offset % 24) % 24
}

fn round_one_decimal(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
