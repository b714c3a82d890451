//! Rule tables — every constant the estimator and selectors read.
//!
//! The built-in tables are constructed once per process and shared by `Arc`.
//! An alternative document (same shape, JSON) can be loaded in their place.

use crate::ModelError;
use ds_core::assessment::SCORE_MAX;
use ds_core::profile::PersonProfile;
use ds_core::task::TaskCategory;
use lazy_static::lazy_static;
use semver::Version;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

/// Major version of the tables document this build understands.
pub const SUPPORTED_MAJOR: u64 = 1;

/// Largest jitter half-width a tables document may declare.
pub const MAX_JITTER: f64 = SCORE_MAX;

/// Upper bound for every risk value, weight and time factor.
pub const MAX_WEIGHT: f64 = 1000.0;

lazy_static! {
    static ref BUILTIN: Arc<RiskTables> = Arc::new(RiskTables::default_tables());
}

// ---------------------------------------------------------------------------
// RiskTables
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskTables {
    pub version: Version,
    pub scoring: ScoringRules,
    pub keywords: KeywordRules,
    pub measures: MeasureRules,
}

impl RiskTables {
    /// The shared built-in tables.
    pub fn builtin() -> Arc<RiskTables> {
        Arc::clone(&BUILTIN)
    }

    /// Parse and validate a tables document.
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        let tables: RiskTables =
            serde_json::from_str(json).map_err(|e| ModelError::InvalidTables(e.to_string()))?;
        tables.validate()?;
        Ok(tables)
    }

    pub fn from_path(path: &Path) -> Result<Self, ModelError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ModelError::Io(format!("failed to read {}: {e}", path.display())))?;
        Self::from_json(&content)
    }

    pub fn to_json_pretty(&self) -> Result<String, ModelError> {
        serde_json::to_string_pretty(self).map_err(|e| ModelError::InvalidTables(e.to_string()))
    }

    /// SHA-256 (hex) of the compact JSON form. Map keys are ordered, so equal
    /// tables always share a fingerprint.
    pub fn fingerprint(&self) -> Result<String, ModelError> {
        let bytes =
            serde_json::to_vec(self).map_err(|e| ModelError::InvalidTables(e.to_string()))?;
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        Ok(hex::encode(hasher.finalize()))
    }

    fn validate(&self) -> Result<(), ModelError> {
        if self.version.major != SUPPORTED_MAJOR {
            return Err(ModelError::InvalidTables(format!(
                "unsupported tables version {} (expected {SUPPORTED_MAJOR}.x)",
                self.version
            )));
        }
        let s = &self.scoring;
        if !(0.0..=MAX_JITTER).contains(&s.jitter) {
            return Err(ModelError::InvalidTables(format!(
                "jitter must be within 0..={MAX_JITTER}, got {}",
                s.jitter
            )));
        }
        let t = &s.time_bands;
        let weights = [
            ("base_risk", s.base_risk),
            ("age_weight", s.age_weight),
            ("age_cap", s.age_cap),
            ("novice_weight", s.novice_weight),
            ("default_task_risk", s.default_task_risk),
            ("night_factor", t.night_factor),
            ("day_factor", t.day_factor),
            ("other_factor", t.other_factor),
        ];
        let task_weights = s.task_risk.iter().map(|(id, v)| (id.as_str(), *v));
        for (name, value) in weights.into_iter().chain(task_weights) {
            if !(0.0..=MAX_WEIGHT).contains(&value) {
                return Err(ModelError::InvalidTables(format!(
                    "{name} must be within 0..={MAX_WEIGHT}, got {value}"
                )));
            }
        }
        if t.night_from > 23 || t.night_until > 23 || t.day_from > t.day_until || t.day_until > 23
        {
            return Err(ModelError::InvalidTables(
                "time bands must be hours within 0..=23 with day_from <= day_until".into(),
            ));
        }
        if self.keywords.common.len() < self.keywords.fallback_count {
            return Err(ModelError::InvalidTables(format!(
                "fallback_count {} exceeds {} common keywords",
                self.keywords.fallback_count,
                self.keywords.common.len()
            )));
        }
        if self.measures.baseline.is_empty() {
            return Err(ModelError::InvalidTables(
                "at least one baseline measure is required".into(),
            ));
        }
        Ok(())
    }

    /// Built-in rule tables.
    pub fn default_tables() -> Self {
        Self {
            version: Version::new(1, 0, 0),
            scoring: ScoringRules::default(),
            keywords: KeywordRules::default(),
            measures: MeasureRules::default(),
        }
    }
}

impl Default for RiskTables {
    fn default() -> Self {
        Self::default_tables()
    }
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringRules {
    /// Starting point of the personal base risk.
    pub base_risk: f64,

    /// Age with no age penalty.
    pub reference_age: u32,
    /// Penalty per year of distance from `reference_age`.
    pub age_weight: f64,
    /// Upper bound of the age penalty.
    pub age_cap: f64,

    /// Tenure below which the novice penalty applies.
    pub novice_years: u32,
    /// Penalty per missing year below `novice_years`.
    pub novice_weight: f64,

    /// Per-task base risk keyed by task id.
    pub task_risk: BTreeMap<String, f64>,
    /// Task risk for ids missing from `task_risk`.
    pub default_task_risk: f64,

    pub time_bands: TimeBands,

    /// Half-width of the uniform jitter added to every score. Zero disables it.
    pub jitter: f64,
}

impl ScoringRules {
    pub fn task_risk(&self, task: &TaskCategory) -> Option<f64> {
        self.task_risk.get(task.id()).copied()
    }
}

impl Default for ScoringRules {
    fn default() -> Self {
        let task_risk = [
            (TaskCategory::LaminatedArmor, 7.2),
            (TaskCategory::EngineMaintenance, 6.8),
            (TaskCategory::ElectricalSystems, 7.5),
            (TaskCategory::HydraulicSystems, 8.1),
            (TaskCategory::WeaponsSystems, 8.5),
        ]
        .into_iter()
        .map(|(task, risk)| (task.id().to_string(), risk))
        .collect();

        Self {
            base_risk: 5.0,
            reference_age: 30,
            age_weight: 0.05,
            age_cap: 2.0,
            novice_years: 3,
            novice_weight: 0.3,
            task_risk,
            default_task_risk: 7.0,
            time_bands: TimeBands::default(),
            jitter: 0.5,
        }
    }
}

/// Hour-of-day multipliers. Night wraps around midnight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeBands {
    /// Night starts at this hour (inclusive)...
    pub night_from: u32,
    /// ...and ends at this hour (inclusive) the next morning.
    pub night_until: u32,
    pub night_factor: f64,

    pub day_from: u32,
    pub day_until: u32,
    pub day_factor: f64,

    /// Factor for every other hour.
    pub other_factor: f64,
}

impl TimeBands {
    pub fn factor(&self, hour_of_day: u32) -> f64 {
        if hour_of_day >= self.night_from || hour_of_day <= self.night_until {
            self.night_factor
        } else if (self.day_from..=self.day_until).contains(&hour_of_day) {
            self.day_factor
        } else {
            self.other_factor
        }
    }
}

impl Default for TimeBands {
    fn default() -> Self {
        Self {
            night_from: 22,
            night_until: 6,
            night_factor: 1.2,
            day_from: 8,
            day_until: 17,
            day_factor: 0.9,
            other_factor: 1.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Trait-conditioned additions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraitAttribute {
    Age,
    ServiceYears,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    AtLeast,
    AtMost,
}

/// Extra entries added when a profile attribute crosses a threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraitRule {
    pub attribute: TraitAttribute,
    pub comparison: Comparison,
    pub threshold: u32,
    pub entries: Vec<String>,
}

impl TraitRule {
    fn new(
        attribute: TraitAttribute,
        comparison: Comparison,
        threshold: u32,
        entries: &[&str],
    ) -> Self {
        Self {
            attribute,
            comparison,
            threshold,
            entries: strings(entries),
        }
    }

    pub fn matches(&self, profile: &PersonProfile) -> bool {
        let value = match self.attribute {
            TraitAttribute::Age => profile.age(),
            TraitAttribute::ServiceYears => profile.service_years(),
        };
        match self.comparison {
            Comparison::AtLeast => value >= self.threshold,
            Comparison::AtMost => value <= self.threshold,
        }
    }
}

/// Entries contributed by `rules` for `profile`.
///
/// Rules are checked in order and only the first match per attribute
/// contributes, so an age rule list reads as an if/else-if chain.
pub fn trait_entries<'a>(rules: &'a [TraitRule], profile: &PersonProfile) -> Vec<&'a str> {
    let mut seen: Vec<TraitAttribute> = Vec::new();
    let mut out = Vec::new();
    for rule in rules {
        if seen.contains(&rule.attribute) || !rule.matches(profile) {
            continue;
        }
        seen.push(rule.attribute);
        out.extend(rule.entries.iter().map(String::as_str));
    }
    out
}

// ---------------------------------------------------------------------------
// Keywords
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordRules {
    /// Per-task keywords keyed by task id.
    pub by_task: BTreeMap<String, Vec<String>>,
    /// Generic keywords added for every task.
    pub common: Vec<String>,
    /// How many leading `common` entries stand in for an unknown task's list.
    pub fallback_count: usize,
    pub traits: Vec<TraitRule>,
}

impl Default for KeywordRules {
    fn default() -> Self {
        let by_task = [
            (
                TaskCategory::LaminatedArmor,
                &[
                    "Lamination work hazard",
                    "Adhesive chemical exposure",
                    "High-temperature curing",
                    "Press operation caution",
                    "Poor ventilation",
                    "Fire hazard",
                ],
            ),
            (
                TaskCategory::EngineMaintenance,
                &[
                    "Contact with hot engine parts",
                    "Fuel leak",
                    "Caught in rotating parts",
                    "Oil slip",
                    "Exhaust gas inhalation",
                    "Electrical short",
                ],
            ),
            (
                TaskCategory::ElectricalSystems,
                &[
                    "Electrocution hazard",
                    "Leakage-current fire",
                    "High-voltage current",
                    "Insulation failure",
                    "Inadequate grounding",
                    "Damaged wiring",
                ],
            ),
            (
                TaskCategory::HydraulicSystems,
                &[
                    "High-pressure fluid jet",
                    "Hydraulic hose rupture",
                    "Oil leak",
                    "Pressure vessel explosion",
                    "Slip accident",
                    "Burn hazard",
                ],
            ),
            (
                TaskCategory::WeaponsSystems,
                &[
                    "Explosion hazard in ordnance handling",
                    "Propellant fire",
                    "Mechanical impact",
                    "Metal fragments",
                    "Noise damage",
                    "Toxic gas",
                ],
            ),
        ]
        .into_iter()
        .map(|(task, words)| (task.id().to_string(), strings(words)))
        .collect();

        Self {
            by_task,
            common: strings(&[
                "Missing personal protective equipment",
                "Procedure non-compliance",
                "Insufficient safety training",
                "Accumulated fatigue",
                "Divided attention",
                "Emergency response",
                "Poor communication with coworkers",
                "Inadequate equipment inspection",
                "Environmental factors",
            ]),
            fallback_count: 6,
            traits: vec![
                TraitRule::new(
                    TraitAttribute::Age,
                    Comparison::AtLeast,
                    50,
                    &["Reduced physical capacity", "Slower reaction time"],
                ),
                TraitRule::new(
                    TraitAttribute::Age,
                    Comparison::AtMost,
                    25,
                    &["Lack of experience", "Overconfidence"],
                ),
                TraitRule::new(
                    TraitAttribute::ServiceYears,
                    Comparison::AtMost,
                    2,
                    &["Insufficient proficiency", "Unfamiliar with procedures"],
                ),
                TraitRule::new(
                    TraitAttribute::ServiceYears,
                    Comparison::AtLeast,
                    15,
                    &["Habitual work patterns", "Safety complacency"],
                ),
            ],
        }
    }
}

// ---------------------------------------------------------------------------
// Measures
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasureRules {
    /// Always listed first.
    pub baseline: Vec<String>,
    /// Task-specific measures keyed by task id. Tasks without an entry add none.
    pub by_task: BTreeMap<String, Vec<String>>,
    pub traits: Vec<TraitRule>,
    /// A keyword containing any of these (case-insensitive) raises the priority.
    pub priority_terms: Vec<String>,
}

impl Default for MeasureRules {
    fn default() -> Self {
        let by_task = [
            (
                TaskCategory::LaminatedArmor,
                &[
                    "Run workshop ventilation and monitor air quality",
                    "Wear a gas mask whenever adhesives are in use",
                    "Guard against burns around high-temperature equipment",
                ],
            ),
            (
                TaskCategory::EngineMaintenance,
                &[
                    "Check fuel leak detectors before starting work",
                    "No loose clothing when working on rotating parts",
                    "Service the engine only after it has cooled down",
                ],
            ),
            (
                TaskCategory::ElectricalSystems,
                &[
                    "Cut power and confirm zero voltage with a tester",
                    "Use insulated gloves and insulated tools",
                    "Take extra care when working on humid days",
                ],
            ),
        ]
        .into_iter()
        .map(|(task, measures)| (task.id().to_string(), strings(measures)))
        .collect();

        Self {
            baseline: strings(&[
                "Wear full personal protective equipment (helmet, safety glasses, coveralls, safety boots)",
                "Complete the pre-work safety checklist without exception",
                "Work in two-person teams with mutual safety checks",
                "Take a 10-minute break every hour to manage fatigue",
                "Review emergency procedures and the emergency contact list",
            ]),
            by_task,
            traits: vec![
                TraitRule::new(
                    TraitAttribute::Age,
                    Comparison::AtLeast,
                    45,
                    &["Provide ample lighting to keep the work area clearly visible"],
                ),
                TraitRule::new(
                    TraitAttribute::ServiceYears,
                    Comparison::AtMost,
                    3,
                    &["Work under the supervision of an experienced technician"],
                ),
            ],
            priority_terms: strings(&["explosion", "fire", "electrocution"]),
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use ds_core::profile::Gender;

    #[test]
    fn builtin_is_shared() {
        let a = RiskTables::builtin();
        let b = RiskTables::builtin();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn builtin_table_shapes() {
        let t = RiskTables::default_tables();
        assert_eq!(t.scoring.task_risk.len(), 5);
        for words in t.keywords.by_task.values() {
            assert_eq!(words.len(), 6);
        }
        assert_eq!(t.keywords.common.len(), 9);
        assert_eq!(t.measures.baseline.len(), 5);
        assert_eq!(t.measures.by_task.len(), 3);
    }

    #[test]
    fn time_bands() {
        let b = TimeBands::default();
        assert_eq!(b.factor(23), 1.2);
        assert_eq!(b.factor(0), 1.2);
        assert_eq!(b.factor(6), 1.2);
        assert_eq!(b.factor(7), 1.0);
        assert_eq!(b.factor(8), 0.9);
        assert_eq!(b.factor(17), 0.9);
        assert_eq!(b.factor(18), 1.0);
        assert_eq!(b.factor(21), 1.0);
        assert_eq!(b.factor(22), 1.2);
    }

    #[test]
    fn json_round_trip_keeps_fingerprint() {
        let t = RiskTables::default_tables();
        let json = t.to_json_pretty().unwrap();
        let back = RiskTables::from_json(&json).unwrap();
        assert_eq!(back, t);
        assert_eq!(back.fingerprint().unwrap(), t.fingerprint().unwrap());
        assert_eq!(t.fingerprint().unwrap().len(), 64);
    }

    #[test]
    fn fingerprint_changes_with_content() {
        let mut t = RiskTables::default_tables();
        let before = t.fingerprint().unwrap();
        t.scoring.jitter = 0.0;
        assert_ne!(t.fingerprint().unwrap(), before);
    }

    #[test]
    fn rejects_other_major_version() {
        let mut t = RiskTables::default_tables();
        t.version = Version::new(2, 0, 0);
        let json = serde_json::to_string(&t).unwrap();
        let err = RiskTables::from_json(&json).unwrap_err();
        assert!(matches!(err, ModelError::InvalidTables(_)));
    }

    #[test]
    fn rejects_negative_jitter() {
        let mut t = RiskTables::default_tables();
        t.scoring.jitter = -1.0;
        let json = serde_json::to_string(&t).unwrap();
        assert!(RiskTables::from_json(&json).is_err());
    }

    #[test]
    fn rejects_oversized_jitter() {
        let mut t = RiskTables::default_tables();
        t.scoring.jitter = 1e308;
        let json = serde_json::to_string(&t).unwrap();
        let err = RiskTables::from_json(&json).unwrap_err();
        assert!(err.to_string().contains("jitter"));

        t.scoring.jitter = MAX_JITTER;
        assert!(RiskTables::from_json(&serde_json::to_string(&t).unwrap()).is_ok());
    }

    #[test]
    fn rejects_non_finite_scoring() {
        let mut doc = serde_json::to_value(RiskTables::default_tables()).unwrap();
        doc["scoring"]["base_risk"] = serde_json::json!(1e308);
        let err = RiskTables::from_json(&doc.to_string()).unwrap_err();
        assert!(err.to_string().contains("base_risk"));

        let mut doc = serde_json::to_value(RiskTables::default_tables()).unwrap();
        doc["scoring"]["task_risk"]["laminated-armor"] = serde_json::json!(1e308);
        let err = RiskTables::from_json(&doc.to_string()).unwrap_err();
        assert!(err.to_string().contains("laminated-armor"));

        let mut doc = serde_json::to_value(RiskTables::default_tables()).unwrap();
        doc["scoring"]["time_bands"]["day_factor"] = serde_json::json!(-0.5);
        let err = RiskTables::from_json(&doc.to_string()).unwrap_err();
        assert!(err.to_string().contains("day_factor"));

        // Overflowing literals never reach validation.
        let json = RiskTables::default_tables()
            .to_json_pretty()
            .unwrap()
            .replace("\"jitter\": 0.5", "\"jitter\": 1e400");
        assert!(json.contains("1e400"));
        assert!(RiskTables::from_json(&json).is_err());
    }

    #[test]
    fn from_path_reads_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tables.json");
        std::fs::write(&path, RiskTables::default_tables().to_json_pretty().unwrap()).unwrap();
        assert_eq!(RiskTables::from_path(&path).unwrap(), RiskTables::default_tables());

        let missing = RiskTables::from_path(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(missing, ModelError::Io(_)));
    }

    #[test]
    fn trait_rules_act_as_else_if() {
        let rules = vec![
            TraitRule::new(TraitAttribute::Age, Comparison::AtLeast, 20, &["a"]),
            TraitRule::new(TraitAttribute::Age, Comparison::AtMost, 40, &["b"]),
            TraitRule::new(TraitAttribute::ServiceYears, Comparison::AtMost, 2, &["c"]),
        ];
        let p = PersonProfile::new("x", Gender::Male, 30, 1).unwrap();
        assert_eq!(trait_entries(&rules, &p), vec!["a", "c"]);
    }
}
