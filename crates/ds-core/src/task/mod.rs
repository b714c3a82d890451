//! Task categories — the closed set of assignable duty types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An assignable duty type.
///
/// Anything outside the closed set is kept verbatim as [`TaskCategory::Other`];
/// rule lookups fall back to their defaults for it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskCategory {
    LaminatedArmor,
    EngineMaintenance,
    ElectricalSystems,
    HydraulicSystems,
    WeaponsSystems,
    Other(String),
}

impl TaskCategory {
    /// Every recognized category, in canonical order.
    pub const KNOWN: [TaskCategory; 5] = [
        TaskCategory::LaminatedArmor,
        TaskCategory::EngineMaintenance,
        TaskCategory::ElectricalSystems,
        TaskCategory::HydraulicSystems,
        TaskCategory::WeaponsSystems,
    ];

    /// Case-sensitive match against the kebab-case ids and the Korean labels.
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "laminated-armor" | "복합적층장갑" => TaskCategory::LaminatedArmor,
            "engine-maintenance" | "엔진정비" => TaskCategory::EngineMaintenance,
            "electrical-systems" | "전기계통" => TaskCategory::ElectricalSystems,
            "hydraulic-systems" | "유압시스템" => TaskCategory::HydraulicSystems,
            "weapons-systems" | "무기체계" => TaskCategory::WeaponsSystems,
            other => TaskCategory::Other(other.to_string()),
        }
    }

    /// Stable identifier used as the rule-table key.
    pub fn id(&self) -> &str {
        match self {
            TaskCategory::LaminatedArmor => "laminated-armor",
            TaskCategory::EngineMaintenance => "engine-maintenance",
            TaskCategory::ElectricalSystems => "electrical-systems",
            TaskCategory::HydraulicSystems => "hydraulic-systems",
            TaskCategory::WeaponsSystems => "weapons-systems",
            TaskCategory::Other(name) => name,
        }
    }

    /// Human-readable name.
    pub fn display_name(&self) -> &str {
        match self {
            TaskCategory::LaminatedArmor => "Laminated armor",
            TaskCategory::EngineMaintenance => "Engine maintenance",
            TaskCategory::ElectricalSystems => "Electrical systems",
            TaskCategory::HydraulicSystems => "Hydraulic systems",
            TaskCategory::WeaponsSystems => "Weapons systems",
            TaskCategory::Other(name) => name,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, TaskCategory::Other(_))
    }

    /// Candidates ranked by the task recommender when none are given:
    /// every known category except weapons systems.
    pub fn default_candidates() -> Vec<TaskCategory> {
        vec![
            TaskCategory::LaminatedArmor,
            TaskCategory::EngineMaintenance,
            TaskCategory::ElectricalSystems,
            TaskCategory::HydraulicSystems,
        ]
    }
}

impl fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl From<&str> for TaskCategory {
    fn from(s: &str) -> Self {
        TaskCategory::parse(s)
    }
}

impl From<String> for TaskCategory {
    fn from(s: String) -> Self {
        TaskCategory::parse(&s)
    }
}

impl From<TaskCategory> for String {
    fn from(task: TaskCategory) -> Self {
        task.id().to_string()
    }
}

impl std::str::FromStr for TaskCategory {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(TaskCategory::parse(s))
    }
}
