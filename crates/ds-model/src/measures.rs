//! Safety measure recommendation.

use crate::tables::{trait_entries, MeasureRules};
use ds_core::assessment::{Priority, SafetyMeasures};
use ds_core::profile::PersonProfile;
use ds_core::report::MAX_MEASURES;
use ds_core::task::TaskCategory;

/// Baseline measures first, then task measures, then trait measures,
/// truncated to `count` (at most [`MAX_MEASURES`]).
pub fn recommend_measures(
    rules: &MeasureRules,
    profile: &PersonProfile,
    task: &TaskCategory,
    keywords: &[String],
    count: usize,
) -> SafetyMeasures {
    let task_measures = rules
        .by_task
        .get(task.id())
        .map(Vec::as_slice)
        .unwrap_or_default();

    let measures: Vec<String> = rules
        .baseline
        .iter()
        .chain(task_measures)
        .map(String::as_str)
        .chain(trait_entries(&rules.traits, profile))
        .take(count.min(MAX_MEASURES))
        .map(str::to_string)
        .collect();

    let priority = priority_for(rules, keywords);
    let summary = format!(
        "{} tailored safety measures for {} on {}",
        measures.len(),
        profile.name(),
        task.display_name()
    );

    SafetyMeasures {
        measures,
        summary,
        priority,
    }
}

/// High when any keyword mentions one of the priority terms.
pub fn priority_for(rules: &MeasureRules, keywords: &[String]) -> Priority {
    let terms: Vec<String> = rules.priority_terms.iter().map(|t| t.to_lowercase()).collect();
    let hit = keywords.iter().any(|k| {
        let k = k.to_lowercase();
        terms.iter().any(|t| k.contains(t.as_str()))
    });
    if hit {
        Priority::High
    } else {
        Priority::Medium
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ds_core::profile::Gender;

    fn rules() -> MeasureRules {
        MeasureRules::default()
    }

    fn kw(words: &[&str]) -> Vec<String> {
        words.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn baseline_always_first() {
        let p = PersonProfile::new("Kim", Gender::Male, 50, 1).unwrap();
        for task in TaskCategory::KNOWN {
            let m = recommend_measures(&rules(), &p, &task, &[], 5);
            assert_eq!(m.measures, rules().baseline);
        }
    }

    #[test]
    fn task_and_trait_measures_follow_baseline() {
        let p = PersonProfile::new("Kim", Gender::Male, 50, 1).unwrap();
        let r = rules();
        let pool: Vec<&str> = r
            .baseline
            .iter()
            .chain(&r.by_task["electrical-systems"])
            .map(String::as_str)
            .chain(trait_entries(&r.traits, &p))
            .collect();
        // 5 baseline + 3 task + 2 trait
        assert_eq!(pool.len(), 10);
        assert_eq!(pool[5], "Cut power and confirm zero voltage with a tester");
        assert_eq!(
            pool[9],
            "Work under the supervision of an experienced technician"
        );

        let m = recommend_measures(&r, &p, &TaskCategory::ElectricalSystems, &[], 3);
        assert_eq!(m.measures, r.baseline[..3].to_vec());
    }

    #[test]
    fn count_is_capped_at_five() {
        let p = PersonProfile::new("Kim", Gender::Male, 30, 5).unwrap();
        let m = recommend_measures(&rules(), &p, &TaskCategory::LaminatedArmor, &[], 20);
        assert_eq!(m.measures.len(), 5);
        assert_eq!(m.summary, "5 tailored safety measures for Kim on Laminated armor");
    }

    #[test]
    fn never_empty_for_unknown_task() {
        let p = PersonProfile::new("Kim", Gender::Male, 30, 5).unwrap();
        let task = TaskCategory::Other("painting".into());
        let m = recommend_measures(&rules(), &p, &task, &[], 1);
        assert_eq!(m.measures.len(), 1);
    }

    #[test]
    fn priority_from_keywords() {
        let r = rules();
        assert_eq!(priority_for(&r, &kw(&["Fire hazard"])), Priority::High);
        assert_eq!(priority_for(&r, &kw(&["Electrocution hazard"])), Priority::High);
        assert_eq!(
            priority_for(&r, &kw(&["Pressure vessel explosion", "Oil leak"])),
            Priority::High
        );
        assert_eq!(priority_for(&r, &kw(&["Oil leak", "Fuel leak"])), Priority::Medium);
        assert_eq!(priority_for(&r, &[]), Priority::Medium);
    }
}
