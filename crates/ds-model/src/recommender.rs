//! Task Recommender — rank candidate tasks by their current estimated score.

use crate::estimator::ScoreEstimator;
use ds_core::assessment::TaskScore;
use ds_core::profile::PersonProfile;
use ds_core::task::TaskCategory;
use rand::Rng;

/// Estimate every candidate at the current hour and sort ascending by score.
///
/// The sort is stable, so equal scores keep their input order. Repeated
/// candidates are ranked once, at their first position.
pub fn recommend_safest_tasks<R: Rng + ?Sized>(
    estimator: &ScoreEstimator,
    profile: &PersonProfile,
    candidates: Option<&[TaskCategory]>,
    rng: &mut R,
) -> Vec<TaskScore> {
    let defaults;
    let candidates = match candidates {
        Some(c) => c,
        None => {
            defaults = TaskCategory::default_candidates();
            &defaults[..]
        }
    };

    let mut ranked: Vec<TaskScore> = Vec::with_capacity(candidates.len());
    for task in candidates {
        if ranked.iter().any(|r| &r.task == task) {
            continue;
        }
        let score = estimator.estimate(profile, task, 0, rng);
        ranked.push(TaskScore::new(task.clone(), score));
    }

    ranked.sort_by(|a, b| a.score.total_cmp(&b.score));
    tracing::debug!(
        candidates = ranked.len(),
        safest = ranked.first().map(|r| r.task.id()).unwrap_or("-"),
        "ranked candidate tasks"
    );
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::tables::RiskTables;
    use ds_core::profile::Gender;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    fn estimator() -> ScoreEstimator {
        let mut tables = RiskTables::default_tables();
        tables.scoring.jitter = 0.0;
        ScoreEstimator::new(Arc::new(tables), Arc::new(FixedClock::at_hour(10)))
    }

    fn profile() -> PersonProfile {
        PersonProfile::new("Kim", Gender::Male, 30, 5).unwrap()
    }

    #[test]
    fn default_candidates_sorted_ascending() {
        let mut rng = StdRng::seed_from_u64(0);
        let ranked = recommend_safest_tasks(&estimator(), &profile(), None, &mut rng);
        let order: Vec<_> = ranked.iter().map(|r| r.task.clone()).collect();
        assert_eq!(
            order,
            vec![
                TaskCategory::EngineMaintenance,
                TaskCategory::LaminatedArmor,
                TaskCategory::ElectricalSystems,
                TaskCategory::HydraulicSystems,
            ]
        );
        assert!(ranked.windows(2).all(|w| w[0].score <= w[1].score));
    }

    #[test]
    fn equal_scores_keep_input_order() {
        // Unknown tasks all fall back to the same default risk.
        let candidates = vec![
            TaskCategory::Other("zeta".into()),
            TaskCategory::Other("alpha".into()),
            TaskCategory::EngineMaintenance,
            TaskCategory::Other("mu".into()),
        ];
        let mut rng = StdRng::seed_from_u64(0);
        let ranked = recommend_safest_tasks(
            &estimator(),
            &profile(),
            Some(candidates.as_slice()),
            &mut rng,
        );
        let ids: Vec<_> = ranked.iter().map(|r| r.task.id().to_string()).collect();
        assert_eq!(ids, vec!["engine-maintenance", "zeta", "alpha", "mu"]);
    }

    #[test]
    fn duplicate_candidates_ranked_once() {
        let candidates = vec![
            TaskCategory::WeaponsSystems,
            TaskCategory::LaminatedArmor,
            TaskCategory::WeaponsSystems,
        ];
        let mut rng = StdRng::seed_from_u64(0);
        let ranked = recommend_safest_tasks(
            &estimator(),
            &profile(),
            Some(candidates.as_slice()),
            &mut rng,
        );
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].task, TaskCategory::LaminatedArmor);
        assert_eq!(ranked[0].note, "risk score 5.5 - low");
    }

    #[test]
    fn empty_candidates() {
        let mut rng = StdRng::seed_from_u64(0);
        let ranked = recommend_safest_tasks(&estimator(), &profile(), Some(&[][..]), &mut rng);
        assert!(ranked.is_empty());
    }
}
