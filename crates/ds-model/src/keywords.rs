//! Keyword Selector — risk keywords for a profile and task.

use crate::tables::{trait_entries, KeywordRules};
use ds_core::profile::PersonProfile;
use ds_core::report::MAX_KEYWORDS;
use ds_core::task::TaskCategory;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

/// Select up to `count` (at most [`MAX_KEYWORDS`]) distinct keywords.
///
/// The pool from [`keyword_pool`] is shuffled with `rng` before truncation,
/// so the result is unordered; a fixed seed makes it reproducible.
pub fn select_keywords<R: Rng + ?Sized>(
    rules: &KeywordRules,
    profile: &PersonProfile,
    task: &TaskCategory,
    count: usize,
    rng: &mut R,
) -> Vec<String> {
    let mut pool = keyword_pool(rules, profile, task);
    pool.shuffle(rng);
    pool.truncate(count.min(MAX_KEYWORDS));
    pool
}

/// Every candidate keyword, deduplicated, in table order: the task's
/// keywords (or the leading generic ones for an unlisted task), then every
/// generic keyword, then trait additions.
pub fn keyword_pool(
    rules: &KeywordRules,
    profile: &PersonProfile,
    task: &TaskCategory,
) -> Vec<String> {
    let task_words: &[String] = match rules.by_task.get(task.id()) {
        Some(words) => words,
        None => {
            tracing::debug!(task = %task, "no keyword table for task, using generic keywords");
            &rules.common[..rules.fallback_count.min(rules.common.len())]
        }
    };

    let mut seen = HashSet::new();
    task_words
        .iter()
        .map(String::as_str)
        .chain(rules.common.iter().map(String::as_str))
        .chain(trait_entries(&rules.traits, profile))
        .filter(|word| seen.insert(*word))
        .map(str::to_string)
        .collect()
}
