//! `recommend` — rank candidate tasks for one person.

use crate::cli::{OutputFormat, RecommendArgs};
use crate::commands::predict::unknown_task_note;
use crate::state::AppState;
use anyhow::Result;
use ds_core::assessment::TaskScore;
use ds_core::task::TaskCategory;
use std::fmt::Write as _;

pub async fn run(state: &AppState, args: RecommendArgs, format: OutputFormat) -> Result<()> {
    let profile = args.profile.to_input().parse()?;
    let candidates = args
        .tasks
        .map(|names| names.iter().map(|n| TaskCategory::parse(n)).collect::<Vec<_>>());
    for task in candidates.iter().flatten() {
        if let Some(note) = unknown_task_note(task) {
            eprintln!("{note}");
        }
    }

    let ranked = state
        .worker
        .recommend(profile, candidates, args.seed)
        .await?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&ranked)?),
        OutputFormat::Table => print!("{}", render(&ranked)),
    }
    Ok(())
}

pub fn render(ranked: &[TaskScore]) -> String {
    if ranked.is_empty() {
        return "No candidate tasks.\n".to_string();
    }
    let mut out = String::from("Rank  Task                    Score  Level\n");
    for (i, ts) in ranked.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>4}  {:<22} {:>6.1}  {}",
            i + 1,
            ts.task.display_name(),
            ts.score,
            ts.level
        );
    }
    out
}
