//! `predict` — run one prediction through the worker, print it, optionally export it.

use crate::cli::{OutputFormat, PredictArgs};
use crate::state::AppState;
use anyhow::{Context, Result};
use ds_core::report::{PredictionReport, PredictionRequest};
use ds_core::task::TaskCategory;
use ds_export::{default_file_name, ExportFormat};
use ds_runner::PredictionOutcome;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

pub async fn run(state: &AppState, args: PredictArgs, format: OutputFormat) -> Result<()> {
    let profile = args.profile.to_input().parse()?;
    let task = TaskCategory::parse(&args.task);
    if let Some(note) = unknown_task_note(&task) {
        eprintln!("{note}");
    }

    let mut request = PredictionRequest::new(profile, task)
        .with_mode(args.mode.unwrap_or(state.config.default_mode))
        .with_horizon(args.horizon.unwrap_or(state.config.default_horizon));
    request.device = args.device.unwrap_or(state.config.device);
    request.seed = args.seed;
    request.keyword_count = args.keywords;
    request.measure_count = args.measures;

    let outcome = state.worker.run(request).await?;

    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                ds_export::json::export_json(&outcome.report, &outcome.metadata)?
            );
        }
        OutputFormat::Table => print!("{}", render(&outcome)),
    }

    if let Some(target) = &args.export {
        let path = export_target(state, target, &outcome.report);
        ds_export::export_to_path(&outcome.report, &outcome.metadata, &path)
            .with_context(|| format!("failed to export report to {}", path.display()))?;
        eprintln!("Report exported to {}", path.display());
    }
    Ok(())
}

/// Stderr note for tasks outside the known set; they score with defaults.
pub fn unknown_task_note(task: &TaskCategory) -> Option<String> {
    (!task.is_known()).then(|| {
        format!("Note: '{task}' is not a known task category; default risk and keywords apply.")
    })
}

/// Resolve `--export`: relative paths go under the configured export
/// directory, and an existing directory gets a generated xlsx file name.
fn export_target(state: &AppState, target: &Path, report: &PredictionReport) -> PathBuf {
    let path = state.config.export_path(target);
    if path.is_dir() {
        path.join(default_file_name(report, ExportFormat::Xlsx))
    } else {
        path
    }
}

/// Human-readable report.
pub fn render(outcome: &PredictionOutcome) -> String {
    let report = &outcome.report;
    let profile = &report.profile;
    let mut out = String::new();

    let _ = writeln!(out, "Safety prediction ({} mode)", report.mode);
    let _ = writeln!(
        out,
        "  {} | {} | age {} | {} years of service",
        profile.name(),
        profile.gender(),
        profile.age(),
        profile.service_years()
    );
    let _ = writeln!(out, "  Task: {}", report.task.display_name());
    let _ = writeln!(
        out,
        "  Generated: {}",
        report.generated_at.format("%Y-%m-%d %H:%M:%S")
    );

    if let Some(forecast) = &report.forecast {
        out.push('\n');
        if let Some(current) = forecast.current() {
            let _ = writeln!(
                out,
                "Risk score: {:.1} ({})",
                current.score, current.level
            );
        }
        let _ = write!(
            out,
            "Horizon {}: mean {:.1}",
            report.horizon, forecast.mean_score
        );
        if let Some(peak) = &forecast.peak {
            let _ = write!(
                out,
                ", peak {:.1} at {}",
                peak.score,
                peak.timestamp.format("%m-%d %H:00")
            );
        }
        out.push('\n');

        out.push_str("\nSafest tasks:\n");
        for (i, ts) in forecast.safest_tasks.iter().enumerate() {
            let _ = writeln!(
                out,
                "  {}. {:<22} {:>4.1}  {}",
                i + 1,
                ts.task.display_name(),
                ts.score,
                ts.level
            );
        }
    }

    if let Some(guidance) = &report.guidance {
        out.push_str("\nRisk keywords:\n");
        for (i, keyword) in guidance.keywords.iter().enumerate() {
            let _ = writeln!(out, "  {:>2}. {keyword}", i + 1);
        }

        out.push('\n');
        out.push_str(&guidance.analysis);
        out.push_str("\n\n");

        let measures = &guidance.measures;
        let _ = writeln!(
            out,
            "Safety measures (priority: {}):",
            measures.priority
        );
        for (i, m) in measures.measures.iter().enumerate() {
            let _ = writeln!(out, "  {}. {m}", i + 1);
        }
        let _ = writeln!(out, "  {}", measures.summary);
    }

    let _ = writeln!(
        out,
        "\nTables v{} ({}) | {} ms",
        outcome.metadata.tables_version,
        &outcome.metadata.tables_fingerprint[..12.min(outcome.metadata.tables_fingerprint.len())],
        outcome.elapsed_ms
    );
    out
}
