//! ds-export: Report export — four-sheet xlsx workbook and JSON.

pub mod json;
pub mod workbook;

use ds_core::report::{PredictionReport, RunMetadata};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("workbook error: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),
    #[error("serialization error: {0}")]
    Serialize(String),
    #[error("io error: {0}")]
    Io(String),
    #[error("unsupported export format: {0}")]
    UnsupportedFormat(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Xlsx,
    Json,
}

impl ExportFormat {
    /// Pick the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self, ExportError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "xlsx" => Ok(ExportFormat::Xlsx),
            "json" => Ok(ExportFormat::Json),
            "" => Err(ExportError::UnsupportedFormat(format!(
                "{} has no extension (expected .xlsx or .json)",
                path.display()
            ))),
            other => Err(ExportError::UnsupportedFormat(other.to_string())),
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Json => "json",
        }
    }
}

/// `safety_report_<task>_<YYYYmmdd_HHMMSS>.<ext>`
pub fn default_file_name(report: &PredictionReport, format: ExportFormat) -> String {
    let task: String = report
        .task
        .id()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    format!(
        "safety_report_{task}_{}.{}",
        report.generated_at.format("%Y%m%d_%H%M%S"),
        format.extension()
    )
}

/// Export to `path`, choosing the format from its extension.
pub fn export_to_path(
    report: &PredictionReport,
    metadata: &RunMetadata,
    path: &Path,
) -> Result<ExportFormat, ExportError> {
    let format = ExportFormat::from_path(path)?;
    match format {
        ExportFormat::Xlsx => workbook::write_workbook(report, metadata, path)?,
        ExportFormat::Json => {
            let body = json::export_json(report, metadata)?;
            std::fs::write(path, body)
                .map_err(|e| ExportError::Io(format!("failed to write {}: {e}", path.display())))?;
        }
    }
    tracing::info!(path = %path.display(), format = ?format, "report exported");
    Ok(format)
}

#[cfg(test)]
pub(crate) mod fixtures {
    use ds_core::profile::{Gender, PersonProfile};
    use ds_core::report::{Horizon, PredictionReport, PredictionRequest, RunMetadata};
    use ds_core::task::TaskCategory;
    use ds_model::clock::FixedClock;
    use ds_model::SafetyModel;
    use std::sync::Arc;

    pub fn sample(request: PredictionRequest) -> (PredictionReport, RunMetadata) {
        let model = SafetyModel::with_builtin_tables(Arc::new(FixedClock::at_hour(10))).unwrap();
        model.predict_with_metadata(&request).unwrap()
    }

    pub fn integrated() -> (PredictionReport, RunMetadata) {
        let profile = PersonProfile::new("Kim", Gender::Male, 30, 5).unwrap();
        sample(
            PredictionRequest::new(profile, TaskCategory::LaminatedArmor)
                .with_horizon(Horizon::Day)
                .with_seed(1),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn format_from_extension() {
        assert_eq!(
            ExportFormat::from_path(&PathBuf::from("out/report.XLSX")).unwrap(),
            ExportFormat::Xlsx
        );
        assert_eq!(
            ExportFormat::from_path(&PathBuf::from("report.json")).unwrap(),
            ExportFormat::Json
        );
        assert!(ExportFormat::from_path(&PathBuf::from("report.csv")).is_err());
        assert!(ExportFormat::from_path(&PathBuf::from("report")).is_err());
    }

    #[test]
    fn default_name_uses_task_and_time() {
        let (report, _) = fixtures::integrated();
        let name = default_file_name(&report, ExportFormat::Xlsx);
        assert_eq!(name, "safety_report_laminated-armor_20260115_100000.xlsx");
    }

    #[test]
    fn export_dispatches_on_extension() {
        let (report, meta) = fixtures::integrated();
        let dir = tempfile::tempdir().unwrap();

        let json_path = dir.path().join("r.json");
        assert_eq!(export_to_path(&report, &meta, &json_path).unwrap(), ExportFormat::Json);
        assert!(std::fs::read_to_string(&json_path).unwrap().contains("\"report\""));

        let xlsx_path = dir.path().join("r.xlsx");
        assert_eq!(export_to_path(&report, &meta, &xlsx_path).unwrap(), ExportFormat::Xlsx);
        assert!(xlsx_path.exists());
    }
}
