//! JSON export of a report and its run metadata.

use crate::ExportError;
use ds_core::report::{PredictionReport, RunMetadata};
use serde::{Deserialize, Serialize};

/// Top-level JSON document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportDocument {
    pub report: PredictionReport,
    pub metadata: RunMetadata,
}

pub fn export_json(report: &PredictionReport, metadata: &RunMetadata) -> Result<String, ExportError> {
    let doc = ReportDocument {
        report: report.clone(),
        metadata: metadata.clone(),
    };
    serde_json::to_string_pretty(&doc).map_err(|e| ExportError::Serialize(e.to_string()))
}

pub fn parse_json(json: &str) -> Result<ReportDocument, ExportError> {
    serde_json::from_str(json).map_err(|e| ExportError::Serialize(e.to_string()))
}
