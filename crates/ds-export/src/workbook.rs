//! Four-sheet xlsx export: Summary, Keywords, Recommendations, Metadata.

use crate::ExportError;
use ds_core::report::{PredictionReport, RunMetadata};
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::path::Path;

pub const SUMMARY_SHEET: &str = "Summary";
pub const KEYWORDS_SHEET: &str = "Keywords";
pub const RECOMMENDATIONS_SHEET: &str = "Recommendations";
pub const METADATA_SHEET: &str = "Metadata";

/// Sheet names in workbook order.
pub const SHEETS: [&str; 4] = [
    SUMMARY_SHEET,
    KEYWORDS_SHEET,
    RECOMMENDATIONS_SHEET,
    METADATA_SHEET,
];

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Build the workbook in memory.
pub fn build_workbook(
    report: &PredictionReport,
    metadata: &RunMetadata,
) -> Result<Workbook, ExportError> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    write_summary(workbook.add_worksheet(), report, &bold)?;
    write_keywords(workbook.add_worksheet(), report, &bold)?;
    write_recommendations(workbook.add_worksheet(), report, &bold)?;
    write_metadata(workbook.add_worksheet(), report, metadata, &bold)?;

    Ok(workbook)
}

pub fn write_workbook(
    report: &PredictionReport,
    metadata: &RunMetadata,
    path: &Path,
) -> Result<(), ExportError> {
    let mut workbook = build_workbook(report, metadata)?;
    workbook.save(path)?;
    Ok(())
}

/// Serialize the workbook to bytes without touching the filesystem.
pub fn workbook_bytes(
    report: &PredictionReport,
    metadata: &RunMetadata,
) -> Result<Vec<u8>, ExportError> {
    let mut workbook = build_workbook(report, metadata)?;
    Ok(workbook.save_to_buffer()?)
}

// ---------------------------------------------------------------------------
// Sheets
// ---------------------------------------------------------------------------

fn write_pair(
    sheet: &mut Worksheet,
    row: u32,
    key: &str,
    value: &str,
    bold: &Format,
) -> Result<(), ExportError> {
    sheet.write_string_with_format(row, 0, key, bold)?;
    sheet.write_string(row, 1, value)?;
    Ok(())
}

fn write_header(
    sheet: &mut Worksheet,
    row: u32,
    titles: &[&str],
    bold: &Format,
) -> Result<(), ExportError> {
    for (col, title) in titles.iter().enumerate() {
        sheet.write_string_with_format(row, col as u16, *title, bold)?;
    }
    Ok(())
}

fn write_summary(
    sheet: &mut Worksheet,
    report: &PredictionReport,
    bold: &Format,
) -> Result<(), ExportError> {
    sheet.set_name(SUMMARY_SHEET)?;
    sheet.set_column_width(0, 22)?;
    sheet.set_column_width(1, 28)?;

    let profile = &report.profile;
    let mut row = 0;
    let pairs = [
        ("Report ID", report.id.to_string()),
        ("Name", profile.name().to_string()),
        ("Gender", profile.gender().to_string()),
        ("Age", profile.age().to_string()),
        ("Service years", profile.service_years().to_string()),
        ("Task", report.task.display_name().to_string()),
        ("Mode", report.mode.to_string()),
        ("Horizon", report.horizon.to_string()),
        (
            "Generated at",
            report.generated_at.format(TIME_FORMAT).to_string(),
        ),
    ];
    for (key, value) in &pairs {
        write_pair(sheet, row, key, value, bold)?;
        row += 1;
    }

    let Some(forecast) = &report.forecast else {
        write_pair(sheet, row, "Risk score", "not computed in this mode", bold)?;
        return Ok(());
    };

    if let Some(current) = forecast.current() {
        sheet.write_string_with_format(row, 0, "Risk score", bold)?;
        sheet.write_number(row, 1, current.score)?;
        row += 1;
        write_pair(sheet, row, "Risk level", &current.level.to_string(), bold)?;
        row += 1;
    }
    sheet.write_string_with_format(row, 0, "Mean score", bold)?;
    sheet.write_number(row, 1, forecast.mean_score)?;
    row += 1;
    if let Some(peak) = &forecast.peak {
        sheet.write_string_with_format(row, 0, "Peak score", bold)?;
        sheet.write_number(row, 1, peak.score)?;
        row += 1;
        write_pair(
            sheet,
            row,
            "Peak at",
            &peak.timestamp.format(TIME_FORMAT).to_string(),
            bold,
        )?;
        row += 1;
    }

    row += 1;
    sheet.write_string_with_format(row, 0, "Safest tasks", bold)?;
    row += 1;
    write_header(sheet, row, &["Rank", "Task", "Score", "Level"], bold)?;
    row += 1;
    for (i, ts) in forecast.safest_tasks.iter().enumerate() {
        sheet.write_number(row, 0, (i + 1) as f64)?;
        sheet.write_string(row, 1, ts.task.display_name())?;
        sheet.write_number(row, 2, ts.score)?;
        sheet.write_string(row, 3, ts.level.to_string())?;
        row += 1;
    }

    row += 1;
    sheet.write_string_with_format(row, 0, "Hourly forecast", bold)?;
    row += 1;
    write_header(
        sheet,
        row,
        &["Offset (h)", "Timestamp", "Hour", "Score", "Level"],
        bold,
    )?;
    row += 1;
    for point in &forecast.points {
        sheet.write_number(row, 0, point.offset_hours)?;
        sheet.write_string(row, 1, point.timestamp.format(TIME_FORMAT).to_string())?;
        sheet.write_number(row, 2, point.hour_of_day)?;
        sheet.write_number(row, 3, point.score)?;
        sheet.write_string(row, 4, point.level.to_string())?;
        row += 1;
    }
    Ok(())
}

fn write_keywords(
    sheet: &mut Worksheet,
    report: &PredictionReport,
    bold: &Format,
) -> Result<(), ExportError> {
    sheet.set_name(KEYWORDS_SHEET)?;
    sheet.set_column_width(1, 40)?;
    write_header(sheet, 0, &["Rank", "Keyword"], bold)?;

    let keywords = report
        .guidance
        .as_ref()
        .map(|g| g.keywords.as_slice())
        .unwrap_or_default();
    for (i, keyword) in keywords.iter().enumerate() {
        let row = i as u32 + 1;
        sheet.write_number(row, 0, (i + 1) as f64)?;
        sheet.write_string(row, 1, keyword)?;
    }
    Ok(())
}

fn write_recommendations(
    sheet: &mut Worksheet,
    report: &PredictionReport,
    bold: &Format,
) -> Result<(), ExportError> {
    sheet.set_name(RECOMMENDATIONS_SHEET)?;
    sheet.set_column_width(1, 60)?;
    write_header(sheet, 0, &["No.", "Measure"], bold)?;

    let Some(guidance) = &report.guidance else {
        return Ok(());
    };
    let mut row = 1;
    for (i, measure) in guidance.measures.measures.iter().enumerate() {
        sheet.write_number(row, 0, (i + 1) as f64)?;
        sheet.write_string(row, 1, measure)?;
        row += 1;
    }

    row += 1;
    write_pair(sheet, row, "Summary", &guidance.measures.summary, bold)?;
    row += 1;
    write_pair(
        sheet,
        row,
        "Priority",
        &guidance.measures.priority.to_string(),
        bold,
    )?;
    row += 1;
    write_pair(sheet, row, "Analysis", &guidance.analysis, bold)?;
    Ok(())
}

fn write_metadata(
    sheet: &mut Worksheet,
    report: &PredictionReport,
    metadata: &RunMetadata,
    bold: &Format,
) -> Result<(), ExportError> {
    sheet.set_name(METADATA_SHEET)?;
    sheet.set_column_width(0, 20)?;
    sheet.set_column_width(1, 68)?;

    let pairs = [
        ("Report ID", report.id.to_string()),
        ("Mode", metadata.mode.to_string()),
        ("Device", metadata.device.to_string()),
        ("Horizon", metadata.horizon.to_string()),
        ("Horizon hours", metadata.horizon.hours().to_string()),
        (
            "Generated at",
            metadata.generated_at.format(TIME_FORMAT).to_string(),
        ),
        ("Tables version", metadata.tables_version.clone()),
        ("Tables fingerprint", metadata.tables_fingerprint.clone()),
    ];
    for (row, (key, value)) in pairs.iter().enumerate() {
        write_pair(sheet, row as u32, key, value, bold)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
