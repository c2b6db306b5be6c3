//! Export programme comparisons to JSON and CSV.
//!
//! The CSV is meant to be easy to consume in spreadsheets; the JSON carries the
//! full outcome records including degenerate-input notes.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::domain::{Comparison, OverallSummary, ProgrammeOutcome};
use crate::error::AppError;

pub const TOOL_NAME: &str = "wellby";

#[derive(Debug, Serialize)]
struct ComparisonExport<'a> {
    tool: &'static str,
    generated_at: String,
    horizon_weeks: usize,
    programmes: &'a [ProgrammeOutcome],
    overall: &'a OverallSummary,
}

/// Write the comparison as pretty-printed JSON.
pub fn write_comparison_json(path: &Path, comparison: &Comparison) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export JSON '{}': {e}", path.display())))?;

    let export = ComparisonExport {
        tool: TOOL_NAME,
        generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        horizon_weeks: comparison.horizon_weeks,
        programmes: &comparison.programmes,
        overall: &comparison.overall,
    };

    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &export)
        .map_err(|e| AppError::new(2, format!("Failed to write export JSON: {e}")))?;
    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to write export JSON: {e}")))?;
    Ok(())
}

/// Write one row per programme plus a total row.
pub fn write_comparison_csv(path: &Path, comparison: &Comparison) -> Result<(), AppError> {
    let mut file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;

    writeln!(
        file,
        "programme,decay_model,peak_weekly_gain,clients_seen,clients_retained,total_cost,net_wellbys,cost_per_wellby,wellbys_per_retained_client"
    )
    .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    for p in &comparison.programmes {
        let per_client = (p.clients_retained > 0.0).then_some(p.per_retained_client.total);
        writeln!(
            file,
            "{},{},{:.4},{:.2},{:.2},{:.2},{:.6},{},{}",
            csv_field(&p.name),
            p.decay.key(),
            p.peak_weekly_gain,
            p.clients_seen,
            p.clients_retained,
            p.total_cost,
            p.net_wellbys,
            optional_cell(p.cost_per_wellby),
            optional_cell(per_client),
        )
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }

    let o = &comparison.overall;
    writeln!(
        file,
        "Total,,,{:.2},{:.2},{:.2},{:.6},{},{}",
        o.clients_seen,
        o.clients_retained,
        o.total_cost,
        o.net_wellbys,
        optional_cell(o.cost_per_wellby),
        optional_cell(o.wellbys_per_retained_client),
    )
    .map_err(|e| AppError::new(2, format!("Failed to write export CSV total row: {e}")))?;

    Ok(())
}

fn optional_cell(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.6}")).unwrap_or_default()
}

fn csv_field(s: &str) -> String {
    if s.contains([',', '"', '\n']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
