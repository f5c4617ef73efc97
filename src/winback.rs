//! Win-back list: non-active customers ranked for outreach, and its CSV export.

use crate::model::{CustomerSummary, ExportError, Status};
use std::cmp::Ordering;
use std::fs::File;
use std::io::Write;
use std::path::Path;

pub const DEFAULT_EXPORT_FILE: &str = "win_back_list.csv";

const EXPORT_HEADER: [&str; 7] = [
    "Customer_ID",
    "Region",
    "Recency",
    "Frequency",
    "LTV",
    "Risk_Score",
    "Status",
];

/// Non-active customers by descending risk score, ties kept in input order.
pub fn win_back_list(summaries: &[CustomerSummary], top_n: Option<usize>) -> Vec<&CustomerSummary> {
    let mut list: Vec<&CustomerSummary> = summaries
        .iter()
        .filter(|s| s.status != Status::Active)
        .collect();

    list.sort_by(|a, b| {
        b.risk_score
            .partial_cmp(&a.risk_score)
            .unwrap_or(Ordering::Equal)
    });

    if let Some(n) = top_n {
        list.truncate(n);
    }
    list
}

/// Writes the list as delimited text. Status is written as its plain label.
pub fn export_win_back_csv<W: Write>(writer: W, entries: &[&CustomerSummary]) -> Result<(), ExportError> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(EXPORT_HEADER)?;

    for entry in entries {
        out.write_record([
            entry.customer_id.clone(),
            entry.region.clone(),
            entry.recency.to_string(),
            entry.frequency.to_string(),
            entry.ltv.to_string(),
            format!("{:.2}", entry.risk_score),
            entry.status.label().to_string(),
        ])?;
    }

    out.flush()?;
    Ok(())
}

pub fn write_win_back_file(path: &Path, entries: &[&CustomerSummary]) -> Result<(), ExportError> {
    let file = File::create(path)?;
    export_win_back_csv(file, entries)
}
