//! Markdown report files.
//!
//! Reports are written once per (date, kind) as
//! `{reports_dir}/{date}_{daily|weekly}_report.md`.

use crate::models::Report;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

/// Write a report, creating `reports_dir` if needed.
///
/// # Returns
///
/// The path that was written.
#[instrument(level = "info", skip_all, fields(reports_dir = %reports_dir.display(), date = %report.date, kind = %report.kind))]
pub async fn save_report(report: &Report, reports_dir: &Path) -> std::io::Result<PathBuf> {
    fs::create_dir_all(reports_dir).await?;
    let path = reports_dir.join(report.file_name());
    fs::write(&path, &report.text).await?;
    info!(path = %path.display(), bytes = report.text.len(), "Saved report");
    Ok(path)
}
