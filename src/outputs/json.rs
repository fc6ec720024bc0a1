//! JSON snapshot storage.
//!
//! Snapshots are stored one file per local calendar day:
//! ```text
//! data_dir/
//! ├── 2025-05-05.json
//! ├── 2025-05-06.json
//! └── 2025-05-07.json
//! ```
//!
//! Re-running collection on the same day overwrites that day's file.

use crate::models::Snapshot;
use chrono::{Duration, NaiveDate};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::{error, info, instrument, warn};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid snapshot {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Path of the snapshot file for `date` (`YYYY-MM-DD`).
pub fn snapshot_path(data_dir: &Path, date: &str) -> PathBuf {
    data_dir.join(format!("{date}.json"))
}

/// Write a [`Snapshot`] to `{data_dir}/{date}.json`, pretty-printed.
///
/// Creates `data_dir` if needed and replaces any existing file for that date.
///
/// # Returns
///
/// The path that was written.
#[instrument(level = "info", skip_all, fields(data_dir = %data_dir.display(), date = %snapshot.date))]
pub async fn write_snapshot(snapshot: &Snapshot, data_dir: &Path) -> Result<PathBuf, StoreError> {
    let json = serde_json::to_string_pretty(snapshot).map_err(|source| StoreError::Json {
        path: snapshot_path(data_dir, &snapshot.date),
        source,
    })?;

    if let Err(source) = fs::create_dir_all(data_dir).await {
        error!(error = %source, "Failed to create data dir");
        return Err(StoreError::Io {
            path: data_dir.to_path_buf(),
            source,
        });
    }

    let path = snapshot_path(data_dir, &snapshot.date);
    fs::write(&path, json)
        .await
        .map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;
    info!(path = %path.display(), "Wrote snapshot");

    Ok(path)
}

/// Load the snapshot for `date`.
///
/// A missing file is not an error and yields `Ok(None)`; an unreadable or
/// corrupt file is.
#[instrument(level = "info", skip(data_dir), fields(data_dir = %data_dir.display()))]
pub async fn load_snapshot(data_dir: &Path, date: &str) -> Result<Option<Snapshot>, StoreError> {
    let path = snapshot_path(data_dir, date);

    let raw = match fs::read_to_string(&path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!(path = %path.display(), "No snapshot for date");
            return Ok(None);
        }
        Err(source) => return Err(StoreError::Io { path, source }),
    };

    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| StoreError::Json { path, source })
}

/// Load the snapshots for the `days` days ending on `today`, oldest first.
///
/// Missing days are skipped. Corrupt days are logged and skipped so that one
/// bad file does not block a weekly report.
#[instrument(level = "info", skip(data_dir), fields(data_dir = %data_dir.display()))]
pub async fn load_last_n_days(data_dir: &Path, today: NaiveDate, days: u32) -> Vec<Snapshot> {
    let mut snapshots = Vec::new();

    for offset in 0..i64::from(days) {
        let date = (today - Duration::days(offset)).format("%Y-%m-%d").to_string();
        match load_snapshot(data_dir, &date).await {
            Ok(Some(snapshot)) => snapshots.push(snapshot),
            Ok(None) => {}
            Err(e) => error!(%date, error = %e, "Skipping unreadable snapshot"),
        }
    }

    snapshots.sort_by(|a, b| a.date.cmp(&b.date));
    info!(count = snapshots.len(), days, "Loaded recent snapshots");
    snapshots
}
