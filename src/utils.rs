//! Utility functions for dates, log previews, and file system checks.
//!
//! This module provides helper functions used throughout the application:
//! - Local date formatting and weekly-report day detection
//! - Cron expression building for the daily trigger
//! - String truncation for logging generated text
//! - File system validation for data and report directories

use chrono::{Datelike, NaiveDate, NaiveTime, Timelike, Weekday};
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument, warn};

/// Format a date as `YYYY-MM-DD`.
pub fn date_string(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Weekly reports are produced on Sundays.
pub fn is_weekly_report_day(date: NaiveDate) -> bool {
    date.weekday() == Weekday::Sun
}

/// Six-field cron expression (`sec min hour dom mon dow`) firing daily at `time`.
///
/// # Examples
///
/// ```ignore
/// let two_am = NaiveTime::from_hms_opt(2, 0, 0).unwrap();
/// assert_eq!(daily_cron(two_am), "0 0 2 * * *");
/// ```
pub fn daily_cron(time: NaiveTime) -> String {
    format!("0 {} {} * * *", time.minute(), time.hour())
}

/// Truncate a string for logging purposes.
///
/// Long strings are truncated to `max` bytes (backing off to a character
/// boundary) with an ellipsis and byte count indicator appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…(+{} bytes)", &s[..end], s.len() - end)
}

/// Ensure a directory exists and is writable.
///
/// This function creates the directory if it doesn't exist, then performs
/// a write test by creating and immediately deleting a probe file.
///
/// # Errors
///
/// Returns an error if:
/// - The directory cannot be created
/// - The directory is not writable (permission denied, read-only filesystem, etc.)
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn ensure_writable_dir(path: &Path) -> std::io::Result<()> {
    fs::create_dir_all(path).await?;
    let probe_path = path.join("..__probe_write__");
    fs::write(&probe_path, b"").await?;
    if let Err(e) = fs::remove_file(&probe_path).await {
        warn!(error = %e, probe = %probe_path.display(), "Failed to remove write probe");
    }
    info!("Directory is writable");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_for_log_short_string() {
        let s = "Hello, world!";
        assert_eq!(truncate_for_log(s, 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 bytes)"));
    }

    #[test]
    fn test_truncate_for_log_multibyte() {
        // Each "é" is two bytes; byte 3 falls inside the second one.
        assert_eq!(truncate_for_log("éééé", 3), "é…(+6 bytes)");
    }

    #[test]
    fn test_date_string() {
        let date = NaiveDate::from_ymd_opt(2025, 5, 6).unwrap();
        assert_eq!(date_string(date), "2025-05-06");
    }

    #[test]
    fn test_is_weekly_report_day() {
        let sunday = NaiveDate::from_ymd_opt(2025, 5, 11).unwrap();
        let monday = NaiveDate::from_ymd_opt(2025, 5, 12).unwrap();
        assert!(is_weekly_report_day(sunday));
        assert!(!is_weekly_report_day(monday));
    }

    #[test]
    fn test_daily_cron() {
        assert_eq!(daily_cron(NaiveTime::from_hms_opt(2, 0, 0).unwrap()), "0 0 2 * * *");
        assert_eq!(daily_cron(NaiveTime::from_hms_opt(23, 45, 0).unwrap()), "0 45 23 * * *");
    }

    #[tokio::test]
    async fn test_ensure_writable_dir_creates_missing() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b/c");
        ensure_writable_dir(&nested).await.unwrap();
        assert!(nested.is_dir());
        assert!(!nested.join("..__probe_write__").exists());
    }

    #[tokio::test]
    async fn test_ensure_writable_dir_is_repeatable() {
        let dir = tempfile::tempdir().unwrap();
        ensure_writable_dir(dir.path()).await.unwrap();
        ensure_writable_dir(dir.path()).await.unwrap();

        let leftovers: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert!(leftovers.is_empty());
    }

    #[tokio::test]
    async fn test_ensure_writable_dir_rejects_file_path() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("not_a_dir");
        std::fs::write(&file, b"x").unwrap();
        assert!(ensure_writable_dir(&file).await.is_err());
    }
}
