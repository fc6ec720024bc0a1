//! The daily job: collect, store, summarize.
//!
//! One run of [`run_daily_tasks`]:
//! 1. Checks that the data and report directories are writable
//! 2. Collects today's snapshot and writes it to disk
//! 3. Generates the daily report
//! 4. On Sundays, also generates the weekly report
//!
//! Collection and storage failures abort the run. Report failures are logged
//! and reflected in the returned [`RunSummary`]; the snapshot is kept either way.

use crate::analyzer::{Analyzer, ReportError};
use crate::api::ChatClient;
use crate::config::AppConfig;
use crate::outputs::json::{self, StoreError};
use crate::scrapers::hackernews::HackerNewsClient;
use crate::utils::{date_string, ensure_writable_dir, is_weekly_report_day, truncate_for_log};
use chrono::{Local, NaiveDate};
use std::path::PathBuf;
use std::time::Instant;
use thiserror::Error;
use tracing::{error, info, instrument, warn};

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("directory {path} is not writable: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("failed to store snapshot: {0}")]
    Store(#[from] StoreError),
}

/// What a daily run produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub date: String,
    pub snapshot_path: PathBuf,
    pub top_stories: usize,
    pub new_stories: usize,
    pub best_stories: usize,
    pub daily_report: Option<PathBuf>,
    pub weekly_report: Option<PathBuf>,
}

/// Reports produced by [`run_reports`].
#[derive(Debug, Default, PartialEq)]
pub struct ReportOutcome {
    pub daily: Option<PathBuf>,
    pub weekly: Option<PathBuf>,
}

/// Run the full daily job once.
#[instrument(level = "info", skip_all)]
pub async fn run_daily_tasks(config: &AppConfig) -> Result<RunSummary, TaskError> {
    let start_time = Instant::now();
    info!("Daily tasks starting");

    for dir in [&config.scraper.data_dir, &config.analyzer.reports_dir] {
        if let Err(source) = ensure_writable_dir(dir).await {
            error!(path = %dir.display(), error = %source, "Directory is not writable (fix perms or choose a different path)");
            return Err(TaskError::Directory {
                path: dir.clone(),
                source,
            });
        }
    }

    let client = HackerNewsClient::new(&config.scraper)?;
    let snapshot = client.collect_daily_data(None, None, None).await;
    let snapshot_path = json::write_snapshot(&snapshot, &config.scraper.data_dir).await?;
    info!(
        top = snapshot.top_stories.len(),
        new = snapshot.new_stories.len(),
        best = snapshot.best_stories.len(),
        "Data collection complete"
    );

    let today = NaiveDate::parse_from_str(&snapshot.date, "%Y-%m-%d")
        .unwrap_or_else(|_| Local::now().date_naive());
    let reports = run_reports(config, today).await;

    let elapsed = start_time.elapsed();
    info!(?elapsed, secs = elapsed.as_secs(), "Daily tasks complete");

    Ok(RunSummary {
        date: snapshot.date,
        snapshot_path,
        top_stories: snapshot.top_stories.len(),
        new_stories: snapshot.new_stories.len(),
        best_stories: snapshot.best_stories.len(),
        daily_report: reports.daily,
        weekly_report: reports.weekly,
    })
}

/// Generate the daily report for `today`, and the weekly one if `today` is a Sunday.
///
/// Never fails; each report that could not be produced is logged and left `None`.
#[instrument(level = "info", skip(config))]
pub async fn run_reports(config: &AppConfig, today: NaiveDate) -> ReportOutcome {
    let mut outcome = ReportOutcome::default();

    let Some(api_key) = config.analyzer.api_key.as_deref().filter(|k| !k.is_empty()) else {
        let e = ReportError::Config(
            "no API key (set analyzer.api_key, --api-key or OPENAI_API_KEY)".to_string(),
        );
        error!(error = %e, "Skipping reports");
        return outcome;
    };

    let llm = match ChatClient::new(&config.analyzer, api_key) {
        Ok(llm) => llm,
        Err(e) => {
            error!(error = %e, "Failed to build LLM client; skipping reports");
            return outcome;
        }
    };
    info!(model = llm.model(), "Generating reports");
    let analyzer = Analyzer::new(llm, config.scraper.data_dir.clone(), &config.analyzer);

    let date = date_string(today);
    match analyzer.generate_daily_report(&date).await {
        Ok(report) => {
            info!(preview = %truncate_for_log(&report.text, 300), "Daily report generated");
            outcome.daily = Some(config.analyzer.reports_dir.join(report.file_name()));
        }
        Err(e) => error!(%date, error = %e, "Daily report failed"),
    }

    if !config.scheduler.generate_weekly_report {
        return outcome;
    }
    if !is_weekly_report_day(today) {
        info!(%date, "Not Sunday; skipping weekly report");
        return outcome;
    }

    match analyzer.generate_weekly_report(today).await {
        Ok(report) => {
            info!(preview = %truncate_for_log(&report.text, 300), "Weekly report generated");
            outcome.weekly = Some(config.analyzer.reports_dir.join(report.file_name()));
        }
        Err(e) => warn!(%date, error = %e, "Weekly report failed"),
    }

    outcome
}
