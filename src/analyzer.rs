//! Daily and weekly report generation.
//!
//! The [`Analyzer`] reads stored snapshots, turns them into prompts, asks the
//! LLM for a briefing, and saves the result. A failed generation is returned
//! as [`ReportError::Generation`] and nothing is written; error text never ends
//! up inside a report file.

use crate::api::{ApiError, AskAsync};
use crate::config::AnalyzerConfig;
use crate::models::{Report, ReportKind};
use crate::outputs::{json, reports};
use crate::prompts::{self, SYSTEM_PROMPT};
use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{error, info, instrument};

/// Number of days covered by a weekly report, today included.
pub const WEEKLY_WINDOW_DAYS: u32 = 7;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("no snapshot data for {0}")]
    NoData(String),

    #[error("failed to load snapshot: {0}")]
    Store(#[from] json::StoreError),

    #[error("report generation failed: {0}")]
    Generation(#[from] ApiError),

    #[error("failed to save report: {0}")]
    Save(#[from] std::io::Error),
}

/// Generates reports from stored snapshots with an [`AskAsync`] backend.
#[derive(Debug)]
pub struct Analyzer<A> {
    llm: A,
    data_dir: PathBuf,
    reports_dir: PathBuf,
    daily_max_tokens: u32,
    weekly_max_tokens: u32,
}

impl<A: AskAsync> Analyzer<A> {
    pub fn new(llm: A, data_dir: PathBuf, config: &AnalyzerConfig) -> Self {
        Self {
            llm,
            data_dir,
            reports_dir: config.reports_dir.clone(),
            daily_max_tokens: config.daily_max_tokens,
            weekly_max_tokens: config.weekly_max_tokens,
        }
    }

    async fn generate(
        &self,
        kind: ReportKind,
        date: String,
        prompt: String,
        max_tokens: u32,
    ) -> Result<Report, ReportError> {
        let text = match self.llm.ask(SYSTEM_PROMPT, &prompt, max_tokens).await {
            Ok(text) => text,
            Err(e) => {
                error!(%kind, %date, error = %e, "LLM request failed; no report written");
                return Err(e.into());
            }
        };

        let report = Report { date, kind, text };
        reports::save_report(&report, &self.reports_dir).await?;
        Ok(report)
    }

    /// Generate and save the daily report for `date` (`YYYY-MM-DD`).
    #[instrument(level = "info", skip(self))]
    pub async fn generate_daily_report(&self, date: &str) -> Result<Report, ReportError> {
        let snapshot = json::load_snapshot(&self.data_dir, date)
            .await?
            .ok_or_else(|| ReportError::NoData(date.to_string()))?;

        info!(stories = snapshot.top_stories.len(), "Generating daily report");
        let prompt = prompts::daily_prompt(&snapshot);
        self.generate(ReportKind::Daily, date.to_string(), prompt, self.daily_max_tokens)
            .await
    }

    /// Generate and save the weekly report for the seven days ending `today`.
    ///
    /// The report is keyed by `today`.
    #[instrument(level = "info", skip(self))]
    pub async fn generate_weekly_report(&self, today: NaiveDate) -> Result<Report, ReportError> {
        let date = today.format("%Y-%m-%d").to_string();
        let snapshots = json::load_last_n_days(&self.data_dir, today, WEEKLY_WINDOW_DAYS).await;

        let prompt = prompts::weekly_prompt(&snapshots)
            .ok_or_else(|| ReportError::NoData(format!("the week ending {date}")))?;

        info!(days = snapshots.len(), "Generating weekly report");
        self.generate(ReportKind::Weekly, date, prompt, self.weekly_max_tokens)
            .await
    }
}
