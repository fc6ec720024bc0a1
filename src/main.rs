//! # HN Daily Report
//!
//! Collects a daily snapshot of Hacker News (top, new and best stories plus
//! the first few comments on each story), stores it as JSON, and asks an
//! OpenAI-compatible LLM to write daily and weekly briefings from it.
//!
//! ## Usage
//!
//! ```sh
//! hn_daily_report --now
//! hn_daily_report --schedule --config ./config.yaml
//! ```
//!
//! ## Architecture
//!
//! 1. **Listing**: Fetch story ids for the top, new and best categories
//! 2. **Fetching**: Fetch every story and its first 3 replies concurrently
//! 3. **Storage**: Write the filtered snapshot to `data/{date}.json`
//! 4. **Reporting**: Prompt the LLM and save `reports/{date}_{kind}_report.md`

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod analyzer;
mod api;
mod cli;
mod config;
mod models;
mod outputs;
mod prompts;
mod scheduler;
mod scrapers;
mod tasks;
mod utils;

use cli::Cli;
use config::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "hn_daily_report starting up");

    let args = Cli::parse();
    debug!(?args.config, ?args.data_dir, ?args.reports_dir, "Parsed CLI arguments");

    let mut config = AppConfig::load(args.config.as_deref())?;
    args.apply_overrides(&mut config);

    if args.schedule {
        info!(run_time = %config.scheduler.daily_run_time, "Starting scheduler");
        return scheduler::run_scheduler(config).await;
    }

    if !args.now {
        info!("No run mode given; running daily tasks once");
    }

    match tasks::run_daily_tasks(&config).await {
        Ok(summary) => {
            info!(
                date = %summary.date,
                top = summary.top_stories,
                new = summary.new_stories,
                best = summary.best_stories,
                daily_report = ?summary.daily_report,
                weekly_report = ?summary.weekly_report,
                "Run complete"
            );
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Daily tasks failed");
            Err(e.into())
        }
    }
}
