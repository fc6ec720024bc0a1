//! Command-line interface definitions.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Paths and the API key given here override the values from the config file.

use crate::config::AppConfig;
use clap::Parser;
use std::path::PathBuf;

/// Collect daily Hacker News snapshots and generate LLM-written reports.
///
/// # Examples
///
/// ```sh
/// # Run once now (the default)
/// hn_daily_report --now
///
/// # Run every day at the configured time
/// hn_daily_report --schedule --config ./config.yaml
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Run the daily tasks once and exit (default when no mode is given)
    #[arg(long, conflicts_with = "schedule")]
    pub now: bool,

    /// Run the daily tasks every day at `scheduler.daily_run_time`
    #[arg(long)]
    pub schedule: bool,

    /// Optional path to config.yaml file
    #[arg(short, long, env = "HN_REPORT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory for daily snapshot files
    #[arg(short, long)]
    pub data_dir: Option<PathBuf>,

    /// Directory for generated reports
    #[arg(short, long)]
    pub reports_dir: Option<PathBuf>,

    /// API key for the OpenAI-compatible text-generation service
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,
}

impl Cli {
    /// Apply command-line overrides on top of the loaded configuration.
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(dir) = &self.data_dir {
            config.scraper.data_dir = dir.clone();
        }
        if let Some(dir) = &self.reports_dir {
            config.analyzer.reports_dir = dir.clone();
        }
        if let Some(key) = &self.api_key {
            config.analyzer.api_key = Some(key.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults_to_run_once() {
        let cli = Cli::parse_from(["hn_daily_report"]);
        assert!(!cli.now);
        assert!(!cli.schedule);
    }

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from([
            "hn_daily_report",
            "--schedule",
            "--data-dir",
            "./data",
            "--reports-dir",
            "./reports",
        ]);

        assert!(cli.schedule);
        assert_eq!(cli.data_dir, Some(PathBuf::from("./data")));
        assert_eq!(cli.reports_dir, Some(PathBuf::from("./reports")));
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from(["hn_daily_report", "-d", "/tmp/data", "-r", "/tmp/reports"]);

        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/data")));
        assert_eq!(cli.reports_dir, Some(PathBuf::from("/tmp/reports")));
    }

    #[test]
    fn test_now_conflicts_with_schedule() {
        assert!(Cli::try_parse_from(["hn_daily_report", "--now", "--schedule"]).is_err());
    }

    #[test]
    fn test_overrides_win_over_config() {
        let cli = Cli::parse_from([
            "hn_daily_report",
            "--data-dir",
            "/srv/hn",
            "--api-key",
            "sk-cli",
        ]);
        let mut config = AppConfig::default();
        config.analyzer.api_key = Some("sk-file".to_string());
        cli.apply_overrides(&mut config);

        assert_eq!(config.scraper.data_dir, PathBuf::from("/srv/hn"));
        assert_eq!(config.analyzer.reports_dir, PathBuf::from("reports"));
        assert_eq!(config.analyzer.api_key.as_deref(), Some("sk-cli"));
    }
}
