//! Runtime configuration loaded from a YAML file.
//!
//! Every section and field is optional; anything left out falls back to the
//! defaults below. The loaded [`AppConfig`] is passed explicitly to each
//! component rather than read from global state.
//!
//! ```yaml
//! scraper:
//!   best_stories_limit: 30
//!   max_concurrent_requests: 16
//! analyzer:
//!   model: deepseek-chat
//!   api_base_url: https://api.deepseek.com/v1
//! scheduler:
//!   daily_run_time: "02:00"
//! ```

use chrono::NaiveTime;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{info, instrument};
use url::Url;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub scraper: ScraperConfig,
    pub analyzer: AnalyzerConfig,
    pub scheduler: SchedulerConfig,
}

/// Settings for the upstream collection pipeline.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Base URL of the upstream API, without a trailing slash.
    pub base_url: String,
    pub top_stories_limit: usize,
    pub new_stories_limit: usize,
    pub best_stories_limit: usize,
    /// How many direct replies to attach to each story.
    pub comments_limit: usize,
    pub request_timeout_secs: u64,
    /// Cap on in-flight upstream requests. `None` leaves fan-out unbounded.
    pub max_concurrent_requests: Option<usize>,
    pub data_dir: PathBuf,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: "https://hacker-news.firebaseio.com/v0".to_string(),
            top_stories_limit: 10,
            new_stories_limit: 10,
            best_stories_limit: 100,
            comments_limit: 3,
            request_timeout_secs: 30,
            max_concurrent_requests: None,
            data_dir: PathBuf::from("data"),
        }
    }
}

impl ScraperConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Settings for report generation.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub reports_dir: PathBuf,
    pub model: String,
    /// OpenAI-compatible API root, e.g. `https://api.deepseek.com/v1`.
    pub api_base_url: String,
    pub api_key: Option<String>,
    pub temperature: f32,
    pub daily_max_tokens: u32,
    pub weekly_max_tokens: u32,
    pub request_timeout_secs: u64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            reports_dir: PathBuf::from("reports"),
            model: "deepseek-chat".to_string(),
            api_base_url: "https://api.deepseek.com/v1".to_string(),
            api_key: None,
            temperature: 0.7,
            daily_max_tokens: 2000,
            weekly_max_tokens: 3000,
            request_timeout_secs: 300,
        }
    }
}

/// Settings for the daily trigger.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Local wall-clock time of the daily run, `HH:MM`.
    pub daily_run_time: String,
    /// Also produce a weekly report when the daily run lands on a Sunday.
    pub generate_weekly_report: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            daily_run_time: "02:00".to_string(),
            generate_weekly_report: true,
        }
    }
}

impl SchedulerConfig {
    pub fn run_time(&self) -> Result<NaiveTime, ConfigError> {
        NaiveTime::parse_from_str(&self.daily_run_time, "%H:%M").map_err(|e| {
            ConfigError::Invalid {
                field: "scheduler.daily_run_time",
                reason: format!("{:?} is not HH:MM ({})", self.daily_run_time, e),
            }
        })
    }
}

impl AppConfig {
    /// Load configuration from `path`, or defaults when no path is given.
    #[instrument(level = "info")]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
                let config = Self::from_yaml(&raw).map_err(|source| ConfigError::Parse {
                    path: path.to_path_buf(),
                    source,
                })?;
                info!(path = %path.display(), "Loaded configuration");
                config
            }
            None => {
                info!("No config file given; using defaults");
                Self::default()
            }
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml(raw: &str) -> Result<Self, serde_yaml::Error> {
        // An empty file deserializes to unit, not to an empty mapping.
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        Url::parse(&self.scraper.base_url).map_err(|e| ConfigError::Invalid {
            field: "scraper.base_url",
            reason: e.to_string(),
        })?;
        Url::parse(&self.analyzer.api_base_url).map_err(|e| ConfigError::Invalid {
            field: "analyzer.api_base_url",
            reason: e.to_string(),
        })?;
        if self.scraper.max_concurrent_requests == Some(0) {
            return Err(ConfigError::Invalid {
                field: "scraper.max_concurrent_requests",
                reason: "must be at least 1".to_string(),
            });
        }
        self.scheduler.run_time()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.scraper.top_stories_limit, 10);
        assert_eq!(config.scraper.new_stories_limit, 10);
        assert_eq!(config.scraper.best_stories_limit, 100);
        assert_eq!(config.scraper.comments_limit, 3);
        assert_eq!(config.scraper.max_concurrent_requests, None);
        assert_eq!(config.analyzer.daily_max_tokens, 2000);
        assert_eq!(config.analyzer.weekly_max_tokens, 3000);
        assert_eq!(config.scheduler.daily_run_time, "02:00");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_other_defaults() {
        let raw = r#"
scraper:
  best_stories_limit: 30
analyzer:
  model: gpt-4o-mini
"#;
        let config = AppConfig::from_yaml(raw).unwrap();
        assert_eq!(config.scraper.best_stories_limit, 30);
        assert_eq!(config.scraper.top_stories_limit, 10);
        assert_eq!(config.analyzer.model, "gpt-4o-mini");
        assert_eq!(config.analyzer.api_base_url, "https://api.deepseek.com/v1");
        assert!(config.scheduler.generate_weekly_report);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        let config = AppConfig::from_yaml("  \n").unwrap();
        assert_eq!(config.scraper.base_url, "https://hacker-news.firebaseio.com/v0");
    }

    #[test]
    fn test_run_time_parsing() {
        let scheduler = SchedulerConfig {
            daily_run_time: "02:30".to_string(),
            generate_weekly_report: false,
        };
        assert_eq!(
            scheduler.run_time().unwrap(),
            NaiveTime::from_hms_opt(2, 30, 0).unwrap()
        );

        let bad = SchedulerConfig {
            daily_run_time: "half past two".to_string(),
            generate_weekly_report: false,
        };
        assert!(matches!(bad.run_time(), Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn test_zero_concurrency_is_rejected() {
        let mut config = AppConfig::default();
        config.scraper.max_concurrent_requests = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "scraper:\n  data_dir: /tmp/hn-data\n  max_concurrent_requests: 8").unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.scraper.data_dir, PathBuf::from("/tmp/hn-data"));
        assert_eq!(config.scraper.max_concurrent_requests, Some(8));
    }

    #[test]
    fn test_load_missing_file_errors() {
        let err = AppConfig::load(Some(Path::new("/nonexistent/config.yaml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
