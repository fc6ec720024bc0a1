//! Daily trigger using tokio-cron-scheduler.
//!
//! ```text
//! Scheduler (every day at daily_run_time, local time)
//!     │
//!     └─► run_daily_tasks()
//!             ├─► collect + write snapshot
//!             ├─► daily report
//!             └─► weekly report (Sundays)
//! ```

use crate::config::AppConfig;
use crate::tasks::run_daily_tasks;
use crate::utils::daily_cron;
use chrono::Local;
use std::error::Error;
use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info, instrument};

/// Run the daily job on schedule until Ctrl-C.
#[instrument(level = "info", skip_all)]
pub async fn run_scheduler(config: AppConfig) -> Result<(), Box<dyn Error>> {
    let run_time = config.scheduler.run_time()?;
    let cron = daily_cron(run_time);
    let config = Arc::new(config);

    let mut scheduler = JobScheduler::new().await?;

    let job_config = Arc::clone(&config);
    let daily_job = Job::new_async_tz(cron.as_str(), Local, move |_uuid, _lock| {
        let config = Arc::clone(&job_config);
        Box::pin(async move {
            match run_daily_tasks(&config).await {
                Ok(summary) => info!(
                    date = %summary.date,
                    daily_report = summary.daily_report.is_some(),
                    weekly_report = summary.weekly_report.is_some(),
                    "Scheduled run finished"
                ),
                Err(e) => error!(error = %e, "Scheduled run failed"),
            }
        })
    })?;

    scheduler.add(daily_job).await?;
    scheduler.start().await?;
    info!(%cron, %run_time, "Scheduler started; daily tasks will run at the configured local time");

    tokio::signal::ctrl_c().await?;
    info!("Shutdown requested");
    scheduler.shutdown().await?;
    Ok(())
}
