//! On-disk outputs: daily snapshots and generated reports.
//!
//! # Submodules
//!
//! - [`json`]: Reads and writes [`Snapshot`](crate::models::Snapshot) files, one per date
//! - [`reports`]: Writes generated Markdown reports
//!
//! # Output Structure
//!
//! ```text
//! data/
//! ├── 2025-05-10.json
//! └── 2025-05-11.json
//!
//! reports/
//! ├── 2025-05-10_daily_report.md
//! ├── 2025-05-11_daily_report.md
//! └── 2025-05-11_weekly_report.md
//! ```

pub mod json;
pub mod reports;
