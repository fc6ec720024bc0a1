//! Data models for Hacker News items, daily snapshots, and reports.
//!
//! This module defines the core data structures used throughout the application:
//! - [`Item`]: A single upstream record (story, comment, job, ...)
//! - [`CommentSlot`]: One position in a story's bounded comment preview
//! - [`Snapshot`]: One day's collected state, persisted as a JSON document
//! - [`Category`] and [`ReportKind`]: The small enums that key listings and reports
//!
//! Field names follow the upstream API (`type`, `kids`, `descendants`) so that a
//! snapshot on disk reads like the records it was built from.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// A story listing offered by the upstream API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Top,
    New,
    Best,
}

impl Category {
    /// All categories, in the order they are collected.
    pub const ALL: [Category; 3] = [Category::Top, Category::New, Category::Best];

    /// Name of the listing endpoint, without the `.json` suffix.
    pub fn endpoint(self) -> &'static str {
        match self {
            Category::Top => "topstories",
            Category::New => "newstories",
            Category::Best => "beststories",
        }
    }

    /// Short label used in logs.
    pub fn label(self) -> &'static str {
        match self {
            Category::Top => "top",
            Category::New => "new",
            Category::Best => "best",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One upstream content record.
///
/// Only the fields the pipeline reads are typed. Everything else the API
/// returns (`by`, `time`, `text`, `parent`, ...) is kept in [`Item::extra`] and
/// written back out untouched.
///
/// # Defaults
///
/// Absent `score` and `descendants` read as `0` through [`Item::score`] and
/// [`Item::descendants`] but are not written back, so a stored comment looks
/// like the record upstream sent. Absent removal flags, `kids`, `title`, `url`
/// and `type` stay `None`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Item {
    /// Unique numeric identifier.
    pub id: u64,
    /// Kind tag (`story`, `comment`, `job`, `poll`, ...). Unknown kinds pass through.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<i64>,
    /// Total comment count reported upstream (not the size of `comments`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descendants: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dead: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted: Option<bool>,
    /// Direct reply identifiers, in upstream order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kids: Option<Vec<u64>>,
    /// First few direct replies, present only on expanded stories.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<CommentSlot>>,
    /// Upstream fields the pipeline does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Item {
    /// Minimal item carrying only an identifier; every other field at its default.
    #[cfg(test)]
    pub fn new(id: u64) -> Self {
        Self {
            id,
            kind: None,
            title: None,
            url: None,
            score: None,
            descendants: None,
            dead: None,
            deleted: None,
            kids: None,
            comments: None,
            extra: Map::new(),
        }
    }

    pub fn score(&self) -> i64 {
        self.score.unwrap_or(0)
    }

    pub fn descendants(&self) -> i64 {
        self.descendants.unwrap_or(0)
    }

    pub fn is_story(&self) -> bool {
        self.kind.as_deref() == Some("story")
    }

    /// True when upstream flagged the item as `dead` or `deleted`.
    pub fn is_removed(&self) -> bool {
        self.dead.unwrap_or(false) || self.deleted.unwrap_or(false)
    }

    /// Child identifiers, or an empty slice when upstream sent none.
    pub fn kid_ids(&self) -> &[u64] {
        self.kids.as_deref().unwrap_or(&[])
    }
}

/// One position in a story's comment preview.
///
/// A child that could not be fetched keeps its position as a placeholder, so
/// slot `n` always corresponds to `kids[n]`. Placeholders serialize as `{}`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum CommentSlot {
    Fetched(Box<Item>),
    Placeholder {},
}

impl CommentSlot {
    pub fn item(&self) -> Option<&Item> {
        match self {
            CommentSlot::Fetched(item) => Some(item),
            CommentSlot::Placeholder {} => None,
        }
    }
}

impl From<Option<Item>> for CommentSlot {
    fn from(item: Option<Item>) -> Self {
        match item {
            Some(item) => CommentSlot::Fetched(Box::new(item)),
            None => CommentSlot::Placeholder {},
        }
    }
}

/// One day's collected state.
///
/// Each collection run produces one `Snapshot`, which is written to
/// `{data_dir}/{date}.json` and later read back by the report generator.
/// The three story lists are collected independently; the same story may
/// appear in more than one.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Snapshot {
    /// Local calendar date in `YYYY-MM-DD` format.
    pub date: String,
    /// Capture time in seconds since the Unix epoch.
    pub timestamp: f64,
    pub top_stories: Vec<Item>,
    pub new_stories: Vec<Item>,
    pub best_stories: Vec<Item>,
}

impl Snapshot {
    pub fn stories(&self, category: Category) -> &[Item] {
        match category {
            Category::Top => &self.top_stories,
            Category::New => &self.new_stories,
            Category::Best => &self.best_stories,
        }
    }
}

/// The two report flavours the analyzer produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Daily,
    Weekly,
}

impl ReportKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ReportKind::Daily => "daily",
            ReportKind::Weekly => "weekly",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A generated report, keyed by date and kind.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub date: String,
    pub kind: ReportKind,
    pub text: String,
}

impl Report {
    /// File name the report is stored under, e.g. `2025-05-06_daily_report.md`.
    pub fn file_name(&self) -> String {
        format!("{}_{}_report.md", self.date, self.kind)
    }
}
