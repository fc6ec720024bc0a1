//! Hacker News collection pipeline.
//!
//! This module talks to the public [Hacker News API](https://github.com/HackerNews/API)
//! and assembles one [`Snapshot`] per run.
//!
//! # Pipeline
//!
//! ```text
//! list_ids(top) ─┐                     ┌─ fetch_item(id) ─► first 3 kids (concurrent)
//! list_ids(new) ─┼─► fetch_stories ×3 ─┼─ fetch_item(id) ─► ...
//! list_ids(best)─┘   (concurrent)      └─ ...
//!                          │
//!                          └─► drop placeholders, dead, deleted ─► Snapshot
//! ```
//!
//! # Failure Handling
//!
//! Nothing below [`HackerNewsClient::collect_daily_data`] is surfaced as an
//! error. A failed listing becomes an empty list, a failed or absent item
//! becomes a placeholder, and both are logged. Nothing is retried.
//!
//! # Concurrency
//!
//! All fan-out runs on the calling task via `join_all`, so completion order
//! never affects result order. When `max_concurrent_requests` is configured,
//! a semaphore permit is held only while a single request is in flight; a
//! story never holds a permit while waiting on its comments.

use crate::config::ScraperConfig;
use crate::models::{Category, CommentSlot, Item, Snapshot};
use chrono::Local;
use futures::future::join_all;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{AcquireError, Semaphore};
use tracing::{debug, error, info, instrument, warn};

/// Reasons a single upstream request can fail. Only ever logged.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("request limiter closed: {0}")]
    Limiter(#[from] AcquireError),
}

impl FetchError {
    fn is_not_found(&self) -> bool {
        matches!(self, FetchError::Http(e) if e.status() == Some(reqwest::StatusCode::NOT_FOUND))
    }
}

/// Client for the Hacker News Firebase API.
///
/// Cheap to clone; clones share the connection pool and request limiter.
#[derive(Debug, Clone)]
pub struct HackerNewsClient {
    http: reqwest::Client,
    base_url: String,
    top_limit: usize,
    new_limit: usize,
    best_limit: usize,
    comments_limit: usize,
    limiter: Option<Arc<Semaphore>>,
}

impl HackerNewsClient {
    /// Build a client from scraper settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed
    /// (for example, when the TLS backend fails to initialize).
    pub fn new(config: &ScraperConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            top_limit: config.top_stories_limit,
            new_limit: config.new_stories_limit,
            best_limit: config.best_stories_limit,
            comments_limit: config.comments_limit,
            limiter: config
                .max_concurrent_requests
                .map(|n| Arc::new(Semaphore::new(n))),
        })
    }

    /// Configured default limit for a category.
    pub fn default_limit(&self, category: Category) -> usize {
        match category {
            Category::Top => self.top_limit,
            Category::New => self.new_limit,
            Category::Best => self.best_limit,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let _permit = match &self.limiter {
            Some(limiter) => Some(limiter.acquire().await?),
            None => None,
        };
        let response = self.http.get(url).send().await?.error_for_status()?;
        Ok(response.json::<T>().await?)
    }

    /// List up to `limit` identifiers for `category`, in upstream order.
    ///
    /// An empty result means the listing was unavailable, not that upstream
    /// has no stories.
    #[instrument(level = "info", skip(self))]
    pub async fn list_ids(&self, category: Category, limit: usize) -> Vec<u64> {
        let url = format!("{}/{}.json", self.base_url, category.endpoint());

        match self.get_json::<Vec<u64>>(&url).await {
            Ok(ids) => {
                let ids: Vec<u64> = ids.into_iter().take(limit).collect();
                info!(count = ids.len(), %category, "Listed story ids");
                ids
            }
            Err(e) => {
                error!(error = %e, %category, %url, "Failed to list story ids");
                Vec::new()
            }
        }
    }

    /// Fetch a single record without expanding its replies.
    async fn fetch_record(&self, id: u64) -> Option<Item> {
        let url = format!("{}/item/{}.json", self.base_url, id);

        match self.get_json::<Option<Item>>(&url).await {
            Ok(Some(item)) => Some(item),
            Ok(None) => {
                warn!(id, "Item does not exist upstream");
                None
            }
            Err(e) if e.is_not_found() => {
                warn!(id, "Item not found");
                None
            }
            Err(e) => {
                error!(id, error = %e, "Failed to fetch item");
                None
            }
        }
    }

    /// Fetch an item and, for stories, its first few direct replies.
    ///
    /// Returns `None` when the item is absent or the request fails. Replies
    /// are fetched concurrently and attached as `comments` in `kids` order;
    /// a reply that fails keeps its slot as a placeholder. Replies are never
    /// expanded themselves.
    #[instrument(level = "debug", skip(self))]
    pub async fn fetch_item(&self, id: u64) -> Option<Item> {
        let mut item = self.fetch_record(id).await?;

        if item.is_story() {
            let kids: Vec<u64> = item
                .kid_ids()
                .iter()
                .copied()
                .take(self.comments_limit)
                .collect();

            if !kids.is_empty() {
                debug!(id, count = kids.len(), "Fetching story comments");
                let comments = join_all(kids.iter().map(|&kid| self.fetch_record(kid))).await;
                let comments: Vec<CommentSlot> =
                    comments.into_iter().map(CommentSlot::from).collect();
                debug!(
                    id,
                    fetched = comments.iter().filter(|c| c.item().is_some()).count(),
                    "Fetched story comments"
                );
                item.comments = Some(comments);
            }
        }

        Some(item)
    }

    /// Fetch all `ids` concurrently and keep the publishable ones.
    ///
    /// Placeholders and items flagged `dead` or `deleted` are dropped; the
    /// survivors keep the relative order of `ids`.
    #[instrument(level = "info", skip_all, fields(requested = ids.len()))]
    pub async fn fetch_stories(&self, ids: &[u64]) -> Vec<Item> {
        let fetched = join_all(ids.iter().map(|&id| self.fetch_item(id))).await;

        let mut missing = 0usize;
        let mut removed = 0usize;
        let stories: Vec<Item> = fetched
            .into_iter()
            .filter_map(|item| match item {
                None => {
                    missing += 1;
                    None
                }
                Some(item) if item.is_removed() => {
                    removed += 1;
                    None
                }
                Some(item) => Some(item),
            })
            .collect();

        if missing > 0 {
            warn!(missing, "Some items could not be fetched");
        }
        info!(kept = stories.len(), missing, removed, "Fetched stories");
        stories
    }

    /// Collect today's snapshot across the top, new and best listings.
    ///
    /// `None` limits fall back to the configured defaults. This never fails:
    /// a degraded upstream yields shorter (possibly empty) lists.
    #[instrument(level = "info", skip(self))]
    pub async fn collect_daily_data(
        &self,
        top_limit: Option<usize>,
        new_limit: Option<usize>,
        best_limit: Option<usize>,
    ) -> Snapshot {
        info!("Collecting daily data");

        let top_ids = self
            .list_ids(Category::Top, top_limit.unwrap_or(self.default_limit(Category::Top)))
            .await;
        let new_ids = self
            .list_ids(Category::New, new_limit.unwrap_or(self.default_limit(Category::New)))
            .await;
        let best_ids = self
            .list_ids(Category::Best, best_limit.unwrap_or(self.default_limit(Category::Best)))
            .await;

        let (top_stories, new_stories, best_stories) = tokio::join!(
            self.fetch_stories(&top_ids),
            self.fetch_stories(&new_ids),
            self.fetch_stories(&best_ids),
        );

        let now = Local::now();
        let snapshot = Snapshot {
            date: now.format("%Y-%m-%d").to_string(),
            timestamp: now.timestamp_micros() as f64 / 1_000_000.0,
            top_stories,
            new_stories,
            best_stories,
        };

        for category in Category::ALL {
            let requested = match category {
                Category::Top => top_ids.len(),
                Category::New => new_ids.len(),
                Category::Best => best_ids.len(),
            };
            info!(
                date = %snapshot.date,
                %category,
                requested,
                kept = snapshot.stories(category).len(),
                "Collected category"
            );
        }
        snapshot
    }
}
