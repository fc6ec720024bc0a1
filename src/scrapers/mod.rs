//! Upstream scrapers that turn a content API into daily snapshots.
//!
//! Each scraper follows the same two-phase pattern:
//!
//! 1. **Listing**: Discover item identifiers for a category
//! 2. **Fetching**: Download each item concurrently, degrading failures to
//!    placeholders instead of aborting the batch
//!
//! # Supported Sources
//!
//! | Source | Module | Method | Notes |
//! |--------|--------|--------|-------|
//! | Hacker News | [`hackernews`] | Firebase JSON API | top/new/best listings, first 3 replies per story |

pub mod hackernews;
