//! Feed provider seam and an in-memory implementation.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info};
use url::Url;
use uuid::Uuid;

/// One subscribed feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RssFeed {
    /// Stable identifier.
    pub id: Uuid,
    /// Feed location.
    pub url: Url,
    /// Display title; the host until the feed is fetched.
    pub title: String,
    /// Items not yet opened.
    pub unread: usize,
    /// Last successful fetch.
    pub updated_at: Option<DateTime<Utc>>,
}

/// Errors raised by feed providers.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Submitted address is not a usable feed URL.
    #[error("invalid feed url")]
    InvalidUrl {
        /// Submitted text.
        value: String,
        /// Machine-readable reason for the failure.
        reason: &'static str,
    },
    /// Feed is already subscribed.
    #[error("feed already subscribed")]
    Duplicate {
        /// Existing feed location.
        url: Url,
    },
}

/// Source of RSS subscriptions.
#[async_trait]
pub trait FeedProvider: Send + Sync {
    /// Observe the subscribed feeds.
    fn feeds(&self) -> watch::Receiver<Vec<RssFeed>>;

    /// Subscribe to the feed at `url`.
    async fn add_feed(&self, url: &str) -> anyhow::Result<RssFeed>;

    /// Unsubscribe from every feed in `ids`; unknown ids are ignored.
    async fn remove_feeds(&self, ids: &[Uuid]) -> anyhow::Result<()>;

    /// Refresh every feed.
    async fn fetch_updates(&self) -> anyhow::Result<()>;
}

/// Parse and check a user-entered feed address.
///
/// # Errors
///
/// Returns [`FeedError::InvalidUrl`] for unparsable input, non-HTTP schemes, or
/// addresses without a host.
pub fn parse_feed_url(value: &str) -> Result<Url, FeedError> {
    let invalid = |reason: &'static str| FeedError::InvalidUrl {
        value: value.to_string(),
        reason,
    };
    let url = Url::parse(value.trim()).map_err(|_| invalid("malformed"))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("unsupported_scheme"));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(invalid("missing_host"));
    }
    Ok(url)
}

/// Provider keeping subscriptions in memory; fetching only stamps the feeds.
pub struct MemoryFeedProvider {
    feeds: watch::Sender<Vec<RssFeed>>,
    fetches: AtomicU64,
}

impl MemoryFeedProvider {
    /// Empty provider.
    #[must_use]
    pub fn new() -> Self {
        let (feeds, _) = watch::channel(Vec::new());
        Self {
            feeds,
            fetches: AtomicU64::new(0),
        }
    }

    /// Number of completed [`FeedProvider::fetch_updates`] calls.
    #[must_use]
    pub fn fetch_count(&self) -> u64 {
        self.fetches.load(Ordering::Relaxed)
    }
}

impl Default for MemoryFeedProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FeedProvider for MemoryFeedProvider {
    fn feeds(&self) -> watch::Receiver<Vec<RssFeed>> {
        self.feeds.subscribe()
    }

    async fn add_feed(&self, url: &str) -> anyhow::Result<RssFeed> {
        let url = parse_feed_url(url)?;
        if self.feeds.borrow().iter().any(|feed| feed.url == url) {
            return Err(FeedError::Duplicate { url }.into());
        }
        let feed = RssFeed {
            id: Uuid::new_v4(),
            title: url.host_str().unwrap_or_default().to_string(),
            url,
            unread: 0,
            updated_at: None,
        };
        info!(feed_id = %feed.id, url = %feed.url, "feed subscribed");
        self.feeds.send_modify(|feeds| feeds.push(feed.clone()));
        Ok(feed)
    }

    async fn remove_feeds(&self, ids: &[Uuid]) -> anyhow::Result<()> {
        self.feeds.send_if_modified(|feeds| {
            let before = feeds.len();
            feeds.retain(|feed| !ids.contains(&feed.id));
            before != feeds.len()
        });
        debug!(count = ids.len(), "feeds removed");
        Ok(())
    }

    async fn fetch_updates(&self) -> anyhow::Result<()> {
        let now = Utc::now();
        self.feeds.send_modify(|feeds| {
            for feed in feeds.iter_mut() {
                feed.updated_at = Some(now);
            }
        });
        self.fetches.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}
