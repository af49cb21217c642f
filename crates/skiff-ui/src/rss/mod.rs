//! RSS feed subscriptions: provider seam and the feed list screen.

pub mod provider;
pub mod view_model;

pub use provider::{FeedError, FeedProvider, MemoryFeedProvider, RssFeed};
pub use view_model::{RSS_SECTION_ID, RssListViewModel};
