//! Torrent list: search, sort, grouping, and the list screen.

pub mod actions;
pub mod search;
pub mod sections;
pub mod sort;
pub mod view_model;

pub use search::{filter_torrents, search_matches};
pub use sections::{TORRENTS_SECTION_ID, derive_sections, group_sections};
pub use sort::{sort_torrents, sort_torrents_at};
pub use view_model::{LIST_TITLE, TorrentListViewModel};
