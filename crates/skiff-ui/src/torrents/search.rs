//! Whitespace-token search over torrent names.

use skiff_torrent_core::TorrentSnapshot;

/// Whether `text` case-insensitively contains every whitespace-separated token of `query`.
///
/// An empty or blank query matches everything.
#[must_use]
pub fn search_matches(text: &str, query: &str) -> bool {
    let haystack = text.to_lowercase();
    query
        .split_whitespace()
        .all(|token| haystack.contains(&token.to_lowercase()))
}

/// Keep the snapshots whose name matches `query`.
#[must_use]
pub fn filter_torrents(snapshots: Vec<TorrentSnapshot>, query: &str) -> Vec<TorrentSnapshot> {
    if query.trim().is_empty() {
        return snapshots;
    }
    snapshots
        .into_iter()
        .filter(|snapshot| search_matches(&snapshot.name, query))
        .collect()
}
