//! Deep-link handling.
//!
//! Handlers are tried in order and the first one that accepts the link wins:
//! torrent details by info hash, local `.torrent` files, then remote downloads.

use skiff_events::InfoHash;
use skiff_torrent_core::TorrentService;
use tracing::debug;
use url::Url;

use crate::navigation::{Navigator, Route};

/// Prefix of links pointing at an existing torrent.
pub const DETAILS_PREFIX: &str = "skiff:hash:";

/// Route a deep link should open, if any.
#[must_use]
pub fn route_for_link(link: &str, service: &dyn TorrentService) -> Option<Route> {
    torrent_details(link, service)
        .or_else(|| local_file(link))
        .or_else(|| remote_file(link))
}

/// Navigate to the route for `link`. Returns whether a handler accepted it.
pub fn open_link(link: &str, service: &dyn TorrentService, navigator: &dyn Navigator) -> bool {
    match route_for_link(link, service) {
        Some(route) => {
            navigator.navigate(route);
            true
        }
        None => {
            debug!(link, "deep link ignored");
            false
        }
    }
}

fn torrent_details(link: &str, service: &dyn TorrentService) -> Option<Route> {
    let hash = link.strip_prefix(DETAILS_PREFIX)?;
    let handle = service.find(&InfoHash::new(hash))?;
    Some(Route::TorrentDetails {
        info_hash: handle.info_hash(),
    })
}

fn local_file(link: &str) -> Option<Route> {
    if !link.starts_with("file:///") {
        return None;
    }
    let url = Url::parse(link).ok()?;
    Some(Route::AddTorrent { url })
}

fn remote_file(link: &str) -> Option<Route> {
    if !link.starts_with("http") {
        return None;
    }
    let url = Url::parse(link).ok()?;
    Some(Route::RemoteAddTorrent { url })
}
