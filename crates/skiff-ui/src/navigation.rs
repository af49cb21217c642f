//! Route requests emitted by view-models.

use std::path::PathBuf;

use skiff_events::InfoHash;
use url::Url;
use uuid::Uuid;

/// Screens and external destinations a view-model can request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Preferences root screen.
    Preferences,
    /// RSS feed list.
    Rss,
    /// Items of one RSS feed.
    RssChannel {
        /// Feed identifier.
        feed_id: Uuid,
    },
    /// Detail screen of a torrent already in the engine.
    TorrentDetails {
        /// Torrent identity.
        info_hash: InfoHash,
    },
    /// Add-torrent flow for a local `.torrent` file or a magnet link.
    AddTorrent {
        /// Location of the torrent to add.
        url: Url,
    },
    /// Add-torrent flow that downloads the metainfo first.
    RemoteAddTorrent {
        /// Remote metainfo location.
        url: Url,
    },
    /// Quick-look preview of a downloaded file.
    FilePreview {
        /// Absolute location of the file.
        path: PathBuf,
    },
    /// External web page.
    External {
        /// Page to open.
        url: Url,
    },
}

/// Performs route requests on behalf of view-models.
pub trait Navigator: Send + Sync {
    /// Present `route`.
    fn navigate(&self, route: Route);
}
