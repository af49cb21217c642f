//! Core torrent domain types shared across the workspace.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use skiff_events::{InfoHash, TorrentState};

/// Source describing how a torrent should be added to the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TorrentSource {
    /// Magnet URI that should be resolved by the engine.
    Magnet {
        /// Magnet URI to resolve and add.
        uri: String,
    },
    /// Raw `.torrent` metainfo bytes.
    Metainfo {
        /// Bencoded metainfo payload.
        bytes: Vec<u8>,
    },
}

impl TorrentSource {
    /// Convenience constructor for magnet-based sources.
    #[must_use]
    pub fn magnet(uri: impl Into<String>) -> Self {
        Self::Magnet { uri: uri.into() }
    }

    /// Convenience constructor for metainfo-based sources.
    #[must_use]
    pub fn metainfo(bytes: impl Into<Vec<u8>>) -> Self {
        Self::Metainfo {
            bytes: bytes.into(),
        }
    }
}

/// Request payload for admitting a torrent into the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTorrent {
    /// How the torrent should be retrieved.
    pub source: TorrentSource,
    /// Optional override for the download directory.
    #[serde(default)]
    pub download_dir: Option<String>,
    /// Whether the torrent should start paused.
    #[serde(default)]
    pub start_paused: bool,
}

/// Options controlling how the engine removes torrents.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct RemoveTorrent {
    /// Whether to remove on-disk data alongside the torrent.
    #[serde(default)]
    pub with_data: bool,
}

/// Per-file download priority.
#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FilePriority {
    /// Do not download the file.
    Skip,
    /// Throttle the download priority.
    Low,
    /// Default priority level.
    #[default]
    Normal,
    /// Highest available priority.
    High,
}

impl FilePriority {
    /// Whether the engine will fetch the file at all.
    #[must_use]
    pub const fn is_wanted(self) -> bool {
        !matches!(self, Self::Skip)
    }
}

/// Individual file record as reported by the engine, in engine index order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TorrentFile {
    /// Index of the file within the engine's flat file list.
    pub index: usize,
    /// Slash-delimited path relative to the torrent's download directory.
    pub path: String,
    /// Final path segment.
    pub name: String,
    /// Total size in bytes.
    pub size_bytes: u64,
    /// Completion fraction in `0.0..=1.0`.
    pub progress: f64,
    /// Current download priority.
    pub priority: FilePriority,
}

impl TorrentFile {
    /// Absolute location of the file once downloaded into `download_dir`.
    #[must_use]
    pub fn full_path(&self, download_dir: &str) -> PathBuf {
        payload_path(download_dir, &self.path)
    }
}

/// Join a slash-delimited payload path onto `download_dir`, skipping empty segments.
#[must_use]
pub fn payload_path(download_dir: &str, relative: &str) -> PathBuf {
    relative
        .split('/')
        .filter(|segment| !segment.is_empty())
        .fold(PathBuf::from(download_dir), |path, segment| path.join(segment))
}

/// Point-in-time read of a handle's mutable fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TorrentSnapshot {
    /// Torrent identity.
    pub info_hash: InfoHash,
    /// Display name.
    pub name: String,
    /// User-facing state.
    pub state: TorrentState,
    /// Overall completion fraction in `0.0..=1.0`.
    pub progress: f64,
    /// Bytes selected for download.
    pub total_wanted: u64,
    /// Creation date recorded in the metainfo, when present.
    pub creation_date: Option<DateTime<Utc>>,
    /// When the torrent was added to the engine.
    pub added_at: DateTime<Utc>,
    /// Directory the payload is stored in.
    pub download_dir: Option<String>,
    /// False once the engine has dropped the torrent.
    pub is_valid: bool,
}
