//! Event payload types carried between the engine and the view-model layer.

use std::fmt::{self, Display, Formatter};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier assigned to each event emitted on the bus.
pub type EventId = u64;

/// Default buffer size for the in-memory replay ring.
pub const DEFAULT_REPLAY_CAPACITY: usize = 1_024;

/// Hex-encoded info hash identifying a torrent inside the engine.
///
/// Values are normalised to lowercase so lookups by deep links and by engine
/// notifications compare equal regardless of the casing they arrived with.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InfoHash(String);

impl InfoHash {
    /// Wrap a hex string, lowercasing it.
    #[must_use]
    pub fn new(hex: impl Into<String>) -> Self {
        Self(hex.into().to_ascii_lowercase())
    }

    /// Borrow the lowercase hex representation.
    #[must_use]
    pub fn as_hex(&self) -> &str {
        &self.0
    }
}

impl Display for InfoHash {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// User-facing torrent states. Grouped list sections are keyed by these values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TorrentState {
    /// Verifying pieces already on disk.
    CheckingFiles,
    /// Waiting for metadata from peers (magnet links).
    DownloadingMetadata,
    /// Actively downloading payload.
    Downloading,
    /// All wanted pieces are present but the torrent is not seeding.
    Finished,
    /// Uploading to peers after completion.
    Seeding,
    /// Validating fast-resume data.
    CheckingResumeData,
    /// Paused by the user.
    Paused,
    /// The engine hit a storage failure.
    StorageError,
}

impl TorrentState {
    /// Every state, in the default group ordering.
    pub const ALL: [Self; 8] = [
        Self::CheckingFiles,
        Self::DownloadingMetadata,
        Self::Downloading,
        Self::Finished,
        Self::Seeding,
        Self::CheckingResumeData,
        Self::Paused,
        Self::StorageError,
    ];

    /// Stable machine-readable name, used as section id and header key.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::CheckingFiles => "checking_files",
            Self::DownloadingMetadata => "downloading_metadata",
            Self::Downloading => "downloading",
            Self::Finished => "finished",
            Self::Seeding => "seeding",
            Self::CheckingResumeData => "checking_resume_data",
            Self::Paused => "paused",
            Self::StorageError => "storage_error",
        }
    }
}

impl Display for TorrentState {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.name())
    }
}

/// Typed events published by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A torrent was registered with the engine.
    TorrentAdded {
        /// Torrent that was added.
        info_hash: InfoHash,
        /// Display name at admission time.
        name: String,
    },
    /// A torrent was removed from the engine.
    TorrentRemoved {
        /// Torrent that was removed.
        info_hash: InfoHash,
    },
    /// Torrent transitioned between user-facing states.
    StateChanged {
        /// Torrent whose state changed.
        info_hash: InfoHash,
        /// State before the transition.
        previous: TorrentState,
        /// State after the transition.
        current: TorrentState,
    },
    /// Metainfo became available (magnet resolution); name and file list changed.
    MetadataUpdated {
        /// Torrent whose metadata was resolved.
        info_hash: InfoHash,
        /// Display name from the metainfo.
        name: String,
    },
    /// Periodic progress tick; per-file progress must be re-read from the handle.
    Progress {
        /// Torrent being tracked.
        info_hash: InfoHash,
        /// Overall completion fraction in `0.0..=1.0`.
        progress: f64,
    },
}

impl Event {
    /// Machine-friendly discriminator for log fields.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::TorrentAdded { .. } => "torrent_added",
            Self::TorrentRemoved { .. } => "torrent_removed",
            Self::StateChanged { .. } => "state_changed",
            Self::MetadataUpdated { .. } => "metadata_updated",
            Self::Progress { .. } => "progress",
        }
    }

    /// Torrent the event refers to.
    #[must_use]
    pub const fn info_hash(&self) -> &InfoHash {
        match self {
            Self::TorrentAdded { info_hash, .. }
            | Self::TorrentRemoved { info_hash }
            | Self::StateChanged { info_hash, .. }
            | Self::MetadataUpdated { info_hash, .. }
            | Self::Progress { info_hash, .. } => info_hash,
        }
    }

    /// Whether the event moves a torrent between state groups.
    #[must_use]
    pub fn is_state_change(&self) -> bool {
        matches!(self, Self::StateChanged { previous, current, .. } if previous != current)
    }

    /// Whether list sections must be re-derived after this event.
    ///
    /// Progress ticks return `false` so sections are not rebuilt on every tick.
    #[must_use]
    pub fn affects_sections(&self) -> bool {
        match self {
            Self::TorrentAdded { .. }
            | Self::TorrentRemoved { .. }
            | Self::MetadataUpdated { .. } => true,
            Self::StateChanged { .. } => self.is_state_change(),
            Self::Progress { .. } => false,
        }
    }
}

/// Metadata wrapper around events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Sequential identifier assigned by the bus.
    pub id: EventId,
    /// Emission timestamp.
    pub timestamp: DateTime<Utc>,
    /// Wrapped payload.
    pub event: Event,
}
