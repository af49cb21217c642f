//! Error types for torrent core services.

use skiff_events::InfoHash;
use thiserror::Error;

/// Primary error type for torrent operations.
#[derive(Debug, Error)]
pub enum TorrentError {
    /// Operation is not supported by the underlying engine.
    #[error("torrent operation not supported")]
    Unsupported {
        /// Operation identifier.
        operation: &'static str,
    },
    /// Torrent was not found.
    #[error("torrent not found")]
    NotFound {
        /// Missing torrent identifier.
        info_hash: InfoHash,
    },
    /// File index does not exist in the torrent's file list.
    #[error("file index out of range")]
    FileIndexOutOfRange {
        /// Torrent the lookup was made against.
        info_hash: InfoHash,
        /// Requested index.
        index: usize,
    },
    /// Torrent source could not be interpreted.
    #[error("invalid torrent source")]
    InvalidSource {
        /// Machine-readable reason for the failure.
        reason: &'static str,
        /// Offending value when available.
        value: Option<String>,
    },
}

/// Convenience alias for torrent operation results.
pub type TorrentResult<T> = Result<T, TorrentError>;
