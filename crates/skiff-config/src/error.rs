//! Error types for preference operations.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Primary error type for preference operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Field contained an invalid value.
    #[error("invalid preference field")]
    InvalidField {
        /// Field that failed validation.
        field: &'static str,
        /// Offending value when available.
        value: Option<String>,
        /// Machine-readable reason for the failure.
        reason: &'static str,
    },
    /// Preference document could not be parsed.
    #[error("failed to parse preferences")]
    Parse {
        /// File the document was read from.
        path: PathBuf,
        /// Source serde error.
        source: serde_json::Error,
    },
    /// Preference document could not be serialised.
    #[error("failed to serialise preferences")]
    Serialize {
        /// Source serde error.
        source: serde_json::Error,
    },
    /// File system operation failed.
    #[error("filesystem operation failed")]
    Io {
        /// Operation identifier.
        operation: &'static str,
        /// Path involved in the operation.
        path: PathBuf,
        /// Source IO error.
        source: io::Error,
    },
}

/// Convenience alias for preference results.
pub type ConfigResult<T> = Result<T, ConfigError>;
