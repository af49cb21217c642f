//! # Design
//!
//! - Centralize application-level errors for bootstrap.
//! - Keep error messages constant while carrying context fields for debugging.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result alias for application operations.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Preference loading or saving failed.
    #[error("configuration operation failed")]
    Config {
        /// Operation identifier.
        operation: &'static str,
        /// Source configuration error.
        source: skiff_config::ConfigError,
    },
    /// Telemetry operations failed.
    #[error("telemetry operation failed")]
    Telemetry {
        /// Operation identifier.
        operation: &'static str,
        /// Source telemetry error.
        source: skiff_telemetry::TelemetryError,
    },
    /// Seed fixture could not be read.
    #[error("io operation failed")]
    Io {
        /// Operation identifier.
        operation: &'static str,
        /// Path involved in the failure.
        path: PathBuf,
        /// Source IO error.
        source: io::Error,
    },
    /// Seed fixture was not valid JSON.
    #[error("seed fixture is malformed")]
    Fixture {
        /// Fixture location.
        path: PathBuf,
        /// Source parse error.
        source: serde_json::Error,
    },
    /// Waiting for the shutdown signal failed.
    #[error("shutdown signal unavailable")]
    Signal {
        /// Source IO error.
        source: io::Error,
    },
}

impl AppError {
    pub(crate) const fn config(operation: &'static str, source: skiff_config::ConfigError) -> Self {
        Self::Config { operation, source }
    }

    pub(crate) const fn telemetry(
        operation: &'static str,
        source: skiff_telemetry::TelemetryError,
    ) -> Self {
        Self::Telemetry { operation, source }
    }
}
