#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Skiff application bootstrap wiring.
//!
//! Layout: `bootstrap.rs` (environment config and the run loop), `headless.rs`
//! (terminal stand-ins for navigation and dialogs), `error.rs` (application errors).

/// Environment loading and the headless run loop.
pub mod bootstrap;
/// Application-level errors.
pub mod error;
/// Navigator and dialog implementations that only log.
pub mod headless;

pub use bootstrap::{AppConfig, run_app};
pub use error::{AppError, AppResult};
