#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    clippy::all,
    clippy::pedantic,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls
)]
#![warn(missing_docs, unreachable_pub)]
#![allow(clippy::module_name_repetitions)]

//! User preferences for the Skiff workspace.
//!
//! Layout: `model.rs` (the preference document), `validate.rs` (document checks),
//! `store.rs` (`PreferencesStore`, observable state plus JSON persistence),
//! `error.rs` (typed failures).

pub mod error;
pub mod model;
pub mod store;
pub mod validate;

pub use error::{ConfigError, ConfigResult};
pub use model::{Preferences, SortType, Toggle};
pub use store::PreferencesStore;
pub use validate::validate_preferences;
