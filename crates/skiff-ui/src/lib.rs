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

//! Screen view-models for Skiff.
//!
//! Each view-model owns one spawned task acting as its sequential UI context. Upstream
//! observables (engine handles, engine events, preferences, user input) are merged
//! there, re-derived through pure functions, and published on `watch` channels.
//!
//! Layout: `files/` (tree projection and the file browser), `torrents/` (search, sort,
//! grouping, list screen), `rss/` (feed provider seam and list screen), `preferences/`
//! (switch rows, patron screen), `routing.rs` (deep links), plus the shared
//! `reactive`, `section`, `navigation`, and `dialog` primitives.

pub mod dialog;
pub mod files;
pub mod navigation;
pub mod preferences;
pub mod reactive;
pub mod routing;
pub mod rss;
pub mod section;
pub mod torrents;

pub use dialog::{ActionStyle, Alert, AlertAction, Dialogs, TextPrompt};
pub use navigation::{Navigator, Route};
pub use reactive::DisposeBag;
pub use section::{IndexPath, SectionModel};
