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

//! Engine-agnostic torrent interfaces and DTOs.
//!
//! Layout: `model.rs` (snapshots and file records), `service.rs` (handle and
//! service traits consumed by the view-model layer), `error.rs` (typed failures),
//! `memory.rs` (in-process engine used for headless runs and tests).

pub mod error;
pub mod memory;
pub mod model;
pub mod service;

pub use error::{TorrentError, TorrentResult};
pub use model::{
    AddTorrent, FilePriority, RemoveTorrent, TorrentFile, TorrentSnapshot, TorrentSource,
    payload_path,
};
pub use service::{SharedHandle, TorrentHandle, TorrentService};
pub use skiff_events::{InfoHash, TorrentState};
