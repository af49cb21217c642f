//! In-process engine that keeps torrent state in memory.
//!
//! # Design
//! - Mirrors the observable surface of a real engine: a watch of handles plus
//!   state-change and progress events on the shared bus.
//! - No transfers happen; progress moves only through the explicit setters, which
//!   makes the engine usable for the headless binary and for deterministic tests.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use skiff_events::{Event, EventBus, EventStream, InfoHash, TorrentState};
use tokio::sync::watch;
use tracing::{debug, info};
use url::Url;

use crate::error::{TorrentError, TorrentResult};
use crate::model::{
    AddTorrent, FilePriority, RemoveTorrent, TorrentFile, TorrentSnapshot, TorrentSource,
};
use crate::service::{SharedHandle, TorrentHandle, TorrentService};

/// Seed description used to populate the engine (fixtures, tests).
#[derive(Debug, Clone, Deserialize)]
pub struct TorrentSeed {
    /// Torrent identity.
    pub info_hash: InfoHash,
    /// Display name.
    pub name: String,
    /// Initial state.
    #[serde(default = "default_seed_state")]
    pub state: TorrentState,
    /// Files in engine index order.
    #[serde(default)]
    pub files: Vec<SeedFile>,
    /// Metainfo creation date.
    #[serde(default)]
    pub creation_date: Option<DateTime<Utc>>,
    /// Admission timestamp; defaults to now.
    #[serde(default)]
    pub added_at: Option<DateTime<Utc>>,
    /// Payload directory.
    #[serde(default)]
    pub download_dir: Option<String>,
}

const fn default_seed_state() -> TorrentState {
    TorrentState::Downloading
}

/// File entry inside a [`TorrentSeed`].
#[derive(Debug, Clone, Deserialize)]
pub struct SeedFile {
    /// Slash-delimited relative path.
    pub path: String,
    /// Size in bytes.
    pub size_bytes: u64,
    /// Initial completion fraction.
    #[serde(default)]
    pub progress: f64,
    /// Initial priority.
    #[serde(default)]
    pub priority: FilePriority,
}

impl TorrentSeed {
    /// Minimal seed with the given files, all at zero progress.
    #[must_use]
    pub fn new(info_hash: &str, name: &str, paths: &[(&str, u64)]) -> Self {
        Self {
            info_hash: InfoHash::new(info_hash),
            name: name.to_string(),
            state: default_seed_state(),
            files: paths
                .iter()
                .map(|(path, size_bytes)| SeedFile {
                    path: (*path).to_string(),
                    size_bytes: *size_bytes,
                    progress: 0.0,
                    priority: FilePriority::Normal,
                })
                .collect(),
            creation_date: None,
            added_at: None,
            download_dir: None,
        }
    }
}

fn build_files(files: Vec<SeedFile>) -> Vec<TorrentFile> {
    files
        .into_iter()
        .enumerate()
        .map(|(index, file)| TorrentFile {
            index,
            name: file
                .path
                .rsplit('/')
                .find(|segment| !segment.is_empty())
                .unwrap_or_default()
                .to_string(),
            path: file.path,
            size_bytes: file.size_bytes,
            progress: file.progress.clamp(0.0, 1.0),
            priority: file.priority,
        })
        .collect()
}

struct TorrentRecord {
    name: String,
    state: TorrentState,
    files: Vec<TorrentFile>,
    creation_date: Option<DateTime<Utc>>,
    added_at: DateTime<Utc>,
    download_dir: Option<String>,
    is_valid: bool,
}

impl TorrentRecord {
    fn total_wanted(&self) -> u64 {
        self.files
            .iter()
            .filter(|file| file.priority.is_wanted())
            .map(|file| file.size_bytes)
            .sum()
    }

    #[allow(clippy::cast_precision_loss)]
    fn progress(&self) -> f64 {
        let total = self.total_wanted();
        if total == 0 {
            return 0.0;
        }
        let done: f64 = self
            .files
            .iter()
            .filter(|file| file.priority.is_wanted())
            .map(|file| file.size_bytes as f64 * file.progress)
            .sum();
        done / total as f64
    }
}

/// Torrent held by the [`MemoryEngine`].
pub struct MemoryTorrent {
    info_hash: InfoHash,
    bus: EventBus,
    record: Mutex<TorrentRecord>,
}

impl MemoryTorrent {
    fn from_seed(seed: TorrentSeed, bus: EventBus) -> Self {
        let files = build_files(seed.files);
        Self {
            info_hash: seed.info_hash,
            bus,
            record: Mutex::new(TorrentRecord {
                name: seed.name,
                state: seed.state,
                files,
                creation_date: seed.creation_date,
                added_at: seed.added_at.unwrap_or_else(Utc::now),
                download_dir: seed.download_dir,
                is_valid: true,
            }),
        }
    }

    fn record(&self) -> MutexGuard<'_, TorrentRecord> {
        self.record.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Move the torrent to `state`, publishing a state change when it differs.
    pub fn set_state(&self, state: TorrentState) {
        let previous = {
            let mut record = self.record();
            std::mem::replace(&mut record.state, state)
        };
        if previous != state {
            debug!(info_hash = %self.info_hash, from = %previous, to = %state, "torrent state changed");
            let _ = self.bus.publish(Event::StateChanged {
                info_hash: self.info_hash.clone(),
                previous,
                current: state,
            });
        }
    }

    /// Update one file's completion and publish a progress tick.
    ///
    /// # Errors
    ///
    /// Returns [`TorrentError::FileIndexOutOfRange`] when `index` is unknown.
    pub fn set_file_progress(&self, index: usize, progress: f64) -> TorrentResult<()> {
        let overall = {
            let mut record = self.record();
            let file = record
                .files
                .get_mut(index)
                .ok_or_else(|| TorrentError::FileIndexOutOfRange {
                    info_hash: self.info_hash.clone(),
                    index,
                })?;
            file.progress = progress.clamp(0.0, 1.0);
            record.progress()
        };
        self.publish_progress(overall);
        Ok(())
    }

    /// Install the metainfo for a torrent admitted from a magnet link.
    pub fn resolve_metadata(&self, name: &str, files: Vec<SeedFile>) {
        {
            let mut record = self.record();
            record.name = name.to_string();
            record.files = build_files(files);
        }
        let _ = self.bus.publish(Event::MetadataUpdated {
            info_hash: self.info_hash.clone(),
            name: name.to_string(),
        });
        self.set_state(TorrentState::Downloading);
    }

    fn publish_progress(&self, progress: f64) {
        let _ = self.bus.publish(Event::Progress {
            info_hash: self.info_hash.clone(),
            progress,
        });
    }

    fn invalidate(&self) {
        self.record().is_valid = false;
    }
}

#[async_trait]
impl TorrentHandle for MemoryTorrent {
    fn info_hash(&self) -> InfoHash {
        self.info_hash.clone()
    }

    fn snapshot(&self) -> TorrentSnapshot {
        let record = self.record();
        TorrentSnapshot {
            info_hash: self.info_hash.clone(),
            name: record.name.clone(),
            state: record.state,
            progress: record.progress(),
            total_wanted: record.total_wanted(),
            creation_date: record.creation_date,
            added_at: record.added_at,
            download_dir: record.download_dir.clone(),
            is_valid: record.is_valid,
        }
    }

    fn files(&self) -> Vec<TorrentFile> {
        self.record().files.clone()
    }

    async fn pause(&self) -> anyhow::Result<()> {
        self.set_state(TorrentState::Paused);
        Ok(())
    }

    async fn resume(&self) -> anyhow::Result<()> {
        let complete = self.record().progress() >= 1.0;
        self.set_state(if complete {
            TorrentState::Seeding
        } else {
            TorrentState::Downloading
        });
        Ok(())
    }

    async fn rehash(&self) -> anyhow::Result<()> {
        self.set_state(TorrentState::CheckingFiles);
        Ok(())
    }

    async fn set_file_priority(&self, index: usize, priority: FilePriority) -> anyhow::Result<()> {
        let overall = {
            let mut record = self.record();
            let file = record
                .files
                .get_mut(index)
                .ok_or_else(|| TorrentError::FileIndexOutOfRange {
                    info_hash: self.info_hash.clone(),
                    index,
                })?;
            file.priority = priority;
            record.progress()
        };
        self.publish_progress(overall);
        Ok(())
    }
}

/// Engine keeping every torrent in memory.
pub struct MemoryEngine {
    bus: EventBus,
    torrents: watch::Sender<Vec<SharedHandle>>,
    records: Mutex<Vec<Arc<MemoryTorrent>>>,
}

impl MemoryEngine {
    /// Construct an empty engine publishing on `bus`.
    #[must_use]
    pub fn new(bus: EventBus) -> Self {
        let (torrents, _) = watch::channel(Vec::new());
        Self {
            bus,
            torrents,
            records: Mutex::new(Vec::new()),
        }
    }

    /// Bus the engine publishes on.
    #[must_use]
    pub const fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Admit a seeded torrent. An existing torrent with the same hash is returned unchanged.
    pub fn insert(&self, seed: TorrentSeed) -> Arc<MemoryTorrent> {
        let mut records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = records
            .iter()
            .find(|record| record.info_hash == seed.info_hash)
        {
            return Arc::clone(existing);
        }

        let name = seed.name.clone();
        let torrent = Arc::new(MemoryTorrent::from_seed(seed, self.bus.clone()));
        records.push(Arc::clone(&torrent));
        self.publish_set(&records);
        drop(records);

        info!(info_hash = %torrent.info_hash, name = %name, "torrent admitted");
        let _ = self.bus.publish(Event::TorrentAdded {
            info_hash: torrent.info_hash.clone(),
            name,
        });
        torrent
    }

    /// Look up a torrent by hash.
    #[must_use]
    pub fn get(&self, info_hash: &InfoHash) -> Option<Arc<MemoryTorrent>> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|record| record.info_hash == *info_hash)
            .cloned()
    }

    fn publish_set(&self, records: &[Arc<MemoryTorrent>]) {
        let handles = records
            .iter()
            .map(|record| Arc::clone(record) as SharedHandle)
            .collect();
        self.torrents.send_replace(handles);
    }
}

fn seed_from_magnet(uri: &str) -> TorrentResult<TorrentSeed> {
    let invalid = |reason: &'static str| TorrentError::InvalidSource {
        reason,
        value: Some(uri.to_string()),
    };
    let url = Url::parse(uri).map_err(|_| invalid("malformed_uri"))?;
    if url.scheme() != "magnet" {
        return Err(invalid("not_magnet"));
    }

    let mut hash = None;
    let mut name = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "xt" => hash = value.strip_prefix("urn:btih:").map(str::to_string),
            "dn" => name = Some(value.into_owned()),
            _ => {}
        }
    }
    let hash = hash
        .filter(|hash| !hash.is_empty())
        .ok_or_else(|| invalid("missing_btih"))?;

    Ok(TorrentSeed {
        name: name.unwrap_or_else(|| hash.clone()),
        info_hash: InfoHash::new(hash),
        state: TorrentState::DownloadingMetadata,
        files: Vec::new(),
        creation_date: None,
        added_at: None,
        download_dir: None,
    })
}

#[async_trait]
impl TorrentService for MemoryEngine {
    fn torrents(&self) -> watch::Receiver<Vec<SharedHandle>> {
        self.torrents.subscribe()
    }

    fn events(&self) -> EventStream {
        self.bus.subscribe(None)
    }

    async fn add_torrent(&self, request: AddTorrent) -> anyhow::Result<InfoHash> {
        let mut seed = match request.source {
            TorrentSource::Magnet { uri } => seed_from_magnet(&uri)?,
            TorrentSource::Metainfo { .. } => {
                return Err(TorrentError::Unsupported {
                    operation: "add_torrent.metainfo",
                }
                .into());
            }
        };
        seed.download_dir = request.download_dir;
        if request.start_paused {
            seed.state = TorrentState::Paused;
        }
        Ok(self.insert(seed).info_hash.clone())
    }

    async fn remove_torrent(
        &self,
        info_hash: &InfoHash,
        options: RemoveTorrent,
    ) -> anyhow::Result<()> {
        let mut records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        let position = records
            .iter()
            .position(|record| record.info_hash == *info_hash)
            .ok_or_else(|| TorrentError::NotFound {
                info_hash: info_hash.clone(),
            })?;
        let removed = records.remove(position);
        removed.invalidate();
        self.publish_set(&records);
        drop(records);

        info!(info_hash = %info_hash, with_data = options.with_data, "torrent removed");
        let _ = self.bus.publish(Event::TorrentRemoved {
            info_hash: info_hash.clone(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> MemoryEngine {
        MemoryEngine::new(EventBus::with_capacity(32))
    }

    #[test]
    fn insert_exposes_handles_and_derives_names() {
        let engine = engine();
        let torrents = engine.torrents();
        let torrent = engine.insert(TorrentSeed::new(
            "AB",
            "Album",
            &[("Album/cover.jpg", 10), ("Album/01.flac", 30)],
        ));

        assert_eq!(torrents.borrow().len(), 1);
        let files = torrent.files();
        assert_eq!(files[0].name, "cover.jpg");
        assert_eq!(files[1].index, 1);
        assert_eq!(torrent.snapshot().total_wanted, 40);
    }

    #[test]
    fn progress_is_weighted_by_wanted_bytes() {
        let engine = engine();
        let torrent = engine.insert(TorrentSeed::new("aa", "x", &[("a", 10), ("b", 30)]));
        torrent.set_file_progress(1, 1.0).expect("index 1 exists");
        assert!((torrent.snapshot().progress - 0.75).abs() < f64::EPSILON);
        assert!(matches!(
            torrent.set_file_progress(9, 1.0),
            Err(TorrentError::FileIndexOutOfRange { index: 9, .. })
        ));
    }

    #[tokio::test]
    async fn commands_publish_state_changes() {
        let engine = engine();
        let mut events = engine.events();
        let torrent = engine.insert(TorrentSeed::new("aa", "x", &[("a", 10)]));

        torrent.pause().await.expect("pause");
        torrent.pause().await.expect("pause twice");
        torrent.resume().await.expect("resume");

        let added = events.next().await.expect("added");
        assert_eq!(added.event.kind(), "torrent_added");
        let paused = events.next().await.expect("paused");
        assert!(paused.event.is_state_change());
        let resumed = events.next().await.expect("resumed");
        assert_eq!(
            resumed.event,
            Event::StateChanged {
                info_hash: InfoHash::new("aa"),
                previous: TorrentState::Paused,
                current: TorrentState::Downloading,
            }
        );
    }

    #[tokio::test]
    async fn magnet_admission_and_removal() {
        let engine = engine();
        let hash = engine
            .add_torrent(AddTorrent {
                source: TorrentSource::magnet("magnet:?xt=urn:btih:ABCD&dn=Debian"),
                download_dir: None,
                start_paused: false,
            })
            .await
            .expect("magnet accepted");
        assert_eq!(hash.as_hex(), "abcd");

        let handle = engine.find(&hash).expect("handle present");
        assert_eq!(handle.snapshot().name, "Debian");
        assert_eq!(handle.snapshot().state, TorrentState::DownloadingMetadata);

        engine
            .remove_torrent(&hash, RemoveTorrent { with_data: true })
            .await
            .expect("removed");
        assert!(!handle.snapshot().is_valid);
        assert!(engine.find(&hash).is_none());
        assert!(
            engine
                .remove_torrent(&hash, RemoveTorrent::default())
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn metadata_resolution_replaces_files() {
        let engine = engine();
        let hash = engine
            .add_torrent(AddTorrent {
                source: TorrentSource::magnet("magnet:?xt=urn:btih:ee"),
                download_dir: Some("/downloads".into()),
                start_paused: false,
            })
            .await
            .expect("magnet accepted");
        let torrent = engine.get(&hash).expect("record present");
        assert_eq!(torrent.snapshot().name, "ee");
        assert!(torrent.files().is_empty());

        let mut events = engine.bus().subscribe(engine.bus().last_event_id());
        torrent.resolve_metadata(
            "Distro",
            vec![SeedFile {
                path: "Distro/image.iso".into(),
                size_bytes: 2_048,
                progress: 0.0,
                priority: FilePriority::Normal,
            }],
        );

        let resolved = events.next().await.expect("metadata event");
        assert!(resolved.event.affects_sections());
        assert_eq!(torrent.files()[0].name, "image.iso");
        assert_eq!(torrent.snapshot().state, TorrentState::Downloading);
    }

    #[tokio::test]
    async fn malformed_sources_are_rejected() {
        let engine = engine();
        for uri in ["not a uri", "https://example.org/a.torrent", "magnet:?dn=x"] {
            let result = engine
                .add_torrent(AddTorrent {
                    source: TorrentSource::magnet(uri),
                    download_dir: None,
                    start_paused: false,
                })
                .await;
            assert!(result.is_err(), "{uri} should be rejected");
        }
        let metainfo = engine
            .add_torrent(AddTorrent {
                source: TorrentSource::metainfo(vec![b'd', b'e']),
                download_dir: None,
                start_paused: false,
            })
            .await;
        assert!(metainfo.is_err());
    }
}
