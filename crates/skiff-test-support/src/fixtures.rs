//! Engine builders and helpers for observing `watch` outputs in tests.

use std::sync::Arc;
use std::time::Duration;

use skiff_events::EventBus;
use skiff_torrent_core::memory::{MemoryEngine, MemoryTorrent, TorrentSeed};
use tokio::sync::watch;

/// How long [`wait_for`] waits before failing the test.
pub const WAIT_TIMEOUT: Duration = Duration::from_secs(2);

/// Fresh in-memory engine with a small replay ring.
#[must_use]
pub fn memory_engine() -> Arc<MemoryEngine> {
    Arc::new(MemoryEngine::new(EventBus::with_capacity(64)))
}

/// Admit a torrent with `paths` (relative path, size) at zero progress.
pub fn seed_torrent(
    engine: &MemoryEngine,
    info_hash: &str,
    name: &str,
    paths: &[(&str, u64)],
) -> Arc<MemoryTorrent> {
    engine.insert(TorrentSeed::new(info_hash, name, paths))
}

/// Wait until `receiver` holds a value satisfying `predicate` and return a copy.
///
/// # Panics
///
/// Panics when the predicate does not hold within [`WAIT_TIMEOUT`] or the sender
/// is dropped first.
pub async fn wait_for<T, F>(receiver: &mut watch::Receiver<T>, predicate: F) -> T
where
    T: Clone,
    F: FnMut(&T) -> bool,
{
    let value = tokio::time::timeout(WAIT_TIMEOUT, receiver.wait_for(predicate))
        .await
        .expect("timed out waiting for watch value")
        .expect("watch sender dropped");
    value.clone()
}

/// Give spawned view-model tasks a chance to run.
pub async fn settle() {
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
    tokio::time::sleep(Duration::from_millis(10)).await;
}
