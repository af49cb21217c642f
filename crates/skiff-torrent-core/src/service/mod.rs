//! Handle and service traits implemented by torrent engine adapters.

use std::sync::Arc;

use anyhow::bail;
use async_trait::async_trait;
use skiff_events::{EventStream, InfoHash};
use tokio::sync::watch;

use crate::model::{AddTorrent, FilePriority, RemoveTorrent, TorrentFile, TorrentSnapshot};

/// Shared reference to a torrent handle.
pub type SharedHandle = Arc<dyn TorrentHandle>;

/// Opaque reference to one torrent inside the engine.
#[async_trait]
pub trait TorrentHandle: Send + Sync {
    /// Torrent identity.
    fn info_hash(&self) -> InfoHash;

    /// Read the current mutable fields.
    fn snapshot(&self) -> TorrentSnapshot;

    /// Read the flat file list in engine index order.
    fn files(&self) -> Vec<TorrentFile>;

    /// Pause transfers.
    async fn pause(&self) -> anyhow::Result<()>;

    /// Resume transfers.
    async fn resume(&self) -> anyhow::Result<()>;

    /// Force a recheck of on-disk data.
    async fn rehash(&self) -> anyhow::Result<()>;

    /// Update a file's download priority; default implementation reports lack of support.
    async fn set_file_priority(&self, index: usize, priority: FilePriority) -> anyhow::Result<()> {
        let _ = (index, priority);
        bail!("file priority updates not supported by this engine");
    }
}

/// Engine-wide torrent set.
#[async_trait]
pub trait TorrentService: Send + Sync {
    /// Observable collection of handles, in admission order.
    fn torrents(&self) -> watch::Receiver<Vec<SharedHandle>>;

    /// Subscribe to engine notifications (state changes and progress ticks).
    fn events(&self) -> EventStream;

    /// Find a handle by its info hash.
    fn find(&self, info_hash: &InfoHash) -> Option<SharedHandle> {
        self.torrents()
            .borrow()
            .iter()
            .find(|handle| handle.info_hash() == *info_hash)
            .cloned()
    }

    /// Admit a new torrent, returning its identity.
    async fn add_torrent(&self, request: AddTorrent) -> anyhow::Result<InfoHash>;

    /// Remove a torrent, optionally deleting its data.
    async fn remove_torrent(
        &self,
        info_hash: &InfoHash,
        options: RemoveTorrent,
    ) -> anyhow::Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use skiff_events::TorrentState;

    struct StubHandle;

    #[async_trait]
    impl TorrentHandle for StubHandle {
        fn info_hash(&self) -> InfoHash {
            InfoHash::new("00")
        }

        fn snapshot(&self) -> TorrentSnapshot {
            TorrentSnapshot {
                info_hash: self.info_hash(),
                name: "stub".into(),
                state: TorrentState::Paused,
                progress: 0.0,
                total_wanted: 0,
                creation_date: None,
                added_at: Utc::now(),
                download_dir: None,
                is_valid: true,
            }
        }

        fn files(&self) -> Vec<TorrentFile> {
            Vec::new()
        }

        async fn pause(&self) -> anyhow::Result<()> {
            Ok(())
        }

        async fn resume(&self) -> anyhow::Result<()> {
            Ok(())
        }

        async fn rehash(&self) -> anyhow::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn file_priority_defaults_to_unsupported() {
        let handle = StubHandle;
        let err = handle
            .set_file_priority(0, FilePriority::Skip)
            .await
            .expect_err("priority should error");
        assert!(err.to_string().contains("priority"));
        assert!(handle.pause().await.is_ok());
    }
}
