//! Keeps a [`FileTree`] in step with engine progress notifications.

use skiff_events::{Event, EventStream};
use skiff_torrent_core::SharedHandle;
use tokio::sync::watch;
use tracing::debug;

use crate::files::tree::FileTree;
use crate::reactive::DisposeBag;

/// Owns a tree for one torrent and refreshes it on every progress tick.
///
/// The refresh task is aborted when the binding is dropped.
pub struct FileTreeBinding {
    tree: watch::Receiver<FileTree>,
    _bag: DisposeBag,
}

impl FileTreeBinding {
    /// Build the tree from `handle` and follow `events` for that torrent.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    #[must_use]
    pub fn new(handle: SharedHandle, mut events: EventStream) -> Self {
        let snapshot = handle.snapshot();
        let (sender, tree) = watch::channel(FileTree::new(&snapshot.name, &handle.files()));
        let info_hash = snapshot.info_hash;

        let mut bag = DisposeBag::new();
        bag.spawn(async move {
            while let Some(envelope) = events.next().await {
                if *envelope.event.info_hash() != info_hash {
                    continue;
                }
                match envelope.event {
                    Event::Progress { .. } | Event::StateChanged { .. } => {
                        let files = handle.files();
                        sender.send_if_modified(|tree| tree.apply_progress(&files) > 0);
                    }
                    Event::TorrentRemoved { .. } => {
                        debug!(info_hash = %info_hash, "torrent removed; file binding stopped");
                        break;
                    }
                    Event::TorrentAdded { .. } | Event::MetadataUpdated { .. } => {}
                }
            }
        });

        Self { tree, _bag: bag }
    }

    /// Observe the tree.
    #[must_use]
    pub fn tree(&self) -> watch::Receiver<FileTree> {
        self.tree.clone()
    }
}
