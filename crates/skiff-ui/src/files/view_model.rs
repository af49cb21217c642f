//! File browser screen for one torrent.

use std::sync::Arc;

use serde::Serialize;
use skiff_events::EventStream;
use skiff_torrent_core::{FilePriority, SharedHandle};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::files::binding::FileTreeBinding;
use crate::files::tree::{FileEntity, FileTree, Node};
use crate::navigation::{Navigator, Route};
use crate::reactive::{DisposeBag, changed_or_pending};
use crate::section::SectionModel;

/// Identifier of the single section the browser publishes.
pub const FILES_SECTION_ID: &str = "files";

/// Row of the file browser.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FileRow {
    /// Nested directory with aggregate figures.
    Directory {
        /// Directory name.
        name: String,
        /// Bytes below the directory.
        size_bytes: u64,
        /// Size-weighted completion.
        progress: f64,
    },
    /// Payload file.
    File(FileEntity),
}

/// Sections and title for the directory at `path`; an unknown path shows the root.
#[must_use]
pub fn derive_directory(tree: &FileTree, path: &[String]) -> (Vec<SectionModel<FileRow>>, String) {
    let (directory, title) = match tree.directory(path) {
        Some(directory) if !path.is_empty() => (directory, directory.name().to_string()),
        _ => (tree.root(), tree.torrent_name().to_string()),
    };

    let rows = directory
        .entries()
        .iter()
        .filter_map(|(segment, node)| match node {
            Node::File { index } => tree.file(*index).cloned().map(FileRow::File),
            Node::Directory(child) => Some(FileRow::Directory {
                name: segment.clone(),
                size_bytes: tree.directory_size(child),
                progress: tree.directory_progress(child),
            }),
        })
        .collect();

    (vec![SectionModel::plain(FILES_SECTION_ID, rows)], title)
}

/// Browser over one torrent's file tree.
pub struct FileBrowserViewModel {
    handle: SharedHandle,
    navigator: Arc<dyn Navigator>,
    tree: watch::Receiver<FileTree>,
    path: watch::Sender<Vec<String>>,
    sections: watch::Receiver<Vec<SectionModel<FileRow>>>,
    title: watch::Receiver<String>,
    _binding: FileTreeBinding,
    _bag: DisposeBag,
}

impl FileBrowserViewModel {
    /// Open the browser at the tree root.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    #[must_use]
    pub fn new(handle: SharedHandle, events: EventStream, navigator: Arc<dyn Navigator>) -> Self {
        let binding = FileTreeBinding::new(Arc::clone(&handle), events);
        let tree_view = binding.tree();
        let mut tree = binding.tree();
        let (path, mut path_rx) = watch::channel(Vec::<String>::new());

        let (initial_sections, initial_title) = derive_directory(&tree.borrow_and_update(), &[]);
        let (sections_tx, sections) = watch::channel(initial_sections);
        let (title_tx, title) = watch::channel(initial_title);

        let mut bag = DisposeBag::new();
        bag.spawn(async move {
            loop {
                tokio::select! {
                    () = changed_or_pending(&mut tree) => {}
                    () = changed_or_pending(&mut path_rx) => {}
                }
                let (sections, title) = {
                    let current = path_rx.borrow_and_update().clone();
                    derive_directory(&tree.borrow_and_update(), &current)
                };
                sections_tx.send_replace(sections);
                title_tx.send_if_modified(|existing| {
                    if *existing == title {
                        return false;
                    }
                    *existing = title;
                    true
                });
            }
        });

        Self {
            handle,
            navigator,
            tree: tree_view,
            path,
            sections,
            title,
            _binding: binding,
            _bag: bag,
        }
    }

    /// Observe the rows of the current directory.
    #[must_use]
    pub fn sections(&self) -> watch::Receiver<Vec<SectionModel<FileRow>>> {
        self.sections.clone()
    }

    /// Observe the screen title.
    #[must_use]
    pub fn title(&self) -> watch::Receiver<String> {
        self.title.clone()
    }

    /// Segments from the root to the current directory.
    #[must_use]
    pub fn current_path(&self) -> Vec<String> {
        self.path.borrow().clone()
    }

    /// React to a tap on `row` of the current directory.
    ///
    /// Directories are entered, complete files are previewed, and incomplete files
    /// flip between skipped and normal priority. The row is resolved against the
    /// current tree and path, so taps issued before the screen republishes still land
    /// in the directory they were made in.
    pub async fn select_row(&self, row: usize) {
        let selected = {
            let path = self.path.borrow().clone();
            let (sections, _) = derive_directory(&self.tree.borrow(), &path);
            sections
                .into_iter()
                .next()
                .and_then(|section| section.rows.into_iter().nth(row))
        };

        match selected {
            None => debug!(row, "selected row no longer exists"),
            Some(FileRow::Directory { name, .. }) => {
                self.path.send_modify(|path| path.push(name));
            }
            Some(FileRow::File(file)) if file.is_complete() => {
                let download_dir = self.handle.snapshot().download_dir.unwrap_or_default();
                self.navigator.navigate(Route::FilePreview {
                    path: file.full_path(&download_dir),
                });
            }
            Some(FileRow::File(file)) => {
                let current = self
                    .handle
                    .files()
                    .into_iter()
                    .find(|record| record.index == file.index)
                    .map_or(file.priority, |record| record.priority);
                let priority = if current.is_wanted() {
                    FilePriority::Skip
                } else {
                    FilePriority::Normal
                };
                self.set_file_priority(file.index, priority).await;
            }
        }
    }

    /// Leave the current directory. Returns `false` at the root.
    pub fn go_up(&self) -> bool {
        self.path.send_if_modified(|path| path.pop().is_some())
    }

    /// Forward a priority change for engine file `index`.
    pub async fn set_file_priority(&self, index: usize, priority: FilePriority) {
        if let Err(err) = self.handle.set_file_priority(index, priority).await {
            warn!(
                info_hash = %self.handle.info_hash(),
                index,
                error = %err,
                "file priority update failed"
            );
        }
    }
}
