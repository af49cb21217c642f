//! Projection of an engine's flat file list into a directory tree.
//!
//! # Design
//! - The tree is built once; later ticks only touch `raw_files`.
//! - Directory nodes reference files by engine index, so `raw_files` (sorted by
//!   index) is the single owner of per-file state and updates never walk the tree.
//! - Children keep insertion order; lookups by segment name are linear, which is
//!   fine at directory fan-outs seen in practice.

use std::path::PathBuf;

use serde::Serialize;
use skiff_torrent_core::{FilePriority, TorrentFile, payload_path};
use tracing::debug;

/// Leaf of the tree: one payload file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileEntity {
    /// Offset in the engine's flat file list.
    pub index: usize,
    /// Display name.
    pub name: String,
    /// Slash-delimited path relative to the download directory.
    pub path: String,
    /// Size in bytes.
    pub size_bytes: u64,
    /// Completion fraction in `0.0..=1.0`.
    pub progress: f64,
    /// Download priority.
    pub priority: FilePriority,
}

impl FileEntity {
    fn from_record(file: &TorrentFile) -> Self {
        Self {
            index: file.index,
            name: file.name.clone(),
            path: file.path.clone(),
            size_bytes: file.size_bytes,
            progress: file.progress,
            priority: file.priority,
        }
    }

    /// Whether every byte of the file is on disk.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.progress >= 1.0
    }

    /// Absolute location once downloaded into `download_dir`.
    #[must_use]
    pub fn full_path(&self, download_dir: &str) -> PathBuf {
        payload_path(download_dir, &self.path)
    }

    #[allow(clippy::float_cmp)]
    fn update(&mut self, file: &TorrentFile) -> bool {
        let changed = self.progress != file.progress || self.priority != file.priority;
        self.progress = file.progress;
        self.priority = file.priority;
        changed
    }
}

/// Tree node: a file reference or a nested directory.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    /// Engine file index; resolve through [`FileTree::file`].
    File {
        /// Engine file index.
        index: usize,
    },
    /// Nested directory.
    Directory(DirectoryEntity),
}

/// Branch of the tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DirectoryEntity {
    name: String,
    children: Vec<(String, Node)>,
}

impl DirectoryEntity {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            children: Vec::new(),
        }
    }

    /// Directory name; empty for the synthetic root.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Children keyed by path segment, in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[(String, Node)] {
        &self.children
    }

    /// Child stored under `segment`.
    #[must_use]
    pub fn child(&self, segment: &str) -> Option<&Node> {
        self.children
            .iter()
            .find(|(key, _)| key == segment)
            .map(|(_, node)| node)
    }

    /// Number of direct children.
    #[must_use]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Whether the directory has no children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Engine indices of every file below this directory.
    #[must_use]
    pub fn file_indices(&self) -> Vec<usize> {
        let mut indices = Vec::new();
        self.collect_indices(&mut indices);
        indices
    }

    fn collect_indices(&self, into: &mut Vec<usize>) {
        for (_, node) in &self.children {
            match node {
                Node::File { index } => into.push(*index),
                Node::Directory(directory) => directory.collect_indices(into),
            }
        }
    }

    fn put(&mut self, segment: &str, node: Node) {
        match self.children.iter_mut().find(|(key, _)| key == segment) {
            Some((_, Node::Directory(_))) => {}
            Some((_, existing)) => *existing = node,
            None => self.children.push((segment.to_string(), node)),
        }
    }

    fn ensure_directory(&mut self, segment: &str) -> usize {
        if let Some(position) = self.children.iter().position(|(key, _)| key == segment) {
            if matches!(self.children[position].1, Node::File { .. }) {
                self.children[position].1 = Node::Directory(Self::new(segment));
            }
            return position;
        }
        self.children
            .push((segment.to_string(), Node::Directory(Self::new(segment))));
        self.children.len() - 1
    }

    fn insert(&mut self, segments: &[&str], name: &str, index: usize) {
        let Some((head, rest)) = segments.split_first() else {
            return;
        };
        if *head == name || rest.is_empty() {
            self.put(head, Node::File { index });
            return;
        }
        let position = self.ensure_directory(head);
        if let Node::Directory(child) = &mut self.children[position].1 {
            child.insert(rest, name, index);
        }
    }
}

/// Hierarchical view over one torrent's files.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileTree {
    torrent_name: String,
    raw_files: Vec<FileEntity>,
    root: DirectoryEntity,
}

impl FileTree {
    /// Build the tree for `files`, collapsing the root onto a single top-level
    /// directory named like the torrent.
    #[must_use]
    pub fn new(torrent_name: &str, files: &[TorrentFile]) -> Self {
        let mut root = DirectoryEntity::new("");
        let mut raw_files = Vec::with_capacity(files.len());

        for file in files {
            let segments: Vec<&str> = file
                .path
                .split('/')
                .filter(|segment| !segment.is_empty())
                .collect();
            if segments.is_empty() {
                continue;
            }
            root.insert(&segments, &file.name, file.index);
            raw_files.push(FileEntity::from_record(file));
        }

        let mut placed = root.file_indices();
        placed.sort_unstable();
        raw_files.retain(|file| {
            let kept = placed.binary_search(&file.index).is_ok();
            if !kept {
                debug!(
                    index = file.index,
                    path = %file.path,
                    "file path collides with another entry; skipped"
                );
            }
            kept
        });
        raw_files.sort_by_key(|file| file.index);

        Self {
            torrent_name: torrent_name.to_string(),
            raw_files,
            root: collapse_root(root, torrent_name),
        }
    }

    /// Display name of the torrent the tree belongs to.
    #[must_use]
    pub fn torrent_name(&self) -> &str {
        &self.torrent_name
    }

    /// Top of the tree.
    #[must_use]
    pub const fn root(&self) -> &DirectoryEntity {
        &self.root
    }

    /// Every file, ordered by ascending engine index.
    #[must_use]
    pub fn raw_files(&self) -> &[FileEntity] {
        &self.raw_files
    }

    /// File with engine index `index`.
    #[must_use]
    pub fn file(&self, index: usize) -> Option<&FileEntity> {
        self.raw_files
            .binary_search_by_key(&index, |file| file.index)
            .ok()
            .map(|position| &self.raw_files[position])
    }

    /// Directory reached by following `path` segments from the root.
    #[must_use]
    pub fn directory(&self, path: &[String]) -> Option<&DirectoryEntity> {
        path.iter()
            .try_fold(&self.root, |directory, segment| match directory.child(segment)? {
                Node::Directory(child) => Some(child),
                Node::File { .. } => None,
            })
    }

    /// Total bytes below `directory`.
    #[must_use]
    pub fn directory_size(&self, directory: &DirectoryEntity) -> u64 {
        directory
            .file_indices()
            .into_iter()
            .filter_map(|index| self.file(index))
            .map(|file| file.size_bytes)
            .sum()
    }

    /// Size-weighted completion of the files below `directory`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn directory_progress(&self, directory: &DirectoryEntity) -> f64 {
        let (done, total) = directory
            .file_indices()
            .into_iter()
            .filter_map(|index| self.file(index))
            .fold((0.0, 0_u64), |(done, total), file| {
                (
                    file.size_bytes as f64 * file.progress + done,
                    total + file.size_bytes,
                )
            });
        if total == 0 {
            0.0
        } else {
            done / total as f64
        }
    }

    /// Apply a fresh read of the engine's file list. Returns how many entities changed.
    ///
    /// Records are matched by engine index; unknown indices are ignored and the tree
    /// shape is left untouched.
    pub fn apply_progress(&mut self, files: &[TorrentFile]) -> usize {
        let mut changed = 0;
        for file in files {
            let Ok(position) = self
                .raw_files
                .binary_search_by_key(&file.index, |entity| entity.index)
            else {
                continue;
            };
            if self.raw_files[position].update(file) {
                changed += 1;
            }
        }
        changed
    }
}

fn collapse_root(mut root: DirectoryEntity, torrent_name: &str) -> DirectoryEntity {
    let collapsible = matches!(
        root.children.as_slice(),
        [(_, Node::Directory(only))] if only.name == torrent_name
    );
    if collapsible {
        if let Some((_, Node::Directory(only))) = root.children.pop() {
            return only;
        }
    }
    root
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn record(index: usize, path: &str, size_bytes: u64) -> TorrentFile {
        TorrentFile {
            index,
            path: path.to_string(),
            name: path.rsplit('/').next().unwrap_or_default().to_string(),
            size_bytes,
            progress: 0.0,
            priority: FilePriority::Normal,
        }
    }

    fn names(directory: &DirectoryEntity) -> Vec<&str> {
        directory.entries().iter().map(|(key, _)| key.as_str()).collect()
    }

    #[test]
    fn single_directory_named_like_torrent_becomes_root() {
        let tree = FileTree::new(
            "Album",
            &[record(0, "Album/01.flac", 10), record(1, "Album/02.flac", 10)],
        );
        assert_eq!(tree.root().name(), "Album");
        assert_eq!(names(tree.root()), vec!["01.flac", "02.flac"]);
    }

    #[test]
    fn differently_named_directory_keeps_synthetic_root() {
        let tree = FileTree::new("Album (2024)", &[record(0, "Album/01.flac", 10)]);
        assert_eq!(tree.root().name(), "");
        assert_eq!(names(tree.root()), vec!["Album"]);
    }

    #[test]
    fn single_file_torrent_keeps_synthetic_root() {
        let tree = FileTree::new("movie.mkv", &[record(0, "movie.mkv", 10)]);
        assert_eq!(tree.root().name(), "");
        assert!(matches!(
            tree.root().child("movie.mkv"),
            Some(Node::File { index: 0 })
        ));
    }

    #[test]
    fn children_keep_insertion_order() {
        let tree = FileTree::new(
            "t",
            &[
                record(0, "z.txt", 1),
                record(1, "dir/a.txt", 1),
                record(2, "b.txt", 1),
            ],
        );
        assert_eq!(names(tree.root()), vec!["z.txt", "dir", "b.txt"]);
    }

    #[test]
    fn raw_files_sorted_by_engine_index() {
        let tree = FileTree::new(
            "t",
            &[
                record(2, "deep/er/c.bin", 1),
                record(0, "a.bin", 1),
                record(1, "deep/b.bin", 1),
            ],
        );
        let indices: Vec<_> = tree.raw_files().iter().map(|file| file.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn empty_paths_are_skipped() {
        let tree = FileTree::new("t", &[record(0, "", 1), record(1, "//", 1), record(2, "x", 1)]);
        assert_eq!(tree.raw_files().len(), 1);
        assert_eq!(tree.root().len(), 1);
    }

    #[test]
    fn file_is_placed_at_segment_matching_its_name() {
        let mut file = record(0, "pack/readme/extra", 1);
        file.name = "readme".into();
        let tree = FileTree::new("t", &[file]);
        let Some(Node::Directory(pack)) = tree.root().child("pack") else {
            panic!("pack directory missing");
        };
        assert!(matches!(pack.child("readme"), Some(Node::File { index: 0 })));
    }

    #[test]
    fn directory_lookup_and_aggregates() {
        let mut tree = FileTree::new(
            "t",
            &[record(0, "d/a", 30), record(1, "d/e/b", 10), record(2, "c", 5)],
        );
        let mut done = record(0, "d/a", 30);
        done.progress = 1.0;
        assert_eq!(tree.apply_progress(&[done]), 1);

        let d = tree.directory(&["d".to_string()]).expect("d exists");
        assert_eq!(tree.directory_size(d), 40);
        assert!((tree.directory_progress(d) - 0.75).abs() < 1e-9);
        assert!(tree.directory(&["c".to_string()]).is_none());
        assert!(tree.directory(&["missing".to_string()]).is_none());
        assert_eq!(d.file_indices(), vec![0, 1]);
    }

    #[test]
    fn later_file_does_not_replace_an_existing_directory() {
        let tree = FileTree::new("t", &[record(0, "a/b", 1), record(1, "a", 1)]);
        let Some(Node::Directory(a)) = tree.root().child("a") else {
            panic!("directory a replaced");
        };
        assert!(matches!(a.child("b"), Some(Node::File { index: 0 })));
        assert!(tree.file(1).is_none());
        assert_eq!(tree.raw_files().len(), 1);
    }

    #[test]
    fn file_in_directory_position_becomes_a_directory() {
        let tree = FileTree::new("t", &[record(0, "a", 1), record(1, "a/b", 1)]);
        assert!(matches!(tree.root().child("a"), Some(Node::Directory(_))));
        let indices: Vec<_> = tree.raw_files().iter().map(|file| file.index).collect();
        assert_eq!(indices, vec![1]);
    }

    #[test]
    fn out_of_range_updates_are_ignored() {
        let mut tree = FileTree::new("t", &[record(0, "a", 1)]);
        let mut stray = record(9, "a", 1);
        stray.progress = 1.0;
        assert_eq!(tree.apply_progress(&[stray]), 0);
        assert!(tree.file(9).is_none());
    }

    /// Directory segments (`d0`..`d2`) per file, paired with a shuffled engine index.
    fn arb_layout() -> impl Strategy<Value = Vec<(Vec<usize>, usize)>> {
        prop::collection::vec(prop::collection::vec(0_usize..3, 0..3), 1..12)
            .prop_flat_map(|dirs| {
                let indices: Vec<usize> = (0..dirs.len()).collect();
                (Just(dirs), Just(indices).prop_shuffle())
            })
            .prop_map(|(dirs, indices)| dirs.into_iter().zip(indices).collect())
    }

    fn layout_records(layout: &[(Vec<usize>, usize)]) -> Vec<TorrentFile> {
        layout
            .iter()
            .map(|(dirs, index)| {
                let mut segments: Vec<String> = dirs.iter().map(|dir| format!("d{dir}")).collect();
                segments.push(format!("f{index}.bin"));
                record(*index, &segments.join("/"), 1)
            })
            .collect()
    }

    proptest! {
        #[test]
        fn raw_files_follow_engine_index_order(layout in arb_layout()) {
            let tree = FileTree::new("t", &layout_records(&layout));
            let indices: Vec<usize> = tree.raw_files().iter().map(|file| file.index).collect();
            let expected: Vec<usize> = (0..layout.len()).collect();
            prop_assert_eq!(indices, expected);
        }

        #[test]
        fn root_collapses_only_onto_a_lone_directory_named_like_the_torrent(
            layout in arb_layout(),
        ) {
            let tree = FileTree::new("d0", &layout_records(&layout));
            let lone_match = layout.iter().all(|(dirs, _)| dirs.first() == Some(&0));
            if lone_match {
                prop_assert_eq!(tree.root().name(), "d0");
            } else {
                prop_assert_eq!(tree.root().name(), "");
            }
            let total = u64::try_from(layout.len()).expect("small layout");
            prop_assert_eq!(tree.directory_size(tree.root()), total);
        }

        #[test]
        fn tick_updates_exactly_one_entity(
            layout in arb_layout(),
            pick in any::<prop::sample::Index>(),
            progress in 0.01_f64..=1.0,
        ) {
            let records = layout_records(&layout);
            let mut tree = FileTree::new("t", &records);
            let target = pick.index(layout.len());
            let mut tick = records
                .iter()
                .find(|record| record.index == target)
                .cloned()
                .expect("target recorded");
            tick.progress = progress;

            prop_assert_eq!(tree.apply_progress(&[tick]), 1);
            for file in tree.raw_files() {
                if file.index == target {
                    prop_assert!((file.progress - progress).abs() < f64::EPSILON);
                } else {
                    prop_assert!(file.progress.abs() < f64::EPSILON);
                }
            }
        }
    }
}
