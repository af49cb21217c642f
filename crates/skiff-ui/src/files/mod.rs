//! File browser: tree projection, live progress binding, and the browser screen.

pub mod binding;
pub mod tree;
pub mod view_model;

pub use binding::FileTreeBinding;
pub use tree::{DirectoryEntity, FileEntity, FileTree, Node};
pub use view_model::{FileBrowserViewModel, FileRow, derive_directory};
