//! Observable preference store with optional JSON persistence.
//!
//! # Design
//! - The whole document lives in a `watch` channel; setters publish only on real change.
//! - Persistence writes a sibling temp file and renames it over the target.

use std::fs;
use std::path::{Path, PathBuf};

use skiff_events::TorrentState;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::error::{ConfigError, ConfigResult};
use crate::model::{Preferences, SortType, Toggle};
use crate::validate::{validate_group_order, validate_preferences};

/// Observable preference document.
pub struct PreferencesStore {
    sender: watch::Sender<Preferences>,
    path: Option<PathBuf>,
}

impl PreferencesStore {
    /// Store holding `preferences` without a backing file.
    #[must_use]
    pub fn new(preferences: Preferences) -> Self {
        let (sender, _) = watch::channel(preferences);
        Self { sender, path: None }
    }

    /// Load the document at `path`, falling back to defaults when the file is absent.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read, parsed, or fails validation.
    pub fn load(path: impl Into<PathBuf>) -> ConfigResult<Self> {
        let path = path.into();
        let preferences = if path.exists() {
            let raw = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
                operation: "preferences.read",
                path: path.clone(),
                source,
            })?;
            let preferences: Preferences =
                serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
                    path: path.clone(),
                    source,
                })?;
            validate_preferences(&preferences)?;
            info!(path = %path.display(), "preferences loaded");
            preferences
        } else {
            debug!(path = %path.display(), "preferences file absent; using defaults");
            Preferences::default()
        };

        let (sender, _) = watch::channel(preferences);
        Ok(Self {
            sender,
            path: Some(path),
        })
    }

    /// Backing file, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Observe the document.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Preferences> {
        self.sender.subscribe()
    }

    /// Current document.
    #[must_use]
    pub fn current(&self) -> Preferences {
        self.sender.borrow().clone()
    }

    /// Set the torrent list sort key.
    pub fn set_sort_type(&self, sort_type: SortType) {
        self.update(|prefs| replace(&mut prefs.sort_type, sort_type));
    }

    /// Set the sort direction flag.
    pub fn set_sort_reversed(&self, reversed: bool) {
        self.update(|prefs| replace(&mut prefs.sort_reversed, reversed));
    }

    /// Enable or disable grouping by state.
    pub fn set_grouped_by_state(&self, grouped: bool) {
        self.update(|prefs| replace(&mut prefs.grouped_by_state, grouped));
    }

    /// Replace the section order used when grouping.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidField`] when `order` is not a permutation of every state.
    pub fn set_group_order(&self, order: Vec<TorrentState>) -> ConfigResult<()> {
        validate_group_order(&order)?;
        self.update(|prefs| replace(&mut prefs.group_order, order));
        Ok(())
    }

    /// Write a boolean preference.
    pub fn set_toggle(&self, toggle: Toggle, value: bool) {
        self.update(|prefs| prefs.set_toggle(toggle, value));
    }

    fn update(&self, apply: impl FnOnce(&mut Preferences) -> bool) {
        let changed = self.sender.send_if_modified(apply);
        if changed {
            debug!("preferences updated");
        }
    }

    /// Persist the document to the backing file. No-op for in-memory stores.
    ///
    /// # Errors
    ///
    /// Returns an error when serialisation or any filesystem step fails.
    pub fn save(&self) -> ConfigResult<()> {
        let Some(path) = self.path.as_deref() else {
            return Ok(());
        };
        let body = serde_json::to_vec_pretty(&*self.sender.borrow())
            .map_err(|source| ConfigError::Serialize { source })?;

        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                operation: "preferences.create_dir",
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let staging = path.with_extension("json.tmp");
        fs::write(&staging, body).map_err(|source| ConfigError::Io {
            operation: "preferences.write",
            path: staging.clone(),
            source,
        })?;
        fs::rename(&staging, path).map_err(|source| ConfigError::Io {
            operation: "preferences.rename",
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "preferences saved");
        Ok(())
    }
}

impl Default for PreferencesStore {
    fn default() -> Self {
        Self::new(Preferences::default())
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}
