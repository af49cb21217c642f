//! Preference document shared by every screen.

use serde::{Deserialize, Serialize};
use skiff_events::TorrentState;

/// Sort key for the torrent list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortType {
    /// Case-insensitive name, ascending.
    #[default]
    Alphabetically,
    /// Metainfo creation date, newest first.
    CreationDate,
    /// Admission date, newest first.
    AddedDate,
    /// Total wanted bytes, largest first.
    Size,
}

impl SortType {
    /// Every sort key in menu order.
    pub const ALL: [Self; 4] = [
        Self::Alphabetically,
        Self::CreationDate,
        Self::AddedDate,
        Self::Size,
    ];
}

/// Boolean preferences exposed as switch rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Toggle {
    /// Keep transfers running while the app is in the background.
    BackgroundDownload,
    /// Store payloads in the shared files folder.
    UseSharedFolder,
    /// Notify when a download finishes.
    NotifyOnFinish,
    /// Keep seeding after every file completes.
    SeedAfterFinish,
}

impl Toggle {
    /// Every toggle in display order.
    pub const ALL: [Self; 4] = [
        Self::BackgroundDownload,
        Self::UseSharedFolder,
        Self::NotifyOnFinish,
        Self::SeedAfterFinish,
    ];

    /// Row title shown next to the switch.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::BackgroundDownload => "Download in background",
            Self::UseSharedFolder => "Store in shared folder",
            Self::NotifyOnFinish => "Notify when finished",
            Self::SeedAfterFinish => "Seed after finishing",
        }
    }
}

/// Full preference document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Preferences {
    /// Torrent list sort key.
    #[serde(default)]
    pub sort_type: SortType,
    /// Flip the sort direction.
    #[serde(default)]
    pub sort_reversed: bool,
    /// Group the torrent list into one section per state.
    #[serde(default)]
    pub grouped_by_state: bool,
    /// Section order used when grouping; must list every state once.
    #[serde(default = "default_group_order")]
    pub group_order: Vec<TorrentState>,
    /// See [`Toggle::BackgroundDownload`].
    #[serde(default = "enabled")]
    pub background_download: bool,
    /// See [`Toggle::UseSharedFolder`].
    #[serde(default)]
    pub use_shared_folder: bool,
    /// See [`Toggle::NotifyOnFinish`].
    #[serde(default = "enabled")]
    pub notify_on_finish: bool,
    /// See [`Toggle::SeedAfterFinish`].
    #[serde(default = "enabled")]
    pub seed_after_finish: bool,
}

fn default_group_order() -> Vec<TorrentState> {
    TorrentState::ALL.to_vec()
}

const fn enabled() -> bool {
    true
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            sort_type: SortType::default(),
            sort_reversed: false,
            grouped_by_state: false,
            group_order: default_group_order(),
            background_download: true,
            use_shared_folder: false,
            notify_on_finish: true,
            seed_after_finish: true,
        }
    }
}

impl Preferences {
    /// Read a toggle.
    #[must_use]
    pub const fn toggle(&self, toggle: Toggle) -> bool {
        match toggle {
            Toggle::BackgroundDownload => self.background_download,
            Toggle::UseSharedFolder => self.use_shared_folder,
            Toggle::NotifyOnFinish => self.notify_on_finish,
            Toggle::SeedAfterFinish => self.seed_after_finish,
        }
    }

    /// Write a toggle, returning whether the value changed.
    pub fn set_toggle(&mut self, toggle: Toggle, value: bool) -> bool {
        let slot = match toggle {
            Toggle::BackgroundDownload => &mut self.background_download,
            Toggle::UseSharedFolder => &mut self.use_shared_folder,
            Toggle::NotifyOnFinish => &mut self.notify_on_finish,
            Toggle::SeedAfterFinish => &mut self.seed_after_finish,
        };
        let changed = *slot != value;
        *slot = value;
        changed
    }
}
