//! Switch rows bound to boolean preferences.

use std::hash::{Hash, Hasher};
use std::sync::Arc;

use skiff_config::{PreferencesStore, Toggle};

/// Titled switch with a two-way binding to one [`Toggle`].
///
/// Rows compare and hash by title only, so list diffing keeps a row stable while
/// its value flips.
#[derive(Clone)]
pub struct SwitchRow {
    title: String,
    toggle: Toggle,
    store: Arc<PreferencesStore>,
}

impl SwitchRow {
    /// Row for `toggle` using its default title.
    #[must_use]
    pub fn new(toggle: Toggle, store: Arc<PreferencesStore>) -> Self {
        Self::with_title(toggle.title(), toggle, store)
    }

    /// Row for `toggle` with a custom title.
    #[must_use]
    pub fn with_title(
        title: impl Into<String>,
        toggle: Toggle,
        store: Arc<PreferencesStore>,
    ) -> Self {
        Self {
            title: title.into(),
            toggle,
            store,
        }
    }

    /// Row title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Bound preference.
    #[must_use]
    pub const fn toggle(&self) -> Toggle {
        self.toggle
    }

    /// Current switch position.
    #[must_use]
    pub fn value(&self) -> bool {
        self.store.subscribe().borrow().toggle(self.toggle)
    }

    /// Write the switch position back to the store.
    pub fn set_value(&self, value: bool) {
        self.store.set_toggle(self.toggle, value);
    }
}

impl PartialEq for SwitchRow {
    fn eq(&self, other: &Self) -> bool {
        self.title == other.title
    }
}

impl Eq for SwitchRow {}

impl Hash for SwitchRow {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.title.hash(state);
    }
}

impl std::fmt::Debug for SwitchRow {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("SwitchRow")
            .field("title", &self.title)
            .field("toggle", &self.toggle)
            .finish_non_exhaustive()
    }
}

/// One row per toggle, in display order.
#[must_use]
pub fn switch_rows(store: &Arc<PreferencesStore>) -> Vec<SwitchRow> {
    Toggle::ALL
        .into_iter()
        .map(|toggle| SwitchRow::new(toggle, Arc::clone(store)))
        .collect()
}
