//! Torrent list screen.
//!
//! # Design
//! - Inputs: engine handle set, engine events, search query, and the preference
//!   document.
//! - Every input change except a progress tick re-runs [`derive_sections`] over fresh
//!   snapshots on the view-model task; the result is published only when it differs.
//! - A progress tick patches the matching row's progress in place. Row order and
//!   grouping stay as they were.
//! - Intents resolve index paths against the latest published sections, then look
//!   the handles up again so stale rows are silently skipped.

use std::sync::Arc;

use skiff_config::{Preferences, PreferencesStore};
use skiff_events::{Event, EventStream, InfoHash};
use skiff_torrent_core::{RemoveTorrent, SharedHandle, TorrentService, TorrentSnapshot};
use tokio::sync::watch;
use tracing::{debug, info, warn};
use url::Url;

use crate::dialog::Dialogs;
use crate::navigation::{Navigator, Route};
use crate::reactive::{DisposeBag, changed_or_pending};
use crate::section::{IndexPath, SectionModel, rows_at};
use crate::torrents::actions::{rehash_alert, rehash_confirmed, removal_alert, removal_choice};
use crate::torrents::sections::derive_sections;

/// Title of the torrent list screen.
pub const LIST_TITLE: &str = "Skiff";

type Sections = Vec<SectionModel<TorrentSnapshot>>;

/// Filterable, sortable, optionally grouped list of every torrent.
pub struct TorrentListViewModel {
    service: Arc<dyn TorrentService>,
    navigator: Arc<dyn Navigator>,
    dialogs: Arc<dyn Dialogs>,
    query: watch::Sender<String>,
    sections: watch::Receiver<Sections>,
    _bag: DisposeBag,
}

impl TorrentListViewModel {
    /// Build the list and start following its inputs.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    #[must_use]
    pub fn new(
        service: Arc<dyn TorrentService>,
        preferences: &PreferencesStore,
        navigator: Arc<dyn Navigator>,
        dialogs: Arc<dyn Dialogs>,
    ) -> Self {
        let mut torrents = service.torrents();
        let mut prefs = preferences.subscribe();
        let mut events = service.events();
        let (query, mut query_rx) = watch::channel(String::new());

        let (sections_tx, sections) =
            watch::channel(derive(&mut torrents, &mut prefs, &mut query_rx));

        let mut bag = DisposeBag::new();
        bag.spawn(async move {
            loop {
                let update = tokio::select! {
                    () = changed_or_pending(&mut torrents) => ListUpdate::Rederive,
                    () = changed_or_pending(&mut prefs) => ListUpdate::Rederive,
                    () = changed_or_pending(&mut query_rx) => ListUpdate::Rederive,
                    update = next_list_update(&mut events) => update,
                };
                match update {
                    ListUpdate::Rederive => {
                        let next = derive(&mut torrents, &mut prefs, &mut query_rx);
                        sections_tx.send_if_modified(|current| {
                            if *current == next {
                                return false;
                            }
                            *current = next;
                            true
                        });
                    }
                    ListUpdate::Progress {
                        info_hash,
                        progress,
                    } => {
                        sections_tx.send_if_modified(|current| {
                            patch_progress(current, &info_hash, progress)
                        });
                    }
                }
            }
        });

        Self {
            service,
            navigator,
            dialogs,
            query,
            sections,
            _bag: bag,
        }
    }

    /// Screen title.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        LIST_TITLE
    }

    /// Observe the published sections.
    #[must_use]
    pub fn sections(&self) -> watch::Receiver<Sections> {
        self.sections.clone()
    }

    /// Replace the search query.
    pub fn set_search_query(&self, query: impl Into<String>) {
        let query = query.into();
        self.query.send_if_modified(|current| {
            if *current == query {
                return false;
            }
            *current = query;
            true
        });
    }

    /// Open the preferences screen.
    pub fn open_preferences(&self) {
        self.navigator.navigate(Route::Preferences);
    }

    /// Open the RSS feed list.
    pub fn open_rss(&self) {
        self.navigator.navigate(Route::Rss);
    }

    /// Start the add-torrent flow for `url`.
    pub fn add_torrent(&self, url: Url) {
        self.navigator.navigate(Route::AddTorrent { url });
    }

    /// Resume every selected torrent.
    pub async fn resume_selected(&self, paths: &[IndexPath]) {
        for handle in self.handles_at(paths) {
            if let Err(err) = handle.resume().await {
                warn!(info_hash = %handle.info_hash(), error = %err, "resume failed");
            }
        }
    }

    /// Pause every selected torrent.
    pub async fn pause_selected(&self, paths: &[IndexPath]) {
        for handle in self.handles_at(paths) {
            if let Err(err) = handle.pause().await {
                warn!(info_hash = %handle.info_hash(), error = %err, "pause failed");
            }
        }
    }

    /// Recheck every selected torrent after confirmation.
    pub async fn rehash_selected(&self, paths: &[IndexPath]) {
        let handles = self.handles_at(paths);
        if handles.is_empty() {
            return;
        }
        if !rehash_confirmed(self.dialogs.alert(rehash_alert()).await) {
            debug!("rehash cancelled");
            return;
        }
        for handle in handles {
            if let Err(err) = handle.rehash().await {
                warn!(info_hash = %handle.info_hash(), error = %err, "rehash failed");
            }
        }
    }

    /// Remove every selected torrent after confirmation.
    pub async fn delete_selected(&self, paths: &[IndexPath]) {
        self.confirm_and_remove(self.handles_at(paths)).await;
    }

    /// Remove one torrent after confirmation. Unknown hashes are ignored.
    pub async fn remove_torrent(&self, info_hash: &InfoHash) {
        let Some(handle) = self.service.find(info_hash) else {
            debug!(info_hash = %info_hash, "remove requested for unknown torrent");
            return;
        };
        self.confirm_and_remove(vec![handle]).await;
    }

    async fn confirm_and_remove(&self, handles: Vec<SharedHandle>) {
        if handles.is_empty() {
            return;
        }
        let names: Vec<String> = handles.iter().map(|handle| handle.snapshot().name).collect();
        let answer = self.dialogs.alert(removal_alert(&names)).await;
        let Some(options) = removal_choice(answer) else {
            debug!("removal cancelled");
            return;
        };
        for handle in handles {
            self.remove_one(&handle.info_hash(), options).await;
        }
    }

    async fn remove_one(&self, info_hash: &InfoHash, options: RemoveTorrent) {
        match self.service.remove_torrent(info_hash, options).await {
            Ok(()) => info!(
                info_hash = %info_hash,
                with_data = options.with_data,
                "torrent removal requested"
            ),
            Err(err) => warn!(info_hash = %info_hash, error = %err, "torrent removal failed"),
        }
    }

    fn handles_at(&self, paths: &[IndexPath]) -> Vec<SharedHandle> {
        let hashes: Vec<InfoHash> = {
            let sections = self.sections.borrow();
            rows_at(&sections, paths)
                .into_iter()
                .map(|row| row.info_hash.clone())
                .collect()
        };
        hashes
            .iter()
            .filter_map(|info_hash| self.service.find(info_hash))
            .collect()
    }
}

fn derive(
    torrents: &mut watch::Receiver<Vec<SharedHandle>>,
    prefs: &mut watch::Receiver<Preferences>,
    query: &mut watch::Receiver<String>,
) -> Sections {
    let snapshots: Vec<TorrentSnapshot> = torrents
        .borrow_and_update()
        .iter()
        .map(|handle| handle.snapshot())
        .collect();
    let preferences = prefs.borrow_and_update().clone();
    let query = query.borrow_and_update().clone();
    derive_sections(snapshots, &query, &preferences)
}

enum ListUpdate {
    Rederive,
    Progress { info_hash: InfoHash, progress: f64 },
}

async fn next_list_update(events: &mut EventStream) -> ListUpdate {
    loop {
        match events.next().await {
            Some(envelope) => match envelope.event {
                Event::Progress {
                    info_hash,
                    progress,
                } => {
                    return ListUpdate::Progress {
                        info_hash,
                        progress,
                    };
                }
                event if event.affects_sections() => return ListUpdate::Rederive,
                _ => {}
            },
            None => std::future::pending::<()>().await,
        }
    }
}

/// Set `progress` on every row of `info_hash`. Returns whether any row changed.
#[allow(clippy::float_cmp)]
fn patch_progress(sections: &mut Sections, info_hash: &InfoHash, progress: f64) -> bool {
    let mut changed = false;
    for row in sections
        .iter_mut()
        .flat_map(|section| section.rows.iter_mut())
        .filter(|row| row.info_hash == *info_hash)
    {
        if row.progress != progress {
            row.progress = progress;
            changed = true;
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use skiff_events::TorrentState;

    fn row(hash: &str, progress: f64) -> TorrentSnapshot {
        TorrentSnapshot {
            info_hash: InfoHash::new(hash),
            name: hash.to_string(),
            state: TorrentState::Downloading,
            progress,
            total_wanted: 10,
            creation_date: None,
            added_at: Utc::now(),
            download_dir: None,
            is_valid: true,
        }
    }

    #[test]
    fn progress_patch_touches_only_the_matching_row() {
        let mut sections = vec![
            SectionModel::plain("a", vec![row("01", 0.0), row("02", 0.0)]),
            SectionModel::plain("b", vec![row("03", 0.2)]),
        ];

        assert!(patch_progress(&mut sections, &InfoHash::new("02"), 0.75));
        assert!((sections[0].rows[1].progress - 0.75).abs() < f64::EPSILON);
        assert!(sections[0].rows[0].progress.abs() < f64::EPSILON);
        assert!((sections[1].rows[0].progress - 0.2).abs() < f64::EPSILON);

        assert!(!patch_progress(&mut sections, &InfoHash::new("02"), 0.75));
        assert!(!patch_progress(&mut sections, &InfoHash::new("ff"), 1.0));
    }
}
