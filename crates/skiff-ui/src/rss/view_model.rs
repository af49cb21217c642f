//! RSS feed list screen.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::dialog::{ActionStyle, Alert, AlertAction, Dialogs, TextPrompt};
use crate::navigation::{Navigator, Route};
use crate::reactive::{DisposeBag, changed_or_pending};
use crate::rss::provider::{FeedProvider, RssFeed};
use crate::section::{IndexPath, SectionModel, rows_at};

/// Identifier of the single section the feed list publishes.
pub const RSS_SECTION_ID: &str = "rss";

const REMOVE: usize = 1;

type Sections = Vec<SectionModel<RssFeed>>;

/// List of subscribed feeds with multi-selection.
pub struct RssListViewModel {
    provider: Arc<dyn FeedProvider>,
    navigator: Arc<dyn Navigator>,
    dialogs: Arc<dyn Dialogs>,
    selection: watch::Sender<Vec<IndexPath>>,
    sections: watch::Receiver<Sections>,
    remove_available: watch::Receiver<bool>,
    _bag: DisposeBag,
}

impl RssListViewModel {
    /// Build the list and request a refresh of every feed.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    #[must_use]
    pub fn new(
        provider: Arc<dyn FeedProvider>,
        navigator: Arc<dyn Navigator>,
        dialogs: Arc<dyn Dialogs>,
    ) -> Self {
        let mut feeds = provider.feeds();
        let (selection, mut selection_rx) = watch::channel(Vec::<IndexPath>::new());
        let initial = sections_for(feeds.borrow_and_update().clone());
        let (sections_tx, sections) = watch::channel(initial);
        let (remove_tx, remove_available) = watch::channel(false);

        let mut bag = DisposeBag::new();
        let fetcher = Arc::clone(&provider);
        bag.spawn(async move {
            if let Err(err) = fetcher.fetch_updates().await {
                warn!(error = %err, "feed refresh failed");
            }
        });
        bag.spawn(async move {
            loop {
                tokio::select! {
                    () = changed_or_pending(&mut feeds) => {
                        let next = sections_for(feeds.borrow_and_update().clone());
                        sections_tx.send_replace(next);
                    }
                    () = changed_or_pending(&mut selection_rx) => {
                        let available = !selection_rx.borrow_and_update().is_empty();
                        remove_tx.send_if_modified(|current| {
                            let changed = *current != available;
                            *current = available;
                            changed
                        });
                    }
                }
            }
        });

        Self {
            provider,
            navigator,
            dialogs,
            selection,
            sections,
            remove_available,
            _bag: bag,
        }
    }

    /// Observe the feed rows.
    #[must_use]
    pub fn sections(&self) -> watch::Receiver<Sections> {
        self.sections.clone()
    }

    /// Observe whether the remove action is enabled.
    #[must_use]
    pub fn is_remove_available(&self) -> watch::Receiver<bool> {
        self.remove_available.clone()
    }

    /// Replace the selected rows.
    pub fn set_selection(&self, paths: Vec<IndexPath>) {
        self.selection.send_replace(paths);
    }

    /// Prompt for a feed address and subscribe to it.
    pub async fn add_feed(&self) {
        let prompt = TextPrompt {
            title: "Add RSS feed".to_string(),
            placeholder: "https://".to_string(),
            accept: "Add".to_string(),
        };
        let Some(address) = self.dialogs.text_input(prompt).await else {
            debug!("feed prompt cancelled");
            return;
        };
        if let Err(err) = self.provider.add_feed(&address).await {
            warn!(address = %address, error = %err, "feed subscription failed");
        }
    }

    /// Unsubscribe from the selected feeds after confirmation.
    pub async fn remove_selected(&self) {
        let ids: Vec<Uuid> = {
            let sections = self.sections.borrow();
            let selection = self.selection.borrow();
            rows_at(&sections, &selection)
                .into_iter()
                .map(|feed| feed.id)
                .collect()
        };
        if ids.is_empty() {
            return;
        }

        let alert = Alert {
            title: "Remove feeds?".to_string(),
            message: Some("Selected feeds will be unsubscribed.".to_string()),
            actions: vec![
                AlertAction::cancel(),
                AlertAction::new("Delete", ActionStyle::Destructive),
            ],
        };
        if self.dialogs.alert(alert).await != Some(REMOVE) {
            debug!("feed removal cancelled");
            return;
        }
        match self.provider.remove_feeds(&ids).await {
            Ok(()) => {
                self.selection.send_replace(Vec::new());
            }
            Err(err) => warn!(error = %err, "feed removal failed"),
        }
    }

    /// Open the channel screen for the feed at `path`.
    pub fn select_feed(&self, path: IndexPath) {
        let feed_id = {
            let sections = self.sections.borrow();
            rows_at(&sections, &[path]).first().map(|feed| feed.id)
        };
        match feed_id {
            Some(feed_id) => self.navigator.navigate(Route::RssChannel { feed_id }),
            None => debug!(?path, "selected feed no longer exists"),
        }
    }
}

fn sections_for(feeds: Vec<RssFeed>) -> Sections {
    vec![SectionModel::plain(RSS_SECTION_ID, feeds)]
}
