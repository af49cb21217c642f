//! Patron support screen.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;
use tracing::warn;
use url::Url;

use crate::navigation::{Navigator, Route};
use crate::reactive::{DisposeBag, changed_or_pending};

/// Page opened by the become-patron button.
pub const PATREON_URL: &str = "https://patreon.com/xitrix";

/// Link state of the Patreon account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AccountState {
    /// No account linked.
    #[default]
    Unlinked,
    /// Link or refresh in flight.
    Loading,
    /// Account linked.
    Linked,
}

/// Patron status as reported by the service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PatronAccount {
    /// Link state.
    pub state: AccountState,
    /// Linked account pledges at the patron tier.
    pub is_patron: bool,
    /// Full version purchased.
    pub is_full_version: bool,
}

/// Patron account collaborator.
#[async_trait]
pub trait PatronService: Send + Sync {
    /// Observe the account.
    fn account(&self) -> watch::Receiver<PatronAccount>;

    /// Start linking (or refreshing) the Patreon account.
    async fn link(&self) -> anyhow::Result<()>;
}

/// Everything the patron screen renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatronOutputs {
    /// Label of the link button.
    pub link_button_title: String,
    /// Whether the thank-you box is shown.
    pub patron_box_visible: bool,
    /// Whether the become-patron button is hidden.
    pub become_patron_hidden: bool,
    /// Whether the link spinner runs.
    pub loading: bool,
    /// Title inside the thank-you box.
    pub version_text: String,
}

/// Screen outputs for `account`.
#[must_use]
pub fn derive_outputs(account: &PatronAccount) -> PatronOutputs {
    let link_button_title = match account.state {
        AccountState::Unlinked | AccountState::Loading => "Link Patreon account",
        AccountState::Linked => "Refresh Patreon status",
    };
    let version_text = if account.is_full_version {
        "Full version"
    } else if account.is_patron {
        "Patron"
    } else {
        ""
    };
    PatronOutputs {
        link_button_title: link_button_title.to_string(),
        patron_box_visible: account.is_patron || account.is_full_version,
        become_patron_hidden: account.is_patron,
        loading: account.state == AccountState::Loading,
        version_text: version_text.to_string(),
    }
}

/// Patron screen.
pub struct PatronViewModel {
    service: Arc<dyn PatronService>,
    navigator: Arc<dyn Navigator>,
    outputs: watch::Receiver<PatronOutputs>,
    _bag: DisposeBag,
}

impl PatronViewModel {
    /// Build the screen and follow the account.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    #[must_use]
    pub fn new(service: Arc<dyn PatronService>, navigator: Arc<dyn Navigator>) -> Self {
        let mut account = service.account();
        let (outputs_tx, outputs) = watch::channel(derive_outputs(&account.borrow_and_update()));

        let mut bag = DisposeBag::new();
        bag.spawn(async move {
            loop {
                changed_or_pending(&mut account).await;
                let next = derive_outputs(&account.borrow_and_update());
                outputs_tx.send_if_modified(|current| {
                    if *current == next {
                        return false;
                    }
                    *current = next;
                    true
                });
            }
        });

        Self {
            service,
            navigator,
            outputs,
            _bag: bag,
        }
    }

    /// Observe the screen outputs.
    #[must_use]
    pub fn outputs(&self) -> watch::Receiver<PatronOutputs> {
        self.outputs.clone()
    }

    /// Link the Patreon account.
    pub async fn link_account(&self) {
        if let Err(err) = self.service.link().await {
            warn!(error = %err, "patreon link failed");
        }
    }

    /// Open the Patreon page.
    pub fn become_patron(&self) {
        match Url::parse(PATREON_URL) {
            Ok(url) => self.navigator.navigate(Route::External { url }),
            Err(err) => warn!(error = %err, "patreon url rejected"),
        }
    }
}
