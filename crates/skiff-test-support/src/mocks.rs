//! Collaborator fakes that record what view-models asked for.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use skiff_ui::dialog::{Alert, Dialogs, TextPrompt};
use skiff_ui::navigation::{Navigator, Route};
use skiff_ui::preferences::{AccountState, PatronAccount, PatronService};
use tokio::sync::watch;

/// Navigator that keeps every requested route.
#[derive(Default)]
pub struct RecordingNavigator {
    routes: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    /// Routes requested so far, oldest first.
    #[must_use]
    pub fn routes(&self) -> Vec<Route> {
        self.routes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        self.routes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(route);
    }
}

/// Dialogs that answer from a script and record what was shown.
///
/// An exhausted script dismisses alerts and cancels prompts.
#[derive(Default)]
pub struct ScriptedDialogs {
    alert_answers: Mutex<VecDeque<Option<usize>>>,
    text_answers: Mutex<VecDeque<Option<String>>>,
    alerts: Mutex<Vec<Alert>>,
    prompts: Mutex<Vec<TextPrompt>>,
}

impl ScriptedDialogs {
    /// Queue the answer to the next alert.
    pub fn answer_alert(&self, answer: Option<usize>) {
        self.alert_answers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(answer);
    }

    /// Queue the answer to the next text prompt.
    pub fn answer_text(&self, answer: Option<&str>) {
        self.text_answers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(answer.map(str::to_string));
    }

    /// Alerts shown so far.
    #[must_use]
    pub fn alerts(&self) -> Vec<Alert> {
        self.alerts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Prompts shown so far.
    #[must_use]
    pub fn prompts(&self) -> Vec<TextPrompt> {
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl Dialogs for ScriptedDialogs {
    async fn alert(&self, alert: Alert) -> Option<usize> {
        self.alerts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(alert);
        self.alert_answers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .flatten()
    }

    async fn text_input(&self, prompt: TextPrompt) -> Option<String> {
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(prompt);
        self.text_answers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .flatten()
    }
}

/// Patron service whose account is driven by the test.
pub struct FakePatronService {
    account: watch::Sender<PatronAccount>,
    links: Mutex<usize>,
}

impl FakePatronService {
    /// Service starting from `account`.
    #[must_use]
    pub fn new(account: PatronAccount) -> Self {
        let (sender, _) = watch::channel(account);
        Self {
            account: sender,
            links: Mutex::new(0),
        }
    }

    /// Publish a new account state.
    pub fn set_account(&self, account: PatronAccount) {
        self.account.send_replace(account);
    }

    /// Number of link requests received.
    #[must_use]
    pub fn link_requests(&self) -> usize {
        *self.links.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for FakePatronService {
    fn default() -> Self {
        Self::new(PatronAccount::default())
    }
}

#[async_trait]
impl PatronService for FakePatronService {
    fn account(&self) -> watch::Receiver<PatronAccount> {
        self.account.subscribe()
    }

    async fn link(&self) -> anyhow::Result<()> {
        *self.links.lock().unwrap_or_else(PoisonError::into_inner) += 1;
        self.account.send_modify(|account| account.state = AccountState::Loading);
        Ok(())
    }
}
