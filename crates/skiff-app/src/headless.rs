//! Terminal stand-ins for the interactive collaborators.
//!
//! The headless binary has no screen to present, so navigation requests are logged and
//! every dialog is dismissed. Destructive intents therefore never proceed.

use async_trait::async_trait;
use skiff_ui::{Alert, Dialogs, Navigator, Route, TextPrompt};
use tracing::info;

/// Navigator that logs requested routes.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingNavigator;

impl Navigator for LoggingNavigator {
    fn navigate(&self, route: Route) {
        info!(?route, "navigation requested");
    }
}

/// Dialogs that log and dismiss every prompt.
#[derive(Debug, Default, Clone, Copy)]
pub struct DismissingDialogs;

#[async_trait]
impl Dialogs for DismissingDialogs {
    async fn alert(&self, alert: Alert) -> Option<usize> {
        info!(title = %alert.title, "alert dismissed");
        None
    }

    async fn text_input(&self, prompt: TextPrompt) -> Option<String> {
        info!(title = %prompt.title, "text prompt dismissed");
        None
    }
}
