//! Confirmation and text prompts requested by view-models.

use async_trait::async_trait;

/// Visual weight of an alert action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionStyle {
    /// Regular action.
    Default,
    /// Action that destroys data.
    Destructive,
    /// Dismisses the alert without side effects.
    Cancel,
}

/// One button of an [`Alert`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertAction {
    /// Button label.
    pub title: String,
    /// Visual weight.
    pub style: ActionStyle,
}

impl AlertAction {
    /// Construct an action.
    #[must_use]
    pub fn new(title: impl Into<String>, style: ActionStyle) -> Self {
        Self {
            title: title.into(),
            style,
        }
    }

    /// Standard cancel button.
    #[must_use]
    pub fn cancel() -> Self {
        Self::new("Cancel", ActionStyle::Cancel)
    }
}

/// Modal alert with a list of actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    /// Headline.
    pub title: String,
    /// Body text.
    pub message: Option<String>,
    /// Buttons in display order.
    pub actions: Vec<AlertAction>,
}

/// Single-line text prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextPrompt {
    /// Headline.
    pub title: String,
    /// Placeholder shown in the empty field.
    pub placeholder: String,
    /// Label of the accepting button.
    pub accept: String,
}

/// Presents alerts and prompts and reports the user's answer.
#[async_trait]
pub trait Dialogs: Send + Sync {
    /// Show `alert`; resolves to the offset of the chosen action, or `None` when dismissed.
    async fn alert(&self, alert: Alert) -> Option<usize>;

    /// Show `prompt`; resolves to the entered text, or `None` when cancelled.
    async fn text_input(&self, prompt: TextPrompt) -> Option<String>;
}
