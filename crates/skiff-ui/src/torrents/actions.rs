//! Confirmation prompts guarding destructive torrent intents.

use skiff_torrent_core::RemoveTorrent;

use crate::dialog::{ActionStyle, Alert, AlertAction};

const DROP_DATA: usize = 0;
const KEEP_DATA: usize = 1;
const REHASH: usize = 1;

/// Removal confirmation listing `names`, one per paragraph.
#[must_use]
pub fn removal_alert(names: &[String]) -> Alert {
    Alert {
        title: "Remove torrent?".to_string(),
        message: Some(names.join("\n\n")),
        actions: vec![
            AlertAction::new("Remove and delete data", ActionStyle::Destructive),
            AlertAction::new("Remove but keep data", ActionStyle::Default),
            AlertAction::cancel(),
        ],
    }
}

/// Removal options for the answer to [`removal_alert`]; `None` means cancelled.
#[must_use]
pub const fn removal_choice(answer: Option<usize>) -> Option<RemoveTorrent> {
    match answer {
        Some(DROP_DATA) => Some(RemoveTorrent { with_data: true }),
        Some(KEEP_DATA) => Some(RemoveTorrent { with_data: false }),
        _ => None,
    }
}

/// Recheck confirmation.
#[must_use]
pub fn rehash_alert() -> Alert {
    Alert {
        title: "Rehash torrent?".to_string(),
        message: Some("Downloaded data will be verified again.".to_string()),
        actions: vec![
            AlertAction::cancel(),
            AlertAction::new("Rehash", ActionStyle::Destructive),
        ],
    }
}

/// Whether the answer to [`rehash_alert`] confirms the recheck.
#[must_use]
pub const fn rehash_confirmed(answer: Option<usize>) -> bool {
    matches!(answer, Some(REHASH))
}
