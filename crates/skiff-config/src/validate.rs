//! Validation helpers for preference documents.

use skiff_events::TorrentState;

use crate::error::{ConfigError, ConfigResult};
use crate::model::Preferences;

/// Check a preference document before it is published.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] when the group ordering does not list
/// every torrent state exactly once.
pub fn validate_preferences(preferences: &Preferences) -> ConfigResult<()> {
    validate_group_order(&preferences.group_order)
}

/// Ensure `order` is a permutation of [`TorrentState::ALL`].
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] naming the first missing or repeated state.
pub fn validate_group_order(order: &[TorrentState]) -> ConfigResult<()> {
    for state in TorrentState::ALL {
        match order.iter().filter(|candidate| **candidate == state).count() {
            1 => {}
            0 => {
                return Err(ConfigError::InvalidField {
                    field: "group_order",
                    value: Some(state.name().to_string()),
                    reason: "missing_state",
                });
            }
            _ => {
                return Err(ConfigError::InvalidField {
                    field: "group_order",
                    value: Some(state.name().to_string()),
                    reason: "duplicate_state",
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_order_is_valid() {
        assert!(validate_preferences(&Preferences::default()).is_ok());
    }

    #[test]
    fn reversed_order_is_valid() {
        let mut order = TorrentState::ALL.to_vec();
        order.reverse();
        assert!(validate_group_order(&order).is_ok());
    }

    #[test]
    fn missing_state_is_reported() {
        let order: Vec<_> = TorrentState::ALL
            .into_iter()
            .filter(|state| *state != TorrentState::Paused)
            .collect();
        match validate_group_order(&order) {
            Err(ConfigError::InvalidField { reason, value, .. }) => {
                assert_eq!(reason, "missing_state");
                assert_eq!(value.as_deref(), Some(TorrentState::Paused.name()));
            }
            other => panic!("expected missing state, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_state_is_reported() {
        let mut order = TorrentState::ALL.to_vec();
        order.push(TorrentState::Seeding);
        assert!(matches!(
            validate_group_order(&order),
            Err(ConfigError::InvalidField {
                reason: "duplicate_state",
                ..
            })
        ));
    }
}
