//! Section layout of the torrent list.

use skiff_config::Preferences;
use skiff_events::TorrentState;
use skiff_torrent_core::TorrentSnapshot;

use crate::section::SectionModel;
use crate::torrents::search::filter_torrents;
use crate::torrents::sort::sort_torrents;

/// Identifier of the single section published when grouping is off.
pub const TORRENTS_SECTION_ID: &str = "torrents";

/// Split sorted `rows` into one section per state, ordered by `order`.
///
/// Rows keep their relative order inside each section. A state absent from `order`
/// is a programming error: it trips a debug assertion. Release builds place such a
/// group after every ordered group rather than before them.
#[must_use]
pub fn group_sections(
    rows: Vec<TorrentSnapshot>,
    order: &[TorrentState],
) -> Vec<SectionModel<TorrentSnapshot>> {
    let mut groups: Vec<(usize, TorrentState, Vec<TorrentSnapshot>)> = Vec::new();
    for row in rows {
        match groups.iter_mut().find(|(_, state, _)| *state == row.state) {
            Some((_, _, members)) => members.push(row),
            None => groups.push((group_position(row.state, order), row.state, vec![row])),
        }
    }
    groups.sort_by_key(|(position, _, _)| *position);
    groups
        .into_iter()
        .map(|(_, state, members)| SectionModel::titled(state.name(), state.name(), members))
        .collect()
}

fn group_position(state: TorrentState, order: &[TorrentState]) -> usize {
    let position = order.iter().position(|candidate| *candidate == state);
    debug_assert!(
        position.is_some(),
        "group ordering is missing state {state}"
    );
    position.unwrap_or(usize::MAX)
}

/// Full list derivation: filter by `query`, sort, then group or wrap in one section.
#[must_use]
pub fn derive_sections(
    snapshots: Vec<TorrentSnapshot>,
    query: &str,
    preferences: &Preferences,
) -> Vec<SectionModel<TorrentSnapshot>> {
    let rows = sort_torrents(
        filter_torrents(snapshots, query),
        preferences.sort_type,
        preferences.sort_reversed,
    );
    if preferences.grouped_by_state {
        group_sections(rows, &preferences.group_order)
    } else {
        vec![SectionModel::plain(TORRENTS_SECTION_ID, rows)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use skiff_config::SortType;
    use skiff_events::InfoHash;

    fn snapshot(hash: &str, name: &str, state: TorrentState) -> TorrentSnapshot {
        TorrentSnapshot {
            info_hash: InfoHash::new(hash),
            name: name.to_string(),
            state,
            progress: 0.0,
            total_wanted: 0,
            creation_date: None,
            added_at: Utc::now(),
            download_dir: None,
            is_valid: true,
        }
    }

    #[test]
    fn groups_follow_configured_order() {
        let rows = vec![
            snapshot("1", "a", TorrentState::Seeding),
            snapshot("2", "b", TorrentState::Paused),
            snapshot("3", "c", TorrentState::Seeding),
        ];
        let mut order = TorrentState::ALL.to_vec();
        order.retain(|state| *state != TorrentState::Paused);
        order.insert(0, TorrentState::Paused);

        let sections = group_sections(rows, &order);
        let ids: Vec<_> = sections.iter().map(|section| section.id.as_str()).collect();
        assert_eq!(ids, vec!["paused", "seeding"]);
        assert_eq!(sections[1].header.as_deref(), Some("seeding"));
        let seeding: Vec<_> = sections[1]
            .rows
            .iter()
            .map(|row| row.info_hash.as_hex())
            .collect();
        assert_eq!(seeding, vec!["1", "3"]);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "group ordering is missing state")]
    fn missing_state_trips_debug_assertion() {
        let _ = group_sections(
            vec![snapshot("1", "a", TorrentState::StorageError)],
            &[TorrentState::Seeding],
        );
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "group ordering is missing state")]
    fn missing_state_trips_debug_assertion_among_several_groups() {
        let _ = group_sections(
            vec![
                snapshot("1", "a", TorrentState::Seeding),
                snapshot("2", "b", TorrentState::StorageError),
            ],
            &[TorrentState::Seeding],
        );
    }

    #[test]
    #[cfg(not(debug_assertions))]
    fn missing_state_sorts_after_ordered_groups() {
        let sections = group_sections(
            vec![
                snapshot("1", "a", TorrentState::StorageError),
                snapshot("2", "b", TorrentState::Seeding),
            ],
            &[TorrentState::Seeding],
        );
        let ids: Vec<&str> = sections.iter().map(|section| section.id.as_str()).collect();
        assert_eq!(ids, [TorrentState::Seeding.name(), TorrentState::StorageError.name()]);
    }

    #[test]
    fn ungrouped_list_is_a_single_section() {
        let prefs = Preferences {
            sort_type: SortType::Alphabetically,
            ..Preferences::default()
        };
        let sections = derive_sections(
            vec![
                snapshot("1", "Zeta", TorrentState::Paused),
                snapshot("2", "alpha", TorrentState::Seeding),
                snapshot("3", "other", TorrentState::Seeding),
            ],
            "a",
            &prefs,
        );
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].id, TORRENTS_SECTION_ID);
        assert!(sections[0].header.is_none());
        let names: Vec<_> = sections[0].rows.iter().map(|row| row.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "Zeta"]);
    }

    #[test]
    fn grouped_list_sorts_inside_sections() {
        let prefs = Preferences {
            grouped_by_state: true,
            sort_reversed: true,
            ..Preferences::default()
        };
        let sections = derive_sections(
            vec![
                snapshot("1", "a", TorrentState::Downloading),
                snapshot("2", "b", TorrentState::Downloading),
                snapshot("3", "c", TorrentState::CheckingFiles),
            ],
            "",
            &prefs,
        );
        assert_eq!(sections[0].id, "checking_files");
        let names: Vec<_> = sections[1].rows.iter().map(|row| row.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
    }
}
