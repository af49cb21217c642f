//! Torrent list ordering.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use skiff_config::SortType;
use skiff_torrent_core::TorrentSnapshot;

/// Sort `snapshots` by `sort`, dropping handles the engine no longer tracks.
///
/// Missing creation dates are treated as the moment of the call.
#[must_use]
pub fn sort_torrents(
    snapshots: Vec<TorrentSnapshot>,
    sort: SortType,
    reversed: bool,
) -> Vec<TorrentSnapshot> {
    sort_torrents_at(snapshots, sort, reversed, Utc::now())
}

/// [`sort_torrents`] with an explicit "now" for the creation-date fallback.
///
/// `reversed` flips the comparator rather than the output, so the stable sort
/// keeps ties in input order and sorting an already sorted list changes nothing.
#[must_use]
pub fn sort_torrents_at(
    mut snapshots: Vec<TorrentSnapshot>,
    sort: SortType,
    reversed: bool,
    now: DateTime<Utc>,
) -> Vec<TorrentSnapshot> {
    snapshots.retain(|snapshot| snapshot.is_valid);
    snapshots.sort_by(|first, second| {
        let ordering = compare(first, second, sort, now);
        if reversed {
            ordering.reverse()
        } else {
            ordering
        }
    });
    snapshots
}

fn compare(
    first: &TorrentSnapshot,
    second: &TorrentSnapshot,
    sort: SortType,
    now: DateTime<Utc>,
) -> Ordering {
    match sort {
        SortType::Alphabetically => first.name.to_lowercase().cmp(&second.name.to_lowercase()),
        SortType::CreationDate => second
            .creation_date
            .unwrap_or(now)
            .cmp(&first.creation_date.unwrap_or(now)),
        SortType::AddedDate => second.added_at.cmp(&first.added_at),
        SortType::Size => second.total_wanted.cmp(&first.total_wanted),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;
    use skiff_events::{InfoHash, TorrentState};

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().expect("valid date")
    }

    fn snapshot(hash: &str, name: &str) -> TorrentSnapshot {
        TorrentSnapshot {
            info_hash: InfoHash::new(hash),
            name: name.to_string(),
            state: TorrentState::Downloading,
            progress: 0.0,
            total_wanted: 0,
            creation_date: None,
            added_at: base_time(),
            download_dir: None,
            is_valid: true,
        }
    }

    fn hashes(snapshots: &[TorrentSnapshot]) -> Vec<&str> {
        snapshots.iter().map(|snapshot| snapshot.info_hash.as_hex()).collect()
    }

    #[test]
    fn alphabetical_is_case_insensitive() {
        let sorted = sort_torrents(
            vec![snapshot("1", "beta"), snapshot("2", "Alpha"), snapshot("3", "gamma")],
            SortType::Alphabetically,
            false,
        );
        assert_eq!(hashes(&sorted), vec!["2", "1", "3"]);
    }

    #[test]
    fn reversed_flips_direction_but_keeps_ties_in_input_order() {
        let mut a = snapshot("a", "x");
        a.total_wanted = 10;
        let mut b = snapshot("b", "y");
        b.total_wanted = 10;
        let mut c = snapshot("c", "z");
        c.total_wanted = 99;

        let forward = sort_torrents(vec![a.clone(), b.clone(), c.clone()], SortType::Size, false);
        assert_eq!(hashes(&forward), vec!["c", "a", "b"]);
        let backward = sort_torrents(vec![a, b, c], SortType::Size, true);
        assert_eq!(hashes(&backward), vec!["a", "b", "c"]);
    }

    #[test]
    fn missing_creation_date_counts_as_now() {
        let now = base_time() + Duration::days(30);
        let mut old = snapshot("old", "old");
        old.creation_date = Some(base_time());
        let mut future = snapshot("future", "future");
        future.creation_date = Some(now + Duration::days(1));
        let unknown = snapshot("unknown", "unknown");

        let sorted = sort_torrents_at(vec![old, unknown, future], SortType::CreationDate, false, now);
        assert_eq!(hashes(&sorted), vec!["future", "unknown", "old"]);
    }

    #[test]
    fn added_date_is_newest_first() {
        let mut first = snapshot("first", "a");
        first.added_at = base_time();
        let mut second = snapshot("second", "b");
        second.added_at = base_time() + Duration::hours(1);
        let sorted = sort_torrents(vec![first, second], SortType::AddedDate, false);
        assert_eq!(hashes(&sorted), vec!["second", "first"]);
    }

    #[test]
    fn invalid_handles_are_dropped() {
        let mut gone = snapshot("gone", "gone");
        gone.is_valid = false;
        let sorted = sort_torrents(vec![gone, snapshot("kept", "kept")], SortType::Size, false);
        assert_eq!(hashes(&sorted), vec!["kept"]);
    }

    fn arb_snapshot() -> impl Strategy<Value = TorrentSnapshot> {
        (
            "[a-f0-9]{4}",
            "[a-zA-Z ]{0,6}",
            0_u64..4,
            proptest::option::of(0_i64..4),
            0_i64..4,
            any::<bool>(),
        )
            .prop_map(|(hash, name, size, created, added, is_valid)| {
                let mut snapshot = snapshot(&hash, &name);
                snapshot.total_wanted = size;
                snapshot.creation_date = created.map(|days| base_time() + Duration::days(days));
                snapshot.added_at = base_time() + Duration::days(added);
                snapshot.is_valid = is_valid;
                snapshot
            })
    }

    fn arb_sort() -> impl Strategy<Value = SortType> {
        prop::sample::select(SortType::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn resorting_is_idempotent(
            snapshots in prop::collection::vec(arb_snapshot(), 0..12),
            sort in arb_sort(),
            reversed in any::<bool>(),
        ) {
            let now = base_time() + Duration::days(2);
            let once = sort_torrents_at(snapshots, sort, reversed, now);
            let twice = sort_torrents_at(once.clone(), sort, reversed, now);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn only_valid_handles_survive(
            snapshots in prop::collection::vec(arb_snapshot(), 0..12),
            sort in arb_sort(),
        ) {
            let valid = snapshots.iter().filter(|snapshot| snapshot.is_valid).count();
            let sorted = sort_torrents(snapshots, sort, false);
            prop_assert_eq!(sorted.len(), valid);
        }
    }
}
