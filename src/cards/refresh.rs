//! Refresh policies and the pure list-update helpers they are built on.

use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::models::user::{UserList, UserRecord};

/// How displayed records are refreshed once the initial batch is shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RefreshPolicy {
    /// Each cycle fetches a random number of single records, and each one
    /// overwrites a random position of the current list. Failed fetches are dropped.
    #[default]
    Partial,
    /// Each cycle re-fetches a whole batch and replaces the list at once.
    /// A failed cycle replaces the cards with the error view.
    Full,
}

impl RefreshPolicy {
    pub const PARTIAL_DEFAULT_INTERVAL: Duration = Duration::from_secs(3);
    pub const FULL_DEFAULT_INTERVAL: Duration = Duration::from_secs(10);
}

/// Number of single-record fetches issued by one partial cycle, uniform in `1..=max`.
pub fn draw_replacement_count<R: Rng>(rng: &mut R, max: usize) -> usize {
    rng.random_range(1..=max.max(1))
}

/// A uniformly random position in a list of `len` records, `None` for an empty list.
pub fn pick_index<R: Rng>(rng: &mut R, len: usize) -> Option<usize> {
    (len > 0).then(|| rng.random_range(0..len))
}

/// Returns a new list with the record at `index` replaced.
///
/// The input list is never touched. An out-of-range `index` yields an unchanged copy.
pub fn replace_at(users: &[UserRecord], index: usize, record: UserRecord) -> UserList {
    let mut next = users.to_vec();
    if let Some(slot) = next.get_mut(index) {
        *slot = record;
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::test_support::{fixed_users, user};
    use rand::{SeedableRng, rngs::StdRng};
    use rstest::rstest;

    #[test]
    fn replacement_counts_stay_within_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let draws: Vec<usize> = (0..1000)
            .map(|_| draw_replacement_count(&mut rng, 10))
            .collect();

        assert!(draws.iter().all(|k| (1..=10).contains(k)));
        assert!(draws.contains(&1));
        assert!(draws.contains(&10));
    }

    #[test]
    fn zero_max_still_draws_one() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(draw_replacement_count(&mut rng, 0), 1);
    }

    #[rstest]
    #[case(0, None)]
    #[case(1, Some(0))]
    fn pick_index_on_tiny_lists(#[case] len: usize, #[case] expected: Option<usize>) {
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(pick_index(&mut rng, len), expected);
    }

    #[test]
    fn pick_index_covers_every_position() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut seen = [false; 10];
        for _ in 0..500 {
            let index = pick_index(&mut rng, 10).unwrap();
            seen[index] = true;
        }
        assert!(seen.iter().all(|hit| *hit));
    }

    #[test]
    fn replace_at_only_touches_the_target_position() {
        let before = fixed_users();
        let after = replace_at(&before, 4, user("new"));

        assert_eq!(after.len(), before.len());
        for (position, (old, new)) in before.iter().zip(after.iter()).enumerate() {
            if position == 4 {
                assert_eq!(new.email, "new@test");
            } else {
                assert_eq!(old, new);
            }
        }
        assert_eq!(before, fixed_users(), "input list must be left untouched");
    }

    #[test]
    fn replace_at_out_of_range_is_a_copy() {
        let before = fixed_users();
        assert_eq!(replace_at(&before, 10, user("new")), before);
    }

    #[test]
    fn replace_at_accepts_duplicate_emails() {
        let before = fixed_users();
        let after = replace_at(&before, 0, before[9].clone());
        assert_eq!(after[0].email, "u9@test");
        assert_eq!(after[9].email, "u9@test");
    }
}
