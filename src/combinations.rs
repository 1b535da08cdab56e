//! Combinations with repetition over a bounded range of ages.
//!
//! Multisets are grown one age at a time. The accumulator maps every age to
//! the partial multisets whose smallest element is that age; a new age may
//! only be added to multisets that contain no smaller age, so that every
//! multiset is built exactly once, in non-increasing order of insertion.

use std::collections::BTreeMap;

use crate::age_set::{Age, AgeSet};

/// All multisets of `size` ages drawn from `min..=max`, repetition allowed.
///
/// Yields `C(max - min + size, size)` distinct age sets. For `size == 0` or
/// an empty range, no age set is produced (not even the empty one).
pub fn combinations_with_repetition(min: Age, max: Age, size: usize) -> Vec<AgeSet> {
    if size == 0 || min > max {
        return Vec::new();
    }

    // Start with single ages, each keyed by itself
    let mut by_min_age: BTreeMap<Age, Vec<AgeSet>> =
        (min..=max).map(|age| (age, vec![AgeSet::from([age])])).collect();
    for _ in 1..size {
        by_min_age = extend_by_min_age(min, max, &by_min_age);
    }

    by_min_age.into_values().flatten().collect()
}

/// Grow every partial multiset by one age.
///
/// Age `age` is only added to multisets whose minimum is at least `age`; the
/// minimum of the new multiset is therefore `age`.
fn extend_by_min_age(
    min: Age,
    max: Age,
    by_min_age: &BTreeMap<Age, Vec<AgeSet>>,
) -> BTreeMap<Age, Vec<AgeSet>> {
    let mut extended = BTreeMap::new();
    for age in min..=max {
        let new_sets: Vec<AgeSet> = by_min_age
            .range(age..)
            .flat_map(|(_, sets)| sets)
            .map(|set| {
                let mut set = set.clone();
                set.push(age);
                set
            })
            .collect();
        if !new_sets.is_empty() {
            extended.insert(age, new_sets);
        }
    }
    extended
}

/// The number of multisets [combinations_with_repetition] produces.
///
/// Returns `None` if the count does not fit in a `u128`.
pub fn count_combinations(min: Age, max: Age, size: usize) -> Option<u128> {
    if size == 0 || min > max {
        return Some(0);
    }
    // C(n + size - 1, size) where n = max - min + 1
    let n = u128::try_from(i128::from(max) - i128::from(min) + 1).ok()?;
    let mut count: u128 = 1;
    for i in 0..size as u128 {
        count = count.checked_mul(n + i)? / (i + 1);
    }
    Some(count)
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;
    use rstest::rstest;

    use super::*;
    use crate::HashSet;

    #[rstest]
    #[case(0, 0, 1)]
    #[case(1, 3, 1)]
    #[case(1, 3, 2)]
    #[case(2, 19, 3)]
    #[case(-2, 2, 4)]
    #[case(5, 7, 5)]
    fn test_count_and_uniqueness(#[case] min: Age, #[case] max: Age, #[case] size: usize) {
        let sets = combinations_with_repetition(min, max, size);
        let expected = count_combinations(min, max, size).unwrap();
        assert_eq!(sets.len() as u128, expected);

        let unique: HashSet<_> = sets.iter().collect();
        assert_eq!(unique.len(), sets.len());
        for set in &sets {
            assert_eq!(set.len(), size);
            assert!(set.ages().iter().all(|age| (min..=max).contains(age)));
        }
    }

    #[rstest]
    #[case(2, 19)]
    #[case(4, 4)]
    #[case(-3, 10)]
    fn test_size_zero_is_empty(#[case] min: Age, #[case] max: Age) {
        assert!(combinations_with_repetition(min, max, 0).is_empty());
        assert_eq!(count_combinations(min, max, 0), Some(0));
    }

    #[test]
    fn test_empty_range() {
        assert!(combinations_with_repetition(5, 4, 3).is_empty());
    }

    #[test]
    fn test_small_range() {
        let sets = combinations_with_repetition(1, 3, 2)
            .into_iter()
            .map(Vec::from)
            .sorted()
            .collect_vec();
        assert_eq!(
            sets,
            vec![
                vec![1, 1],
                vec![1, 2],
                vec![1, 3],
                vec![2, 2],
                vec![2, 3],
                vec![3, 3]
            ]
        );
    }

    #[test]
    fn test_single_age_range() {
        let sets = combinations_with_repetition(7, 7, 3);
        assert_eq!(sets, vec![AgeSet::from([7, 7, 7])]);
    }

    #[test]
    fn test_known_counts() {
        assert_eq!(count_combinations(2, 19, 3), Some(1140));
        assert_eq!(count_combinations(1, 10, 1), Some(10));
        assert_eq!(count_combinations(0, 9, 2), Some(55));
    }
}
