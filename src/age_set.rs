//! Multisets of children's ages and their aggregates.
//!
//! An [AgeSet] is an unordered multiset of ages. It is stored sorted, so that
//! two age sets compare equal exactly when they are equal as multisets.

use std::fmt;

use derive_more::{From, Into};
use itertools::Itertools;
use smallvec::SmallVec;

/// A child's age.
///
/// Signed, as translating an age set back in time may push ages below zero.
pub type Age = i64;

/// Inline capacity of an [AgeSet], large enough for the usual three children.
const INLINE_AGES: usize = 4;

/// An unordered multiset of ages.
///
/// Ages are kept in ascending order, duplicates allowed.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "Vec<Age>", into = "Vec<Age>"))]
pub struct AgeSet(SmallVec<[Age; INLINE_AGES]>);

/// The pair of aggregates compared when looking for ambiguous age sets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, From, Into)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AggregatePair {
    /// Sum of all ages.
    pub sum: i128,
    /// Sum of the cubes of all ages.
    pub cubed_sum: i128,
}

impl AgeSet {
    /// Create an age set from ages given in any order.
    pub fn new(ages: impl IntoIterator<Item = Age>) -> Self {
        let mut ages: SmallVec<[Age; INLINE_AGES]> = ages.into_iter().collect();
        ages.sort_unstable();
        Self(ages)
    }

    /// The ages, in ascending order.
    pub fn ages(&self) -> &[Age] {
        &self.0
    }

    /// The number of children.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set holds no ages at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The largest age, if any.
    pub fn max_age(&self) -> Option<Age> {
        self.0.last().copied()
    }

    /// The smallest age, if any.
    pub fn min_age(&self) -> Option<Age> {
        self.0.first().copied()
    }

    /// The sum and the sum of cubes of all ages.
    ///
    /// Returns `None` if the sum of cubes does not fit in an `i128`.
    pub fn aggregates(&self) -> Option<AggregatePair> {
        let mut sum: i128 = 0;
        let mut cubed_sum: i128 = 0;
        for &age in self.ages() {
            let age = i128::from(age);
            let cube = age.checked_mul(age)?.checked_mul(age)?;
            sum += age;
            cubed_sum = cubed_sum.checked_add(cube)?;
        }
        Some(AggregatePair { sum, cubed_sum })
    }

    /// A new age set with `years` subtracted from every age.
    ///
    /// No clamping takes place: resulting ages may be negative. Returns `None`
    /// if an age leaves the range of [Age].
    pub fn translate(&self, years: Age) -> Option<Self> {
        // Subtracting the same offset everywhere preserves the order.
        self.0
            .iter()
            .map(|&age| age.checked_sub(years))
            .collect::<Option<_>>()
            .map(Self)
    }

    /// Append `age`, keeping the ages sorted.
    pub(crate) fn push(&mut self, age: Age) {
        let pos = self.0.partition_point(|&a| a <= age);
        self.0.insert(pos, age);
    }
}

impl From<Vec<Age>> for AgeSet {
    fn from(ages: Vec<Age>) -> Self {
        Self::new(ages)
    }
}

impl<const N: usize> From<[Age; N]> for AgeSet {
    fn from(ages: [Age; N]) -> Self {
        Self::new(ages)
    }
}

impl From<AgeSet> for Vec<Age> {
    fn from(set: AgeSet) -> Self {
        set.0.into_vec()
    }
}

impl FromIterator<Age> for AgeSet {
    fn from_iter<T: IntoIterator<Item = Age>>(iter: T) -> Self {
        Self::new(iter)
    }
}

impl fmt::Debug for AgeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.0.iter()).finish()
    }
}

impl fmt::Display for AgeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.iter().join(" "))
    }
}
