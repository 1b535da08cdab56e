//! Canonical identifiers for age sets.
//!
//! Every age `a` in the identifier's domain is assigned the `a`-th prime
//! number. The fingerprint of an age set is the product of the primes of its
//! ages, repeated ages contributing repeated factors. By unique prime
//! factorisation, two age sets have the same fingerprint if and only if they
//! are equal as multisets.

use std::ops::Range;

use derive_more::{Display, From, Into};
use thiserror::Error;

use crate::age_set::{Age, AgeSet};

/// Primes below this bound are available by default.
pub const DEFAULT_PRIME_LIMIT: usize = 10_000;

/// A multiset fingerprint, see [Identifier::fingerprint].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, From, Into, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Fingerprint(u64);

/// Errors when computing a fingerprint.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum FingerprintError {
    /// An age has no prime assigned to it.
    #[error("Age {value} is outside of the identifier domain 0..{domain_size}")]
    OutOfDomain {
        /// The offending age
        value: Age,
        /// The number of primes available
        domain_size: usize,
    },
    /// The product of primes does not fit in a fingerprint.
    #[error("Fingerprint of {ages} overflows")]
    Overflow {
        /// The age set being fingerprinted
        ages: String,
    },
}

/// All primes below some limit, in increasing order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrimeTable {
    primes: Vec<u64>,
}

impl PrimeTable {
    /// Sieve all primes strictly below `limit`.
    pub fn below(limit: usize) -> Self {
        let mut is_composite = vec![false; limit];
        let mut primes = Vec::new();
        for n in 2..limit {
            if is_composite[n] {
                continue;
            }
            primes.push(n as u64);
            // Multiples below n^2 were crossed out by smaller primes
            let Some(square) = n.checked_mul(n).filter(|&square| square < limit) else {
                continue;
            };
            for multiple in (square..limit).step_by(n) {
                is_composite[multiple] = true;
            }
        }
        Self { primes }
    }

    /// The `index`-th prime, starting with 2 at index 0.
    pub fn get(&self, index: usize) -> Option<u64> {
        self.primes.get(index).copied()
    }

    /// The number of primes in the table.
    pub fn len(&self) -> usize {
        self.primes.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.primes.is_empty()
    }

    /// The primes, in increasing order.
    pub fn primes(&self) -> &[u64] {
        &self.primes
    }
}

impl Default for PrimeTable {
    fn default() -> Self {
        Self::below(DEFAULT_PRIME_LIMIT)
    }
}

/// Maps age sets to their [Fingerprint].
///
/// Owns a read-only [PrimeTable], built once on construction.
#[derive(Clone, Debug, Default)]
pub struct Identifier {
    primes: PrimeTable,
}

impl Identifier {
    /// An identifier using the given primes.
    pub fn new(primes: PrimeTable) -> Self {
        Self { primes }
    }

    /// An identifier for all ages below the number of primes below `limit`.
    pub fn with_prime_limit(limit: usize) -> Self {
        Self::new(PrimeTable::below(limit))
    }

    /// The number of distinct ages that can be fingerprinted.
    ///
    /// Valid ages are `0..domain_size()`.
    pub fn domain_size(&self) -> usize {
        self.primes.len()
    }

    /// The ages that can be fingerprinted, `0..domain_size()`.
    pub fn domain(&self) -> Range<Age> {
        0..Age::try_from(self.domain_size()).unwrap_or(Age::MAX)
    }

    /// Whether `age` can be fingerprinted.
    pub fn contains(&self, age: Age) -> bool {
        self.domain().contains(&age)
    }

    fn prime(&self, age: Age) -> Result<u64, FingerprintError> {
        usize::try_from(age)
            .ok()
            .and_then(|index| self.primes.get(index))
            .ok_or(FingerprintError::OutOfDomain {
                value: age,
                domain_size: self.domain_size(),
            })
    }

    /// The canonical fingerprint of `ages`.
    ///
    /// Fails if an age is outside of the domain or if the product of primes
    /// overflows.
    pub fn fingerprint(&self, ages: &AgeSet) -> Result<Fingerprint, FingerprintError> {
        let mut product: u64 = 1;
        for &age in ages.ages() {
            product = product
                .checked_mul(self.prime(age)?)
                .ok_or_else(|| FingerprintError::Overflow {
                    ages: ages.to_string(),
                })?;
        }
        Ok(Fingerprint(product))
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;
    use rstest::{fixture, rstest};

    use super::*;
    use crate::{combinations::combinations_with_repetition, HashMap};

    #[fixture]
    fn identifier() -> Identifier {
        Identifier::default()
    }

    #[test]
    fn test_sieve() {
        assert_eq!(PrimeTable::below(30).primes(), &[2, 3, 5, 7, 11, 13, 17, 19, 23, 29]);
        assert!(PrimeTable::below(2).is_empty());
        assert!(PrimeTable::below(0).is_empty());
        // Primes above the square root of the limit cross nothing out
        assert_eq!(PrimeTable::below(50).primes().last(), Some(&47));
        assert_eq!(PrimeTable::below(49).len(), 15);
        assert_eq!(PrimeTable::default().len(), 1229);
    }

    #[rstest]
    fn test_known_fingerprints(identifier: Identifier) {
        // 0 -> 2, 1 -> 3, 2 -> 5, 3 -> 7
        let fp = identifier.fingerprint(&AgeSet::from([2, 0, 2])).unwrap();
        assert_eq!(fp, Fingerprint::from(50));
        let fp = identifier.fingerprint(&AgeSet::from([3, 1])).unwrap();
        assert_eq!(u64::from(fp), 21);
        assert_eq!(
            identifier.fingerprint(&AgeSet::default()),
            Ok(Fingerprint::from(1))
        );
    }

    #[rstest]
    fn test_permutation_invariant(identifier: Identifier) {
        let ages = [4, 4, 10];
        let fingerprints: Vec<_> = ages
            .into_iter()
            .permutations(3)
            .map(|perm| identifier.fingerprint(&perm.into()).unwrap())
            .collect();
        assert!(fingerprints.iter().all_equal());
    }

    #[rstest]
    fn test_injective_on_puzzle_range(identifier: Identifier) {
        let mut seen = HashMap::default();
        for set in combinations_with_repetition(2, 19, 3) {
            let fp = identifier.fingerprint(&set).unwrap();
            if let Some(other) = seen.insert(fp, set.clone()) {
                panic!("{set} and {other} share fingerprint {fp}");
            }
        }
        assert_eq!(seen.len(), 1140);
    }

    #[rstest]
    #[case(-1)]
    #[case(1229)]
    #[case(Age::MAX)]
    fn test_out_of_domain(identifier: Identifier, #[case] age: Age) {
        assert!(!identifier.contains(age));
        assert_eq!(
            identifier.fingerprint(&AgeSet::from([3, age])),
            Err(FingerprintError::OutOfDomain {
                value: age,
                domain_size: 1229
            })
        );
    }

    #[rstest]
    fn test_largest_age_in_domain(identifier: Identifier) {
        assert_eq!(identifier.domain(), 0..1229);
        assert!(identifier.contains(1228));
        assert_eq!(
            identifier.fingerprint(&AgeSet::from([1228])),
            Ok(Fingerprint::from(9973))
        );
    }

    #[rstest]
    fn test_overflow(identifier: Identifier) {
        // 9973^5 > 2^64
        let ages = AgeSet::from([1228; 5]);
        assert!(matches!(
            identifier.fingerprint(&ages),
            Err(FingerprintError::Overflow { .. })
        ));
    }

    #[test]
    fn test_small_domain() {
        let identifier = Identifier::with_prime_limit(20);
        assert_eq!(identifier.domain_size(), 8);
        assert_eq!(identifier.domain(), 0..8);
        assert!(identifier.contains(7));
        assert!(!identifier.contains(8));
        assert!(!identifier.contains(-1));
        assert!(Identifier::with_prime_limit(2).domain().is_empty());
    }
}
