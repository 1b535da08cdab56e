//! Solve the children's ages riddle.
//!
//! Two fathers compare the ages of their three children: the sums agree, and
//! so do the sums of the cubes. Two years ago, the same was true. The solver
//! finds all age sets that collide with a distinct age set on both
//! aggregates ([SolutionIndex]) and keeps those whose translation back in time
//! also collides.
//!
//! Two strategies are available to find collisions. [CollisionStrategy::Pairwise]
//! compares all pairs of candidates; [CollisionStrategy::Grouped] first buckets
//! candidates by their [AggregatePair] and only compares within buckets. Both
//! yield the same index.

use std::fmt;

use itertools::Itertools;
use thiserror::Error;

use crate::{
    age_set::{Age, AgeSet, AggregatePair},
    combinations::combinations_with_repetition,
    fingerprint::{Fingerprint, FingerprintError, Identifier},
    HashMap,
};

/// All age sets that collide with at least one distinct age set, keyed by
/// their fingerprint.
pub type SolutionIndex = HashMap<Fingerprint, AgeSet>;

/// The riddle's parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PuzzleConfig {
    /// Youngest possible age.
    pub min_age: Age,
    /// Oldest possible age.
    pub max_age: Age,
    /// Number of children per father.
    pub num_children: usize,
    /// How many years back the collision must recur. May be negative.
    pub year_diff: Age,
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        Self {
            min_age: 2,
            max_age: 19,
            num_children: 3,
            year_diff: 2,
        }
    }
}

impl PuzzleConfig {
    /// Set the age range.
    pub fn with_ages(mut self, min_age: Age, max_age: Age) -> Self {
        self.min_age = min_age;
        self.max_age = max_age;
        self
    }

    /// Set the number of children.
    pub fn with_num_children(mut self, num_children: usize) -> Self {
        self.num_children = num_children;
        self
    }

    /// Set the translation offset.
    pub fn with_year_diff(mut self, year_diff: Age) -> Self {
        self.year_diff = year_diff;
        self
    }
}

/// How to find age sets with equal aggregates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum CollisionStrategy {
    /// Compare every pair of candidates.
    #[default]
    Pairwise,
    /// Bucket candidates by aggregates, then compare within buckets.
    Grouped,
}

/// Errors when solving the riddle.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum SolveError {
    /// The age range contains no age.
    #[error("Empty age range: min age {min_age} is larger than max age {max_age}")]
    EmptyAgeRange {
        /// Youngest age
        min_age: Age,
        /// Oldest age
        max_age: Age,
    },
    /// An age set could not be fingerprinted.
    #[error(transparent)]
    Fingerprint(#[from] FingerprintError),
    /// The sum of cubes of an age set does not fit in an `i128`.
    #[error("Aggregates of {ages} overflow")]
    AggregateOverflow {
        /// The age set being aggregated
        ages: String,
    },
}

/// Counters collected during a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolveStats {
    /// Number of candidate age sets.
    pub candidates: usize,
    /// Number of unordered pairs of distinct colliding age sets.
    pub collisions: usize,
    /// Number of age sets in the solution index.
    pub indexed: usize,
    /// Number of answers.
    pub answers: usize,
}

impl fmt::Display for SolveStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} candidates, {} collisions, {} indexed, {} answers",
            self.candidates, self.collisions, self.indexed, self.answers
        )
    }
}

/// The result of a solver run.
#[derive(Clone, Debug)]
pub struct Solution {
    /// The answers, in ascending order.
    pub answers: Vec<AgeSet>,
    /// All age sets involved in a collision.
    pub index: SolutionIndex,
    /// Run counters.
    pub stats: SolveStats,
}

/// A candidate along with its precomputed keys.
struct Candidate {
    ages: AgeSet,
    fingerprint: Fingerprint,
    aggregates: AggregatePair,
}

/// Solves the riddle for a given [PuzzleConfig].
#[derive(Clone, Debug)]
pub struct Solver {
    config: PuzzleConfig,
    identifier: Identifier,
    strategy: CollisionStrategy,
}

impl Solver {
    /// A solver using the default prime table.
    pub fn new(config: PuzzleConfig) -> Result<Self, SolveError> {
        Self::with_identifier(config, Identifier::default())
    }

    /// A solver using a custom identifier.
    ///
    /// Fails if the identifier cannot fingerprint every age of the range.
    pub fn with_identifier(
        config: PuzzleConfig,
        identifier: Identifier,
    ) -> Result<Self, SolveError> {
        let PuzzleConfig {
            min_age, max_age, ..
        } = config;
        if min_age > max_age {
            return Err(SolveError::EmptyAgeRange { min_age, max_age });
        }
        let domain = identifier.domain();
        if let Some(value) = [min_age, max_age]
            .into_iter()
            .find(|age| !domain.contains(age))
        {
            return Err(FingerprintError::OutOfDomain {
                value,
                domain_size: identifier.domain_size(),
            }
            .into());
        }
        Ok(Self {
            config,
            identifier,
            strategy: CollisionStrategy::default(),
        })
    }

    /// Set the collision search strategy.
    pub fn with_strategy(mut self, strategy: CollisionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// The riddle's parameters.
    pub fn config(&self) -> &PuzzleConfig {
        &self.config
    }

    /// The identifier used to fingerprint age sets.
    pub fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    /// The collision search strategy.
    pub fn strategy(&self) -> CollisionStrategy {
        self.strategy
    }

    fn candidates(&self) -> Result<Vec<Candidate>, SolveError> {
        let PuzzleConfig {
            min_age,
            max_age,
            num_children,
            ..
        } = self.config;
        combinations_with_repetition(min_age, max_age, num_children)
            .into_iter()
            .map(|ages| {
                let aggregates = ages
                    .aggregates()
                    .ok_or_else(|| SolveError::AggregateOverflow {
                        ages: ages.to_string(),
                    })?;
                Ok(Candidate {
                    fingerprint: self.identifier.fingerprint(&ages)?,
                    aggregates,
                    ages,
                })
            })
            .collect()
    }

    /// Pairs of indices into `candidates` of distinct colliding age sets.
    ///
    /// Every unordered pair is reported once, lower index first.
    fn colliding_pairs(&self, candidates: &[Candidate]) -> Vec<(usize, usize)> {
        let collide = |i: usize, j: usize| {
            let (a, b) = (&candidates[i], &candidates[j]);
            a.fingerprint != b.fingerprint && a.aggregates == b.aggregates
        };
        match self.strategy {
            CollisionStrategy::Pairwise => (0..candidates.len())
                .tuple_combinations::<(_, _)>()
                .filter(|&(i, j)| collide(i, j))
                .collect(),
            CollisionStrategy::Grouped => {
                let mut groups: HashMap<AggregatePair, Vec<usize>> = HashMap::default();
                for (i, candidate) in candidates.iter().enumerate() {
                    groups.entry(candidate.aggregates).or_default().push(i);
                }
                groups
                    .into_values()
                    .filter(|group| group.len() > 1)
                    .flat_map(|group| group.into_iter().tuple_combinations::<(_, _)>())
                    .filter(|&(i, j)| collide(i, j))
                    .sorted()
                    .collect()
            }
        }
    }

    /// All pairs of distinct age sets with equal aggregates.
    ///
    /// Each pair is listed once, smaller age set first, pairs in ascending
    /// order.
    pub fn collisions(&self) -> Result<Vec<(AgeSet, AgeSet)>, SolveError> {
        let candidates = self.candidates()?;
        Ok(self
            .colliding_pairs(&candidates)
            .into_iter()
            .map(|(i, j)| {
                let (a, b) = (&candidates[i].ages, &candidates[j].ages);
                if a <= b {
                    (a.clone(), b.clone())
                } else {
                    (b.clone(), a.clone())
                }
            })
            .sorted()
            .collect())
    }

    /// The age sets that collide with at least one distinct age set.
    pub fn collision_index(&self) -> Result<SolutionIndex, SolveError> {
        let candidates = self.candidates()?;
        let (index, _) = self.build_index(&candidates);
        Ok(index)
    }

    fn build_index(&self, candidates: &[Candidate]) -> (SolutionIndex, usize) {
        let pairs = self.colliding_pairs(candidates);
        let mut index = SolutionIndex::default();
        for &(i, j) in &pairs {
            for candidate in [&candidates[i], &candidates[j]] {
                index
                    .entry(candidate.fingerprint)
                    .or_insert_with(|| candidate.ages.clone());
            }
        }
        (index, pairs.len())
    }

    /// Whether `ages`, translated back by the year difference, is in `index`.
    fn recurs(&self, ages: &AgeSet, index: &SolutionIndex) -> Result<bool, SolveError> {
        let year_diff = self.config.year_diff;
        let translated = ages.translate(year_diff).ok_or_else(|| {
            // The overflowing age lies beyond either end of the `Age` range
            let value = if year_diff > 0 { Age::MIN } else { Age::MAX };
            FingerprintError::OutOfDomain {
                value,
                domain_size: self.identifier.domain_size(),
            }
        })?;
        let fingerprint = self.identifier.fingerprint(&translated)?;
        Ok(index.contains_key(&fingerprint))
    }

    /// Solve the riddle.
    ///
    /// Fails if a translated age set leaves the identifier domain.
    pub fn solve(&self) -> Result<Solution, SolveError> {
        let candidates = self.candidates()?;
        let (index, collisions) = self.build_index(&candidates);

        let mut answers = Vec::new();
        for ages in index.values().sorted() {
            if self.recurs(ages, &index)? {
                answers.push(ages.clone());
            }
        }

        let stats = SolveStats {
            candidates: candidates.len(),
            collisions,
            indexed: index.len(),
            answers: answers.len(),
        };
        Ok(Solution {
            answers,
            index,
            stats,
        })
    }
}
