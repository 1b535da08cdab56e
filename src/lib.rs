#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

pub mod age_set;
pub mod combinations;
pub mod fingerprint;
pub mod solver;

pub use age_set::{Age, AgeSet, AggregatePair};
pub use combinations::{combinations_with_repetition, count_combinations};
pub use fingerprint::{Fingerprint, FingerprintError, Identifier, PrimeTable};
pub use solver::{
    CollisionStrategy, PuzzleConfig, Solution, SolutionIndex, SolveError, SolveStats, Solver,
};

pub(crate) type HashMap<K, V> = rustc_hash::FxHashMap<K, V>;
#[allow(unused)]
pub(crate) type HashSet<K> = rustc_hash::FxHashSet<K>;

/// Solve the riddle with its classic parameters.
///
/// Ages range from 2 to 19, each father has three children and the
/// ambiguity must recur two years back. Returns the answers in ascending order.
pub fn solve() -> Result<Vec<AgeSet>, SolveError> {
    let solution = Solver::new(PuzzleConfig::default())?.solve()?;
    Ok(solution.answers)
}
