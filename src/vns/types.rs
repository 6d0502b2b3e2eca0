//! Core trait for Variable Neighborhood Search.

use rand::Rng;

/// A problem searched by [`VnsRunner`](super::VnsRunner).
///
/// Neighborhoods are indexed from `0` to `neighborhood_count() - 1`; higher
/// indices should perturb more. VNS minimizes [`cost`](Self::cost).
pub trait VnsProblem: Sync {
    /// The solution representation type.
    type Solution: Clone;

    /// Cost of a solution. Lower is better.
    fn cost(&self, solution: &Self::Solution) -> f64;

    /// Number of neighborhood structures.
    fn neighborhood_count(&self) -> usize;

    /// A random neighbor in neighborhood `k` (shaking).
    fn shake<R: Rng>(&self, solution: &Self::Solution, k: usize, rng: &mut R) -> Self::Solution;

    /// Local improvement of `solution`. Returning the input unchanged is
    /// allowed.
    fn local_search(&self, solution: &Self::Solution) -> Self::Solution;
}
