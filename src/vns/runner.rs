//! Variable Neighborhood Search execution engine.
//!
//! # Algorithm
//!
//! 1. Start from the given solution x with k = 0
//! 2. Repeat `max_iterations` times:
//!    a. **Shaking**: x' = random neighbor of x in N_k
//!    b. **Local search**: x'' = local_search(x')
//!    c. **Move or not**: if f(x'') < f(best), set x = best = x'' and
//!    k = 0; otherwise k = (k + 1) mod k_max
//! 3. Return the best solution found
//!
//! # Reference
//!
//! Mladenović, N. & Hansen, P. (1997). "Variable neighborhood search",
//! *Computers & Operations Research* 24(11), 1097-1100.

use rand::Rng;

use super::config::VnsConfig;
use super::types::VnsProblem;

/// Result of a VNS run.
#[derive(Debug, Clone)]
pub struct VnsResult<S: Clone> {
    /// Best solution found.
    pub best: S,
    /// Cost of the best solution.
    pub best_cost: f64,
    /// Rounds executed.
    pub iterations: usize,
    /// Rounds that improved the best solution.
    pub improvements: usize,
    /// Best cost after each round.
    pub cost_history: Vec<f64>,
}

/// Variable Neighborhood Search runner.
pub struct VnsRunner;

impl VnsRunner {
    /// Runs VNS from `initial` with an RNG seeded from `config.seed`
    /// (42 when unset).
    pub fn run<P: VnsProblem>(
        problem: &P,
        initial: P::Solution,
        config: &VnsConfig,
    ) -> VnsResult<P::Solution> {
        let mut rng = match config.seed {
            Some(s) => u_numflow::random::create_rng(s),
            None => u_numflow::random::create_rng(42),
        };
        Self::improve(problem, initial, config, &mut rng)
    }

    /// Runs VNS from `initial`, drawing randomness from `rng`.
    ///
    /// The returned best never costs more than `initial`. A problem with no
    /// neighborhoods returns `initial` without iterating.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_picking::vns::{VnsConfig, VnsProblem, VnsRunner};
    /// use rand::Rng;
    ///
    /// struct Target;
    /// impl VnsProblem for Target {
    ///     type Solution = i32;
    ///     fn cost(&self, x: &i32) -> f64 { (*x - 7).abs() as f64 }
    ///     fn neighborhood_count(&self) -> usize { 2 }
    ///     fn shake<R: Rng>(&self, x: &i32, k: usize, rng: &mut R) -> i32 {
    ///         let r = k as i32 + 1;
    ///         x + rng.random_range(-r..=r)
    ///     }
    ///     fn local_search(&self, x: &i32) -> i32 { *x }
    /// }
    ///
    /// let mut rng = u_numflow::random::create_rng(1);
    /// let result = VnsRunner::improve(&Target, 0, &VnsConfig::default(), &mut rng);
    /// assert!(result.best_cost <= 7.0);
    /// ```
    pub fn improve<P: VnsProblem, R: Rng>(
        problem: &P,
        initial: P::Solution,
        config: &VnsConfig,
        rng: &mut R,
    ) -> VnsResult<P::Solution> {
        let k_max = problem.neighborhood_count().min(config.max_neighborhoods);
        let initial_cost = problem.cost(&initial);
        if k_max == 0 {
            return VnsResult {
                best: initial,
                best_cost: initial_cost,
                iterations: 0,
                improvements: 0,
                cost_history: Vec::new(),
            };
        }

        let mut current = initial;
        let mut best_cost = initial_cost;
        let mut improvements = 0;
        let mut cost_history = Vec::with_capacity(config.max_iterations);
        let mut k = 0;

        for iteration in 0..config.max_iterations {
            let shaken = problem.shake(&current, k, rng);
            let candidate = problem.local_search(&shaken);
            let candidate_cost = problem.cost(&candidate);

            if candidate_cost < best_cost - 1e-12 {
                tracing::debug!(
                    iteration,
                    neighborhood = k,
                    from = best_cost,
                    to = candidate_cost,
                    "vns improvement"
                );
                current = candidate;
                best_cost = candidate_cost;
                improvements += 1;
                k = 0;
            } else {
                k = (k + 1) % k_max;
            }

            cost_history.push(best_cost);
        }

        VnsResult {
            best: current,
            best_cost,
            iterations: config.max_iterations,
            improvements,
            cost_history,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vns::{VnsConfig, VnsProblem};
    use rand::Rng;

    // f(x) = (x - 10)^2 over the integers, with a hill-climbing descent.
    struct DiscreteQuadratic;

    fn quadratic(x: i32) -> f64 {
        let d = x as f64 - 10.0;
        d * d
    }

    impl VnsProblem for DiscreteQuadratic {
        type Solution = i32;

        fn cost(&self, &x: &i32) -> f64 {
            quadratic(x)
        }

        fn neighborhood_count(&self) -> usize {
            3
        }

        fn shake<R: Rng>(&self, &x: &i32, k: usize, rng: &mut R) -> i32 {
            let radius = (k as i32 + 1) * 2;
            x + rng.random_range(-radius..=radius)
        }

        fn local_search(&self, &x: &i32) -> i32 {
            let mut current = x;
            loop {
                if quadratic(current - 1) < quadratic(current) {
                    current -= 1;
                } else if quadratic(current + 1) < quadratic(current) {
                    current += 1;
                } else {
                    break;
                }
            }
            current
        }
    }

    // Minimizes misplaced positions of a permutation; shakes only.
    struct PermSort {
        n: usize,
    }

    fn misplaced(perm: &[usize]) -> f64 {
        perm.iter().enumerate().filter(|&(i, &v)| i != v).count() as f64
    }

    impl VnsProblem for PermSort {
        type Solution = Vec<usize>;

        fn cost(&self, perm: &Vec<usize>) -> f64 {
            misplaced(perm)
        }

        fn neighborhood_count(&self) -> usize {
            3
        }

        fn shake<R: Rng>(&self, perm: &Vec<usize>, k: usize, rng: &mut R) -> Vec<usize> {
            let mut next = perm.clone();
            for _ in 0..=k {
                let i = rng.random_range(0..self.n);
                let j = rng.random_range(0..self.n);
                next.swap(i, j);
            }
            next
        }

        fn local_search(&self, perm: &Vec<usize>) -> Vec<usize> {
            let mut current = perm.clone();
            'outer: loop {
                let cost = misplaced(&current);
                for i in 0..self.n {
                    for j in (i + 1)..self.n {
                        current.swap(i, j);
                        if misplaced(&current) < cost {
                            continue 'outer;
                        }
                        current.swap(i, j);
                    }
                }
                break;
            }
            current
        }
    }

    #[test]
    fn test_vns_quadratic_finds_optimum() {
        let config = VnsConfig::default().with_max_iterations(50).with_seed(42);
        let result = VnsRunner::run(&DiscreteQuadratic, -40, &config);
        assert_eq!(result.best, 10, "expected optimum at x=10, got {}", result.best);
        assert!(result.improvements >= 1);
    }

    #[test]
    fn test_vns_cost_history_non_increasing() {
        let config = VnsConfig::default().with_max_iterations(30).with_seed(7);
        let result = VnsRunner::run(&PermSort { n: 8 }, vec![7, 6, 5, 4, 3, 2, 1, 0], &config);

        assert_eq!(result.cost_history.len(), 30);
        for window in result.cost_history.windows(2) {
            assert!(
                window[1] <= window[0],
                "best cost history should be non-increasing: {} > {}",
                window[1],
                window[0]
            );
        }
    }

    #[test]
    fn test_vns_permutation_sort() {
        let config = VnsConfig::default().with_max_iterations(100).with_seed(42);
        let result = VnsRunner::run(&PermSort { n: 8 }, vec![3, 1, 0, 2, 7, 5, 6, 4], &config);
        assert!(
            result.best_cost < 1e-10,
            "expected sorted permutation (cost 0), got cost {}",
            result.best_cost
        );
    }

    #[test]
    fn test_vns_never_worse_than_initial() {
        let config = VnsConfig::default().with_max_iterations(5).with_seed(3);
        let result = VnsRunner::run(&DiscreteQuadratic, 10, &config);
        assert_eq!(result.best, 10);
        assert_eq!(result.improvements, 0);
        assert_eq!(result.best_cost, 0.0);
    }

    #[test]
    fn test_vns_zero_neighborhoods_returns_initial() {
        let config = VnsConfig::default().with_max_neighborhoods(0);
        let result = VnsRunner::run(&DiscreteQuadratic, 4, &config);
        assert_eq!(result.best, 4);
        assert_eq!(result.iterations, 0);
        assert!(result.cost_history.is_empty());
    }

    #[test]
    fn test_vns_improve_uses_caller_rng() {
        let config = VnsConfig::default().with_max_iterations(20);
        let mut a = u_numflow::random::create_rng(5);
        let mut b = u_numflow::random::create_rng(5);
        let first = VnsRunner::improve(&PermSort { n: 6 }, vec![5, 4, 3, 2, 1, 0], &config, &mut a);
        let second = VnsRunner::improve(&PermSort { n: 6 }, vec![5, 4, 3, 2, 1, 0], &config, &mut b);
        assert_eq!(first.best, second.best);
        assert_eq!(first.cost_history, second.cost_history);
    }
}
