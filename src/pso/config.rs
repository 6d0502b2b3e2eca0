//! Particle swarm configuration.

use crate::solution::EvictionPolicy;

/// Configuration for the discrete particle swarm optimizer.
///
/// The coefficients keep their continuous-PSO names but act as
/// probabilities on route splicing: each route entry is perturbed with
/// probability `1 - inertia_weight`, pulling from the personal best with
/// probability `cognitive` and from the global best with probability
/// `social` (values ≥ 1 always pull).
///
/// # Examples
///
/// ```
/// use u_picking::pso::SwarmConfig;
///
/// let config = SwarmConfig::default()
///     .with_swarm_size(12)
///     .with_max_iterations(40)
///     .with_seed(7);
/// assert_eq!(config.swarm_size, 12);
/// assert_eq!(config.vns_interval, 5);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SwarmConfig {
    /// Number of particles.
    pub swarm_size: usize,
    /// Number of iterations; the swarm never stops early.
    pub max_iterations: usize,
    /// Probability of leaving a route entry untouched.
    pub inertia_weight: f64,
    /// Probability of pulling an item from the personal best.
    pub cognitive: f64,
    /// Probability of pulling an item from the global best.
    pub social: f64,
    /// Run neighborhood search on the global best every `vns_interval`
    /// iterations, starting with iteration 0. Zero disables it.
    pub vns_interval: usize,
    /// Which robot gives up an item during completeness repair.
    pub eviction: EvictionPolicy,
    /// Evaluate particles in parallel (requires the `parallel` feature).
    pub parallel: bool,
    /// Random seed (None for default seed).
    pub seed: Option<u64>,
}

impl Default for SwarmConfig {
    fn default() -> Self {
        Self {
            swarm_size: 30,
            max_iterations: 100,
            inertia_weight: 0.7,
            cognitive: 1.5,
            social: 1.5,
            vns_interval: 5,
            eviction: EvictionPolicy::default(),
            parallel: false,
            seed: None,
        }
    }
}

impl SwarmConfig {
    /// Sets the number of particles.
    pub fn with_swarm_size(mut self, n: usize) -> Self {
        self.swarm_size = n;
        self
    }

    /// Sets the number of iterations.
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    /// Sets the inertia weight.
    pub fn with_inertia_weight(mut self, w: f64) -> Self {
        self.inertia_weight = w;
        self
    }

    /// Sets the cognitive coefficient.
    pub fn with_cognitive(mut self, c: f64) -> Self {
        self.cognitive = c;
        self
    }

    /// Sets the social coefficient.
    pub fn with_social(mut self, c: f64) -> Self {
        self.social = c;
        self
    }

    /// Sets how often the global best is refined by neighborhood search.
    pub fn with_vns_interval(mut self, n: usize) -> Self {
        self.vns_interval = n;
        self
    }

    /// Sets the eviction policy used during repair.
    pub fn with_eviction(mut self, policy: EvictionPolicy) -> Self {
        self.eviction = policy;
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.swarm_size == 0 {
            return Err("swarm_size must be at least 1".into());
        }
        if !(0.0..=1.0).contains(&self.inertia_weight) {
            return Err("inertia_weight must be in [0, 1]".into());
        }
        if !(self.cognitive >= 0.0 && self.cognitive.is_finite()) {
            return Err("cognitive must be a non-negative number".into());
        }
        if !(self.social >= 0.0 && self.social.is_finite()) {
            return Err("social must be a non-negative number".into());
        }
        Ok(())
    }
}
