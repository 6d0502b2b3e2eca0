//! Neighborhood search configuration.

/// Configuration for [`VnsRunner`](super::VnsRunner) and
/// [`PickingVns`](super::PickingVns).
///
/// # Examples
///
/// ```
/// use u_picking::vns::VnsConfig;
///
/// let config = VnsConfig::default()
///     .with_max_iterations(60)
///     .with_max_local_passes(10);
/// assert_eq!(config.max_iterations, 60);
/// assert_eq!(config.max_neighborhoods, 3);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VnsConfig {
    /// Number of shake + local search rounds.
    pub max_iterations: usize,
    /// Upper bound on the neighborhoods cycled through; the problem may
    /// offer fewer.
    pub max_neighborhoods: usize,
    /// Maximum improving passes per local search.
    pub max_local_passes: usize,
    /// Random seed for [`VnsRunner::run`](super::VnsRunner::run)
    /// (None for default seed).
    pub seed: Option<u64>,
}

impl Default for VnsConfig {
    fn default() -> Self {
        Self {
            max_iterations: 30,
            max_neighborhoods: 3,
            max_local_passes: 20,
            seed: None,
        }
    }
}

impl VnsConfig {
    /// Sets the number of rounds.
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    /// Sets the neighborhood bound.
    pub fn with_max_neighborhoods(mut self, k: usize) -> Self {
        self.max_neighborhoods = k;
        self
    }

    /// Sets the local search pass limit.
    pub fn with_max_local_passes(mut self, n: usize) -> Self {
        self.max_local_passes = n;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_neighborhoods == 0 {
            return Err("max_neighborhoods must be at least 1".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = VnsConfig::default();
        assert_eq!(config.max_iterations, 30);
        assert_eq!(config.max_neighborhoods, 3);
        assert_eq!(config.max_local_passes, 20);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_validate_rejects_zero_neighborhoods() {
        assert!(VnsConfig::default().with_max_neighborhoods(0).validate().is_err());
        assert!(VnsConfig::default().with_max_iterations(0).validate().is_ok());
    }
}
