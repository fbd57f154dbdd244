//! Baseline configuration.

/// Configuration for [`BaselineBuilder`](super::BaselineBuilder).
///
/// # Examples
///
/// ```
/// use u_itinerary::baseline::BaselineConfig;
///
/// let config = BaselineConfig::default().with_move_cap_factor(2);
/// assert_eq!(config.move_cap(10), 200);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BaselineConfig {
    /// Local search applies at most `move_cap_factor * n^2` improving moves.
    pub move_cap_factor: usize,

    /// A move counts as improving only if it saves more than this.
    pub min_improvement: f64,

    /// Skip local search and return the raw greedy tour.
    pub construction_only: bool,
}

impl Default for BaselineConfig {
    fn default() -> Self {
        Self {
            move_cap_factor: 1,
            min_improvement: 1e-9,
            construction_only: false,
        }
    }
}

impl BaselineConfig {
    pub fn with_move_cap_factor(mut self, factor: usize) -> Self {
        self.move_cap_factor = factor;
        self
    }

    pub fn with_min_improvement(mut self, eps: f64) -> Self {
        self.min_improvement = eps;
        self
    }

    pub fn with_construction_only(mut self, only: bool) -> Self {
        self.construction_only = only;
        self
    }

    /// Improving-move budget for a tour of `n` nodes.
    pub fn move_cap(&self, n: usize) -> usize {
        self.move_cap_factor.saturating_mul(n.saturating_mul(n))
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.min_improvement.is_finite() && self.min_improvement >= 0.0) {
            return Err(format!(
                "min_improvement must be non-negative, got {}",
                self.min_improvement
            ));
        }
        Ok(())
    }
}
