//! SA configuration.

/// Upper bound on iterations for a single run.
pub const MAX_ITERATIONS: usize = 100_000_000;

/// Configuration for one Simulated Annealing run.
///
/// Cooling is geometric: `T_{k+1} = cooling_rate * T_k`, applied after every
/// iteration. Once `T` falls below `min_temperature` the run keeps going but
/// rejects every worsening move.
///
/// # Examples
///
/// ```
/// use u_itinerary::sa::SaConfig;
///
/// let config = SaConfig::default()
///     .with_initial_temperature(50.0)
///     .with_cooling_rate(0.999)
///     .with_iterations(10_000);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SaConfig {
    /// Initial temperature. Higher values allow more exploration.
    pub initial_temperature: f64,

    /// Geometric cooling factor in (0, 1). Higher = slower cooling.
    pub cooling_rate: f64,

    /// Below this temperature worsening moves are never accepted.
    pub min_temperature: f64,

    /// Exact number of iterations (move proposals) per run.
    pub iterations: usize,

    /// Sample the best cost into `cost_history` every this many iterations.
    pub history_interval: usize,
}

impl Default for SaConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 10.0,
            cooling_rate: 0.9995,
            min_temperature: 1e-9,
            iterations: 20_000,
            history_interval: 1_000,
        }
    }
}

impl SaConfig {
    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_cooling_rate(mut self, rate: f64) -> Self {
        self.cooling_rate = rate;
        self
    }

    pub fn with_min_temperature(mut self, t: f64) -> Self {
        self.min_temperature = t;
        self
    }

    pub fn with_iterations(mut self, n: usize) -> Self {
        self.iterations = n;
        self
    }

    pub fn with_history_interval(mut self, n: usize) -> Self {
        self.history_interval = n;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.initial_temperature.is_finite() && self.initial_temperature > 0.0) {
            return Err(format!(
                "initial_temperature must be positive and finite, got {}",
                self.initial_temperature
            ));
        }
        if !(self.cooling_rate > 0.0 && self.cooling_rate < 1.0) {
            return Err(format!(
                "cooling_rate must be in (0, 1), got {}",
                self.cooling_rate
            ));
        }
        if !(self.min_temperature >= 0.0 && self.min_temperature < self.initial_temperature) {
            return Err("min_temperature must be in [0, initial_temperature)".into());
        }
        if self.iterations == 0 || self.iterations > MAX_ITERATIONS {
            return Err(format!(
                "iterations must be in 1..={MAX_ITERATIONS}, got {}",
                self.iterations
            ));
        }
        if self.history_interval == 0 {
            return Err("history_interval must be positive".into());
        }
        Ok(())
    }
}
