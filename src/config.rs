//! Caller-facing run configuration.

use crate::baseline::BaselineConfig;
use crate::sa::{SaConfig, MAX_ITERATIONS};
use serde::{Deserialize, Serialize};

/// Whether refinement passes run after the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunMode {
    /// Return the baseline tour directly.
    BaselineOnly,
    /// Run annealing passes seeded from the baseline.
    #[default]
    Refine,
}

/// Configuration of one optimization request.
///
/// - `passes`: more passes, better tours, linear cost in worker time.
/// - `iterations_per_pass`: longer passes explore deeper.
/// - `worker_count`: cap on passes running at the same time.
/// - `initial_temperature` / `cooling_rate`: how readily worsening moves are
///   accepted early versus late.
/// - `max_hop_distance`: ceiling for any leg that is not a free edge.
/// - `seed`: base seed for pass random sources; random when absent.
/// - `round_trip`: return to the start node at the end.
///
/// # Examples
///
/// ```
/// use u_itinerary::config::{RunConfig, RunMode};
///
/// let config = RunConfig::default()
///     .with_passes(8)
///     .with_worker_count(4)
///     .with_max_hop_distance(12.5)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.mode, RunMode::Refine);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RunConfig {
    pub passes: usize,
    pub iterations_per_pass: usize,
    pub worker_count: usize,
    pub initial_temperature: f64,
    pub cooling_rate: f64,
    pub max_hop_distance: f64,
    pub mode: RunMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub round_trip: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            passes: 4,
            iterations_per_pass: 20_000,
            worker_count: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            initial_temperature: 10.0,
            cooling_rate: 0.9995,
            max_hop_distance: 10.0,
            mode: RunMode::Refine,
            seed: None,
            round_trip: false,
        }
    }
}

impl RunConfig {
    pub fn with_passes(mut self, n: usize) -> Self {
        self.passes = n;
        self
    }

    pub fn with_iterations_per_pass(mut self, n: usize) -> Self {
        self.iterations_per_pass = n;
        self
    }

    pub fn with_worker_count(mut self, n: usize) -> Self {
        self.worker_count = n;
        self
    }

    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_cooling_rate(mut self, rate: f64) -> Self {
        self.cooling_rate = rate;
        self
    }

    pub fn with_max_hop_distance(mut self, distance: f64) -> Self {
        self.max_hop_distance = distance;
        self
    }

    pub fn with_mode(mut self, mode: RunMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_round_trip(mut self, round_trip: bool) -> Self {
        self.round_trip = round_trip;
        self
    }

    /// Annealing parameters for a single pass.
    ///
    /// The acceptance floor stays below the initial temperature however
    /// small that is.
    pub fn sa_config(&self) -> SaConfig {
        let defaults = SaConfig::default();
        let floor = defaults.min_temperature.min(self.initial_temperature * 0.5);
        defaults
            .with_initial_temperature(self.initial_temperature)
            .with_min_temperature(floor)
            .with_cooling_rate(self.cooling_rate)
            .with_iterations(self.iterations_per_pass)
            .with_history_interval((self.iterations_per_pass / 20).max(1))
    }

    pub fn baseline_config(&self) -> BaselineConfig {
        BaselineConfig::default()
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.iterations_per_pass == 0 || self.iterations_per_pass > MAX_ITERATIONS {
            return Err(format!(
                "iterationsPerPass must be in 1..={MAX_ITERATIONS}, got {}",
                self.iterations_per_pass
            ));
        }
        if self.worker_count == 0 {
            return Err("workerCount must be at least 1".into());
        }
        if !(self.initial_temperature.is_finite() && self.initial_temperature > 0.0) {
            return Err(format!(
                "initialTemperature must be positive and finite, got {}",
                self.initial_temperature
            ));
        }
        if !(self.cooling_rate > 0.0 && self.cooling_rate < 1.0) {
            return Err(format!(
                "coolingRate must be in (0, 1), got {}",
                self.cooling_rate
            ));
        }
        if !(self.max_hop_distance.is_finite() && self.max_hop_distance > 0.0) {
            return Err(format!(
                "maxHopDistance must be positive and finite, got {}",
                self.max_hop_distance
            ));
        }
        match self.mode {
            RunMode::BaselineOnly => Ok(()),
            RunMode::Refine => self.sa_config().validate(),
        }
    }
}
