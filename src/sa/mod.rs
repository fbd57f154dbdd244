//! Simulated Annealing (SA).
//!
//! A single-solution trajectory metaheuristic inspired by the physical
//! annealing process. Accepts worsening moves with a probability that
//! decreases over time (temperature), allowing the search to escape
//! local optima.
//!
//! One run of [`SaRunner`] is one refinement *pass*: it owns its working
//! solution and its random source, and returns the best solution it saw.
//! Nothing is shared between passes, so any number of them can run side by
//! side.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Cerny (1985), "Thermodynamical Approach to the Travelling Salesman Problem"

mod config;
mod runner;
mod types;

pub use config::{SaConfig, MAX_ITERATIONS};
pub use runner::{SaResult, SaRunner};
pub use types::AnnealingProblem;
