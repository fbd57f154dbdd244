//! Parallel refinement passes.
//!
//! [`PassCoordinator`] fans `passes` independent annealing runs out over a
//! fixed-size worker pool and gathers each pass's champion. Workers and the
//! coordinator talk only through [`PassRequest`] / [`PassResponse`] messages
//! tagged with a [`CorrelationId`]; the search space and starting tour are
//! shared read-only, and every pass owns its working tour and random source.
//!
//! # Failure and cancellation
//!
//! - A pass that fails or panics drops only its own champion.
//! - Cancellation is cooperative: once the [`CancelToken`] is set the
//!   coordinator dispatches nothing new and returns at once with the
//!   champions it already holds. Passes still running are left to finish;
//!   every run owns its reply channel, so their responses go nowhere.

mod cancel;
mod executor;
mod messages;
mod runner;

pub use cancel::CancelToken;
pub use executor::{AnnealingExecutor, PassExecutor};
pub use messages::{derive_pass_seed, Champion, CorrelationId, PassRequest, PassResponse};
pub use runner::{CoordinatorReport, PassCoordinator};
