//! Pass dispatch and reply collection.

use super::cancel::CancelToken;
use super::executor::{AnnealingExecutor, PassExecutor};
use super::messages::{derive_pass_seed, Champion, CorrelationId, PassRequest, PassResponse};
use crate::config::RunConfig;
use crate::error::{Result, RouteError};
use crate::tour::{SearchSpace, Tour};
use log::{debug, warn};
use std::any::Any;
use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::time::Duration;

/// How often the collector wakes up to check for cancellation.
const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Upper bound on pool threads when the host parallelism is unknown.
const FALLBACK_WORKERS: usize = 4;

/// Outcome of one coordinator run.
#[derive(Debug, Default)]
pub struct CoordinatorReport {
    /// Champions of passes that finished, ordered by pass index.
    pub champions: Vec<Champion>,
    /// One [`RouteError::PassFailure`] per failed pass.
    pub failures: Vec<RouteError>,
    /// Passes that never reported because the run was cancelled.
    pub abandoned: usize,
    pub cancelled: bool,
}

/// Runs refinement passes on a bounded worker pool.
///
/// At most `worker_count` passes are in flight at any moment, further capped
/// by the host's available parallelism; a new pass is dispatched each time
/// one reports back.
#[derive(Debug, Clone)]
pub struct PassCoordinator<E = AnnealingExecutor> {
    executor: Arc<E>,
}

impl Default for PassCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl PassCoordinator {
    pub fn new() -> Self {
        Self::with_executor(AnnealingExecutor)
    }
}

impl<E: PassExecutor> PassCoordinator<E> {
    pub fn with_executor(executor: E) -> Self {
        Self {
            executor: Arc::new(executor),
        }
    }

    /// Runs `config.passes` passes from `start` and collects their champions.
    ///
    /// Pass `k` draws from a random source seeded with
    /// [`derive_pass_seed`]`(base_seed, k)`, so a fixed base seed reproduces
    /// every champion regardless of scheduling.
    pub fn run(
        &self,
        space: Arc<SearchSpace>,
        start: &Tour,
        config: &RunConfig,
        base_seed: u64,
        cancel: &CancelToken,
    ) -> Result<CoordinatorReport> {
        config.validate().map_err(RouteError::InvalidRequest)?;
        let passes = config.passes;
        let mut report = CoordinatorReport::default();
        if passes == 0 {
            return Ok(report);
        }
        if cancel.is_cancelled() {
            report.cancelled = true;
            report.abandoned = passes;
            return Ok(report);
        }

        let workers = pool_size(config.worker_count, passes);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("itinerary-pass-{i}"))
            .build()
            .map_err(|e| RouteError::WorkerPool(e.to_string()))?;

        // Each run owns its reply channel, so replies of other runs never
        // arrive here and late replies die with the receiver.
        let run = base_seed;
        let sa_config = config.sa_config();
        let start = Arc::new(start.order().to_vec());
        let (tx, rx) = mpsc::channel::<PassResponse>();
        let mut in_flight: HashSet<usize> = HashSet::with_capacity(workers);
        let mut next_pass = 0usize;

        debug!("run {run:016x}: {passes} passes on {workers} workers");

        loop {
            while !cancel.is_cancelled() && next_pass < passes && in_flight.len() < workers {
                let request = PassRequest {
                    correlation: CorrelationId {
                        run,
                        pass: next_pass,
                    },
                    space: Arc::clone(&space),
                    start: Arc::clone(&start),
                    config: sa_config.clone(),
                    seed: derive_pass_seed(base_seed, next_pass),
                };
                let executor = Arc::clone(&self.executor);
                let reply = tx.clone();
                pool.spawn(move || {
                    let response = execute_contained(executor.as_ref(), request);
                    // The collector is gone once the run was cancelled.
                    let _ = reply.send(response);
                });
                in_flight.insert(next_pass);
                next_pass += 1;
            }

            if cancel.is_cancelled() {
                report.cancelled = true;
                report.abandoned = in_flight.len() + (passes - next_pass);
                debug!(
                    "run {run:016x}: cancelled with {} champions, {} passes abandoned",
                    report.champions.len(),
                    report.abandoned
                );
                break;
            }
            if in_flight.is_empty() {
                break;
            }

            let response = match rx.recv_timeout(POLL_INTERVAL) {
                Ok(response) => response,
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(RouteError::WorkerPool("reply channel closed".into()));
                }
            };

            let pass = response.correlation.pass;
            in_flight.remove(&pass);
            match response.outcome {
                Ok(champion) => {
                    debug!("run {run:016x}: pass {pass} finished at {}", champion.tour.cost());
                    report.champions.push(champion);
                }
                Err(message) => {
                    warn!("run {run:016x}: pass {pass} failed: {message}");
                    report.failures.push(RouteError::PassFailure { pass, message });
                }
            }
        }

        report.champions.sort_by_key(|c| c.pass);
        Ok(report)
    }
}

/// Threads for a run: no more than requested, than there are passes, or
/// than the host can run at once.
fn pool_size(requested: usize, passes: usize) -> usize {
    let host = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(FALLBACK_WORKERS);
    requested.min(passes).min(host).max(1)
}

/// Runs one pass, turning a panic into an ordinary failure.
fn execute_contained<E: PassExecutor>(executor: &E, request: PassRequest) -> PassResponse {
    let correlation = request.correlation;
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| executor.execute(&request)))
        .unwrap_or_else(|payload| Err(panic_message(payload.as_ref())));
    PassResponse {
        correlation,
        outcome,
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panicked: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panicked: {s}")
    } else {
        "panicked".into()
    }
}
