//! Request pipeline and background jobs.

use crate::aggregate::{ResultAggregator, RouteExporter, RouteResult};
use crate::baseline::BaselineBuilder;
use crate::config::RunMode;
use crate::coordinator::{CancelToken, PassCoordinator};
use crate::cost::{PrunedIndex, ReducedCostIndex};
use crate::distance::DistanceModel;
use crate::error::{Result, RouteError};
use crate::protocol::{RouteRequestMessage, RouteResponse};
use crate::tour::SearchSpace;
use log::{debug, info, warn};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Entry point: turns route requests into route responses.
///
/// Each request builds its own graph and cost index and drops them on
/// completion, so one `Optimizer` can serve concurrent requests.
///
/// # Examples
///
/// ```
/// use u_itinerary::config::{RunConfig, RunMode};
/// use u_itinerary::coordinator::CancelToken;
/// use u_itinerary::distance::Position;
/// use u_itinerary::graph::Node;
/// use u_itinerary::protocol::{RouteRequestMessage, Selection};
/// use u_itinerary::Optimizer;
///
/// let nodes = vec![
///     Node::new(1, "A", Position::new(0.0, 0.0, 0.0)),
///     Node::new(2, "B", Position::new(5.0, 0.0, 0.0)),
/// ];
/// let request = RouteRequestMessage::new(nodes, vec![], Selection::point_to_point(1, 2))
///     .with_config(RunConfig::default().with_mode(RunMode::BaselineOnly));
///
/// let response = Optimizer::new().solve(&request, &CancelToken::new());
/// let result = response.result().unwrap();
/// assert_eq!(result.ordered_node_ids, vec![1, 2]);
/// assert_eq!(result.total_cost_canonical, 5.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Optimizer {
    model: DistanceModel,
}

impl Optimizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_distance_model(mut self, model: DistanceModel) -> Self {
        self.model = model;
        self
    }

    /// Runs `request` to completion on the calling thread.
    pub fn solve(&self, request: &RouteRequestMessage, cancel: &CancelToken) -> RouteResponse {
        let id = request.correlation_id.as_str();
        match self.optimize(request, cancel) {
            Ok(Some(result)) => RouteResponse::ok(id, result),
            Ok(None) => {
                info!("request {id:?}: cancelled");
                RouteResponse::cancelled(id)
            }
            Err(e) => {
                warn!("request {id:?}: {e}");
                RouteResponse::error(id, &e)
            }
        }
    }

    /// Runs `request` on a background thread.
    pub fn submit(&self, request: RouteRequestMessage) -> RouteJob {
        let cancel = CancelToken::new();
        let (tx, rx) = mpsc::channel();
        let correlation_id = request.correlation_id.clone();
        let optimizer = self.clone();
        let token = cancel.clone();

        let spawned = thread::Builder::new()
            .name("itinerary-job".into())
            .spawn(move || {
                let response = optimizer.solve(&request, &token);
                // Nobody is listening once the job handle is dropped.
                let _ = tx.send(response);
            });
        let immediate = spawned.err().map(|e| {
            RouteResponse::error(
                correlation_id.as_str(),
                &RouteError::WorkerPool(format!("cannot start job thread: {e}")),
            )
        });

        RouteJob {
            correlation_id,
            cancel,
            rx,
            response: immediate,
        }
    }

    /// The full pipeline. `Ok(None)` means the request was cancelled.
    pub fn optimize(
        &self,
        request: &RouteRequestMessage,
        cancel: &CancelToken,
    ) -> Result<Option<RouteResult>> {
        let started = Instant::now();
        request.validate()?;
        self.model.validate().map_err(RouteError::InvalidRequest)?;
        let config = &request.config;
        if cancel.is_cancelled() {
            return Ok(None);
        }

        let graph = request.graph(&self.model)?;
        debug!(
            "route graph: {} nodes, {} free edges",
            graph.len(),
            graph.edge_count()
        );
        let selection = request.selection.resolve(&graph)?;
        let index =
            ReducedCostIndex::build(&graph, &selection.node_ids, config.max_hop_distance)?;
        debug!(
            "cost index over {} nodes (max hop {}) built in {:?}",
            index.len(),
            index.max_hop_distance(),
            started.elapsed()
        );

        let PrunedIndex { index, excluded } =
            index.prune_unreachable(selection.start, selection.end)?;
        let space = SearchSpace::new(index, selection.start, selection.end, config.round_trip)?;

        let baseline = BaselineBuilder::build(space, &config.baseline_config())?;
        debug!(
            "baseline cost {:.6} over {} nodes ({} unreachable, {} unplaceable) after {:?}",
            baseline.tour.cost(),
            baseline.tour.len(),
            excluded.len(),
            baseline.unplaced.len(),
            started.elapsed()
        );
        if cancel.is_cancelled() {
            return Ok(None);
        }

        let space = Arc::new(baseline.space);
        let champions = if config.mode == RunMode::Refine && config.passes > 0 {
            let seed = config.seed.unwrap_or_else(rand::random);
            debug!("refining with base seed {seed}");
            let report = PassCoordinator::new().run(
                Arc::clone(&space),
                &baseline.tour,
                config,
                seed,
                cancel,
            )?;
            if report.cancelled {
                return Ok(None);
            }
            if !report.failures.is_empty() {
                warn!(
                    "{} of {} passes failed",
                    report.failures.len(),
                    config.passes
                );
            }
            report.champions
        } else {
            Vec::new()
        };

        let chosen = ResultAggregator::select(&space, baseline.tour, champions);
        let result =
            RouteExporter::new(self.model).export(&space, &chosen, excluded, baseline.unplaced);
        info!(
            "route over {} nodes: cost {:.6} ({} hops, {} free) in {:?}",
            result.ordered_node_ids.len(),
            result.total_cost_canonical,
            result.hop_edge_count,
            result.free_edge_count,
            started.elapsed()
        );
        Ok(Some(result))
    }
}

/// Handle to a request running in the background.
#[derive(Debug)]
pub struct RouteJob {
    correlation_id: String,
    cancel: CancelToken,
    rx: Receiver<RouteResponse>,
    response: Option<RouteResponse>,
}

impl RouteJob {
    pub fn correlation_id(&self) -> &str {
        &self.correlation_id
    }

    /// Requests cancellation. The job answers `cancelled` unless it already
    /// finished.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    /// The response, if the job has finished. Never blocks.
    pub fn try_response(&mut self) -> Option<&RouteResponse> {
        if self.response.is_none() {
            match self.rx.try_recv() {
                Ok(response) => self.response = Some(response),
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => self.response = Some(self.lost()),
            }
        }
        self.response.as_ref()
    }

    /// Blocks until the job finishes.
    pub fn wait(self) -> RouteResponse {
        if let Some(response) = self.response {
            return response;
        }
        match self.rx.recv() {
            Ok(response) => response,
            Err(_) => lost(&self.correlation_id),
        }
    }

    /// Blocks for at most `timeout`, then cancels and reports `cancelled`.
    pub fn wait_timeout(self, timeout: Duration) -> RouteResponse {
        if let Some(response) = self.response {
            return response;
        }
        match self.rx.recv_timeout(timeout) {
            Ok(response) => response,
            Err(RecvTimeoutError::Timeout) => {
                self.cancel.cancel();
                RouteResponse::cancelled(self.correlation_id)
            }
            Err(RecvTimeoutError::Disconnected) => lost(&self.correlation_id),
        }
    }

    fn lost(&self) -> RouteResponse {
        lost(&self.correlation_id)
    }
}

fn lost(correlation_id: &str) -> RouteResponse {
    RouteResponse::error(
        correlation_id,
        &RouteError::WorkerPool("job thread exited without a response".into()),
    )
}
