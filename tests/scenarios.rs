//! End-to-end scenarios through the public API.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use u_itinerary::baseline::BaselineBuilder;
use u_itinerary::config::{RunConfig, RunMode};
use u_itinerary::coordinator::{CancelToken, PassCoordinator};
use u_itinerary::cost::{LegKind, ReducedCostIndex, FREE_EDGE_COST};
use u_itinerary::distance::{DistanceModel, Position};
use u_itinerary::graph::{FreeEdge, Node, NodeId, RouteGraph};
use u_itinerary::protocol::{PositionUnits, RouteRequestMessage, RouteResponse, Selection};
use u_itinerary::tour::SearchSpace;
use u_itinerary::Optimizer;

fn node(id: NodeId, x: f64, y: f64) -> Node {
    Node::new(id, format!("N{id}"), Position::new(x, y, 0.0))
}

fn solve(request: &RouteRequestMessage) -> RouteResponse {
    Optimizer::new().solve(request, &CancelToken::new())
}

fn square() -> (Vec<Node>, Vec<FreeEdge>) {
    let nodes = vec![
        node(1, 0.0, 0.0),
        node(2, 10.0, 0.0),
        node(3, 10.0, 10.0),
        node(4, 0.0, 10.0),
    ];
    let mut edges = Vec::new();
    for a in 1..=4 {
        for b in a + 1..=4 {
            edges.push(FreeEdge::new(a, b));
        }
    }
    (nodes, edges)
}

#[test]
fn test_square_of_free_edges_open_path() {
    let (nodes, edges) = square();
    let request = RouteRequestMessage::new(nodes, edges, Selection::cover_set())
        .with_config(RunConfig::default().with_mode(RunMode::BaselineOnly));
    let result = solve(&request).into_result().unwrap();

    let mut visited = result.ordered_node_ids.clone();
    visited.sort_unstable();
    assert_eq!(visited, vec![1, 2, 3, 4]);
    assert_eq!(result.hop_edge_count, 0);
    assert_eq!(result.free_edge_count, 3);
    assert_eq!(result.total_cost_canonical, 3.0 * FREE_EDGE_COST);
    assert!(result.excluded_unreachable_node_ids.is_empty());
}

#[test]
fn test_square_of_free_edges_round_trip() {
    let (nodes, edges) = square();
    let request = RouteRequestMessage::new(nodes, edges, Selection::cover_set().with_start(1))
        .with_config(
            RunConfig::default()
                .with_mode(RunMode::BaselineOnly)
                .with_round_trip(true),
        );
    let result = solve(&request).into_result().unwrap();

    assert_eq!(result.ordered_node_ids[0], 1);
    assert_eq!(result.ordered_node_ids.len(), 4);
    assert_eq!(result.hop_edge_count, 0);
    assert_eq!(result.free_edge_count, 4);
    assert_eq!(result.total_cost_canonical, 4.0 * FREE_EDGE_COST);
    assert_eq!(result.legs.last().map(|l| l.to), Some(1));
}

#[test]
fn test_two_nodes_within_hop_range() {
    let request = RouteRequestMessage::new(
        vec![node(1, 0.0, 0.0), node(2, 5.0, 0.0)],
        vec![],
        Selection::point_to_point(1, 2),
    )
    .with_config(RunConfig::default().with_max_hop_distance(10.0));
    let result = solve(&request).into_result().unwrap();

    assert_eq!(result.ordered_node_ids, vec![1, 2]);
    assert_eq!(result.hop_edge_count, 1);
    assert_eq!(result.free_edge_count, 0);
    assert_eq!(result.total_cost_canonical, 5.0);
    assert_eq!(result.legs[0].kind, LegKind::Hop);
}

#[test]
fn test_two_nodes_out_of_hop_range() {
    let nodes = vec![node(1, 0.0, 0.0), node(2, 5.0, 0.0)];
    let config = RunConfig::default().with_max_hop_distance(3.0);

    let request = RouteRequestMessage::new(nodes.clone(), vec![], Selection::cover_set().with_start(1))
        .with_config(config.clone());
    let result = solve(&request).into_result().unwrap();
    assert_eq!(result.ordered_node_ids, vec![1]);
    assert_eq!(result.excluded_unreachable_node_ids, vec![2]);
    assert_eq!(result.total_cost_canonical, 0.0);

    // With both ends fixed there is nothing sensible to return.
    let request = RouteRequestMessage::new(nodes, vec![], Selection::point_to_point(1, 2))
        .with_config(config);
    match solve(&request) {
        RouteResponse::Error { error_kind, .. } => assert_eq!(error_kind, "endpoint-unreachable"),
        other => panic!("expected an error, got {other:?}"),
    }
}

#[test]
fn test_stranded_pair_is_routed_not_excluded() {
    // 3 only connects to the pinned start; 4 and 5 fit only as 1 -> 4 -> 5 -> 2.
    let nodes = vec![
        node(1, 0.0, 0.0),
        node(2, 1.0, 0.0),
        node(3, -0.5, 0.0),
        node(4, 0.0, -0.9),
        node(5, 0.9, -0.9),
    ];
    let request = RouteRequestMessage::new(nodes, vec![], Selection::point_to_point(1, 2))
        .with_config(RunConfig::default().with_max_hop_distance(1.0).with_seed(3));
    let result = solve(&request).into_result().unwrap();

    assert_eq!(result.ordered_node_ids, vec![1, 4, 5, 2]);
    assert!(result.excluded_unreachable_node_ids.is_empty());
    assert_eq!(result.excluded_unplaceable_node_ids, vec![3]);
    assert_eq!(result.hop_edge_count, 3);
}

#[test]
fn test_gate_chain_beats_short_hop() {
    // 1 -> 4 is a 9-unit hop; the gates 1-2-3-4 cost three free edges.
    let nodes = vec![
        node(1, 0.0, 0.0),
        node(2, 0.0, 30.0),
        node(3, 9.0, 30.0),
        node(4, 9.0, 0.0),
    ];
    let edges = vec![FreeEdge::new(1, 2), FreeEdge::new(2, 3), FreeEdge::new(3, 4)];
    let request = RouteRequestMessage::new(nodes, edges, Selection::point_to_point(1, 4))
        .with_config(RunConfig::default().with_max_hop_distance(10.0).with_seed(8));
    let result = solve(&request).into_result().unwrap();

    assert_eq!(result.ordered_node_ids, vec![1, 2, 3, 4]);
    assert_eq!(result.free_edge_count, 3);
    assert_eq!(result.hop_edge_count, 0);
    assert!(result.legs.iter().all(|leg| leg.jumps == 1));
    assert_eq!(result.total_cost_canonical, 3.0 * FREE_EDGE_COST);
}

fn random_instance(n: u64, seed: u64) -> Vec<Node> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..n)
        .map(|id| node(id, rng.random_range(0.0..20.0), rng.random_range(0.0..20.0)))
        .collect()
}

#[test]
fn test_passes_never_worse_than_their_start() {
    let graph = RouteGraph::new(random_instance(20, 5), &[]).unwrap();
    let ids: Vec<NodeId> = (0..20).collect();
    let pruned = ReducedCostIndex::build(&graph, &ids, 10.0)
        .unwrap()
        .prune_unreachable(Some(0), None)
        .unwrap();
    let space = SearchSpace::new(pruned.index, Some(0), None, false).unwrap();
    let baseline = BaselineBuilder::build(space, &Default::default()).unwrap();

    let config = RunConfig::default()
        .with_passes(3)
        .with_iterations_per_pass(100)
        .with_worker_count(3);
    let space = Arc::new(baseline.space);
    let report = PassCoordinator::new()
        .run(Arc::clone(&space), &baseline.tour, &config, 2024, &CancelToken::new())
        .unwrap();

    assert_eq!(report.champions.len(), 3);
    for champion in &report.champions {
        assert_eq!(champion.start_cost, baseline.tour.cost());
        assert!(champion.tour.cost() <= baseline.tour.cost());
        assert_eq!(champion.tour.order()[0], baseline.tour.order()[0]);
    }
}

#[test]
fn test_refinement_on_random_instance_is_reproducible() {
    let request = RouteRequestMessage::new(random_instance(20, 9), vec![], Selection::cover_set())
        .with_config(
            RunConfig::default()
                .with_passes(3)
                .with_iterations_per_pass(100)
                .with_max_hop_distance(10.0)
                .with_seed(17),
        );
    let a = solve(&request);
    let b = solve(&request.clone().with_config(request.config.clone().with_worker_count(1)));
    assert_eq!(a.status(), "ok");
    assert_eq!(a, b);
}

#[test]
fn test_json_round_trip_through_optimizer() {
    let json = r#"{
        "correlationId": "trip-42",
        "nodes": [
            {"id": 10, "name": "Home", "position": {"x": 0, "y": 0, "z": 0}},
            {"id": 11, "name": "Gate", "position": {"x": 40, "y": 0, "z": 0}},
            {"id": 12, "name": "Moon", "position": {"x": 43, "y": 4, "z": 0}}
        ],
        "freeEdges": [{"nodeA": 10, "nodeB": 11}],
        "selection": {"mode": "point-to-point", "start": 10, "end": 12},
        "config": {"passes": 2, "iterationsPerPass": 50, "workerCount": 2, "seed": 3}
    }"#;
    let request = RouteRequestMessage::from_json(json).unwrap();
    let response = solve(&request);
    let value: serde_json::Value = serde_json::from_str(&response.to_json().unwrap()).unwrap();

    assert_eq!(value["status"], "ok");
    assert_eq!(value["correlationId"], "trip-42");
    assert_eq!(value["result"]["orderedNodeIds"], serde_json::json!([10, 11, 12]));
    assert_eq!(value["result"]["hopEdgeCount"], 1);
    assert_eq!(value["result"]["freeEdgeCount"], 1);
    let total = value["result"]["totalCostCanonical"].as_f64().unwrap();
    assert!((total - (FREE_EDGE_COST + 5.0)).abs() < 1e-12);
}

#[test]
fn test_raw_positions_are_converted() {
    let model = DistanceModel::default();
    let nodes = vec![
        Node::new(1, "A", Position::new(0.0, 0.0, 0.0)),
        Node::new(2, "B", Position::new(6e15, 8e15, 0.0)),
    ];
    let request = RouteRequestMessage::new(nodes, vec![], Selection::point_to_point(1, 2))
        .with_position_units(PositionUnits::Raw)
        .with_config(RunConfig::default().with_mode(RunMode::BaselineOnly));
    let result = Optimizer::new()
        .with_distance_model(model)
        .solve(&request, &CancelToken::new())
        .into_result()
        .unwrap();
    assert!((result.total_cost_canonical - 10.0).abs() < 1e-12);
    assert!((result.total_cost_display_units - model.to_display(10.0)).abs() < 1e-12);
}

fn heavy_request() -> RouteRequestMessage {
    RouteRequestMessage::new(random_instance(60, 1), vec![], Selection::cover_set())
        .with_correlation_id("heavy")
        .with_config(
            RunConfig::default()
                .with_passes(64)
                .with_iterations_per_pass(5_000_000)
                .with_worker_count(1)
                .with_max_hop_distance(30.0),
        )
}

#[test]
fn test_cancelled_job_reports_cancelled() {
    let job = Optimizer::new().submit(heavy_request());
    thread::sleep(Duration::from_millis(50));
    job.cancel();
    let response = job.wait();
    assert_eq!(response, RouteResponse::cancelled("heavy"));
}

#[test]
fn test_wait_timeout_cancels() {
    let job = Optimizer::new().submit(heavy_request());
    let token = job.cancel_token().clone();
    let response = job.wait_timeout(Duration::from_millis(20));
    assert_eq!(response.status(), "cancelled");
    assert!(token.is_cancelled());
}

#[test]
fn test_malformed_message_is_typed() {
    let err = RouteRequestMessage::from_json("{\"correlationId\": 1").unwrap_err();
    let response = RouteResponse::error("", &err);
    match response {
        RouteResponse::Error { error_kind, .. } => assert_eq!(error_kind, "malformed-message"),
        other => panic!("expected an error, got {other:?}"),
    }
}
