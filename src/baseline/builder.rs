//! Nearest-neighbour construction and first-improvement local search.

use super::config::BaselineConfig;
use crate::cost::LegKind;
use crate::error::{Result, RouteError};
use crate::graph::NodeId;
use crate::tour::{SearchSpace, Tour, TourMove};

/// A feasible starting tour.
#[derive(Debug, Clone)]
pub struct Baseline {
    /// The search space the tour lives in. Narrower than the input space
    /// when construction had to drop nodes.
    pub space: SearchSpace,

    /// The improved tour.
    pub tour: Tour,

    /// Cost of the raw greedy tour, before local search.
    pub greedy_cost: f64,

    /// Improving moves applied by local search.
    pub improving_moves: usize,

    /// Connected nodes no feasible position could be found for, ascending.
    pub unplaced: Vec<NodeId>,
}

/// Builds the baseline tour.
pub struct BaselineBuilder;

impl BaselineBuilder {
    /// Constructs a tour covering every node of `space` that can be placed.
    ///
    /// 1. Nearest neighbour from the start: the cheapest connected unvisited
    ///    node is appended, free legs winning cost ties, then lower node id.
    ///    A pinned end is held back and appended last.
    /// 2. Nodes stranded by the greedy walk go in by cheapest feasible
    ///    insertion, or as a chain bridging two tour neighbours when no
    ///    single node fits; those neither can place are left out.
    /// 3. Local search applies the first improving 2-opt or relocation of
    ///    each scan until none is left or the move cap is reached.
    pub fn build(space: SearchSpace, config: &BaselineConfig) -> Result<Baseline> {
        config.validate().map_err(RouteError::InvalidRequest)?;
        if space.is_empty() {
            return Err(RouteError::invalid_request("nothing to route"));
        }

        let start = choose_start(&space);
        let (mut order, mut remaining) = nearest_neighbour(&space, start);
        attach_tail(&space, &mut order, &mut remaining)?;
        let stranded = insert_remaining(&space, &mut order, remaining);

        let mut unplaced: Vec<NodeId> = stranded
            .iter()
            .map(|&slot| space.index().node_id(slot))
            .collect();
        unplaced.sort_unstable();
        let (space, order) = if stranded.is_empty() {
            (space, order)
        } else {
            log::debug!("baseline: no feasible position for {unplaced:?}");
            narrow(&space, order)?
        };

        let greedy = space.evaluate(order);
        let greedy_cost = greedy.cost();
        let (tour, improving_moves) = if config.construction_only {
            (greedy, 0)
        } else {
            let mut order = greedy.order().to_vec();
            let moves = local_search(&space, &mut order, config);
            let improved = space.evaluate(order);
            if improved.cost() <= greedy_cost {
                (improved, moves)
            } else {
                (greedy, 0)
            }
        };

        log::debug!(
            "baseline: n={} greedy={greedy_cost:.6} improved={:.6} moves={improving_moves}",
            tour.len(),
            tour.cost()
        );

        Ok(Baseline {
            space,
            tour,
            greedy_cost,
            improving_moves,
            unplaced,
        })
    }
}

/// The pinned start, or else the node with the fewest connections (a
/// natural path endpoint), lowest id on ties.
fn choose_start(space: &SearchSpace) -> usize {
    if let Some(start) = space.start() {
        return start;
    }
    let index = space.index();
    (0..space.len())
        .filter(|&slot| space.len() == 1 || Some(slot) != space.end())
        .min_by_key(|&slot| (index.degree(slot), slot))
        .unwrap_or(0)
}

/// Greedy walk from `start`. Returns the walk and the unvisited slots
/// (the pinned end excluded).
fn nearest_neighbour(space: &SearchSpace, start: usize) -> (Vec<usize>, Vec<usize>) {
    let n = space.len();
    let index = space.index();
    let mut visited = vec![false; n];
    visited[start] = true;
    if let Some(end) = space.end() {
        visited[end] = true;
    }

    let mut order = Vec::with_capacity(n);
    order.push(start);
    let mut current = start;
    loop {
        let mut best: Option<(usize, f64, LegKind)> = None;
        for slot in 0..n {
            if visited[slot] {
                continue;
            }
            let Some(edge) = index.edge(current, slot) else {
                continue;
            };
            let better = match best {
                None => true,
                Some((_, cost, kind)) => {
                    edge.cost < cost
                        || (edge.cost == cost && kind == LegKind::Hop && edge.is_free())
                }
            };
            if better {
                best = Some((slot, edge.cost, edge.kind));
            }
        }
        match best {
            Some((slot, _, _)) => {
                visited[slot] = true;
                order.push(slot);
                current = slot;
            }
            None => break,
        }
    }

    let remaining = (0..n).filter(|&slot| !visited[slot]).collect();
    (order, remaining)
}

/// Makes the tail of the walk compatible with the tour shape: the pinned end
/// must follow a node it is connected to, and a round trip must be able to
/// close. Walk nodes past the last compatible position go back to `remaining`.
fn attach_tail(space: &SearchSpace, order: &mut Vec<usize>, remaining: &mut Vec<usize>) -> Result<()> {
    let index = space.index();
    match space.end() {
        Some(end) if order.first() != Some(&end) => {
            let Some(k) = order.iter().rposition(|&slot| index.is_connected(slot, end)) else {
                return Err(RouteError::EndpointUnreachable {
                    start: index.node_id(order[0]),
                    end: index.node_id(end),
                });
            };
            remaining.extend(order.drain(k + 1..));
            order.push(end);
        }
        _ if space.is_closed() && order.len() > 1 => {
            let first = order[0];
            if let Some(k) = order
                .iter()
                .rposition(|&slot| slot != first && index.is_connected(slot, first))
            {
                remaining.extend(order.drain(k + 1..));
            }
        }
        _ => {}
    }
    remaining.sort_unstable();
    Ok(())
}

/// Places `remaining` into `order`. Single nodes go in by cheapest feasible
/// insertion; once none fits, the cheapest chain of remaining nodes bridging
/// two tour neighbours is spliced in. Returns the slots neither could place.
fn insert_remaining(space: &SearchSpace, order: &mut Vec<usize>, mut remaining: Vec<usize>) -> Vec<usize> {
    while !remaining.is_empty() {
        if let Some((i, to)) = cheapest_insertion(space, order, &remaining) {
            order.insert(to, remaining.remove(i));
            continue;
        }
        let Some((to, chain)) = cheapest_bridge(space, order, &remaining) else {
            break;
        };
        log::trace!("baseline: bridging {} stranded nodes at position {to}", chain.len());
        remaining.retain(|slot| !chain.contains(slot));
        order.splice(to..to, chain);
    }
    remaining
}

/// Positions a node may be inserted at without displacing a pinned end.
fn insertion_range(space: &SearchSpace, len: usize) -> (usize, usize) {
    let lo = usize::from(space.start().is_some() || space.is_closed());
    let hi = if space.end().is_some() { len - 1 } else { len };
    (lo, hi)
}

/// Index into `remaining` and position of the cheapest feasible insertion.
fn cheapest_insertion(space: &SearchSpace, order: &[usize], remaining: &[usize]) -> Option<(usize, usize)> {
    let (lo, hi) = insertion_range(space, order.len());
    let mut best: Option<(f64, usize, usize)> = None;
    for (i, &slot) in remaining.iter().enumerate() {
        for to in lo..=hi {
            let delta = space.insertion_delta(order, slot, to);
            if delta.is_finite() && best.is_none_or(|(d, _, _)| delta < d) {
                best = Some((delta, i, to));
            }
        }
    }
    best.map(|(_, i, to)| (i, to))
}

/// Cheapest chain through `pool` that fits between two consecutive tour
/// nodes, with the position it goes in at.
fn cheapest_bridge(space: &SearchSpace, order: &[usize], pool: &[usize]) -> Option<(usize, Vec<usize>)> {
    let len = order.len();
    let (lo, hi) = insertion_range(space, len);
    let mut best: Option<(f64, usize, Vec<usize>)> = None;
    for to in lo..=hi {
        let a = match to {
            0 if space.is_closed() => order.last().copied(),
            0 => None,
            _ => Some(order[to - 1]),
        };
        let b = if to < len {
            Some(order[to])
        } else if space.is_closed() {
            order.first().copied()
        } else {
            None
        };
        // Open ends grow one node at a time through single insertion.
        let (Some(a), Some(b)) = (a, b) else {
            continue;
        };
        if a == b {
            continue;
        }
        if let Some((cost, chain)) = shortest_chain(space, a, b, pool) {
            let delta = cost - space.cost(a, b);
            if best.as_ref().is_none_or(|(d, _, _)| delta < *d) {
                best = Some((delta, to, chain));
            }
        }
    }
    best.map(|(_, to, chain)| (to, chain))
}

/// Dijkstra from `from` to `to` with every intermediate node drawn from
/// `pool`. Returns the path cost and the intermediate nodes in order.
fn shortest_chain(space: &SearchSpace, from: usize, to: usize, pool: &[usize]) -> Option<(f64, Vec<usize>)> {
    let k = pool.len();
    let mut dist: Vec<f64> = pool.iter().map(|&p| space.cost(from, p)).collect();
    let mut prev: Vec<Option<usize>> = vec![None; k];
    let mut settled = vec![false; k];
    let mut best: Option<(f64, usize)> = None;

    while let Some(u) = (0..k)
        .filter(|&i| !settled[i] && dist[i].is_finite())
        .min_by(|&x, &y| dist[x].total_cmp(&dist[y]))
    {
        settled[u] = true;
        let exit = dist[u] + space.cost(pool[u], to);
        if exit.is_finite() && best.is_none_or(|(c, _)| exit < c) {
            best = Some((exit, u));
        }
        for v in 0..k {
            if settled[v] {
                continue;
            }
            let through = dist[u] + space.cost(pool[u], pool[v]);
            if through < dist[v] {
                dist[v] = through;
                prev[v] = Some(u);
            }
        }
    }

    let (cost, mut last) = best?;
    let mut chain = vec![pool[last]];
    while let Some(p) = prev[last] {
        chain.push(pool[p]);
        last = p;
    }
    chain.reverse();
    Some((cost, chain))
}

/// Rebuilds the search space over the nodes of `order` only.
fn narrow(space: &SearchSpace, order: Vec<usize>) -> Result<(SearchSpace, Vec<usize>)> {
    let index = space.index();
    let mut kept = order.clone();
    kept.sort_unstable();
    let narrowed = SearchSpace::new(
        index.restricted(&kept),
        space.start().map(|slot| index.node_id(slot)),
        space.end().map(|slot| index.node_id(slot)),
        space.is_closed(),
    )?;
    let order = order
        .iter()
        .map(|slot| kept.binary_search(slot).unwrap_or_default())
        .collect();
    Ok((narrowed, order))
}

/// First-improvement descent. Returns the number of moves applied.
fn local_search(space: &SearchSpace, order: &mut Vec<usize>, config: &BaselineConfig) -> usize {
    let (lo, hi) = space.movable(order.len());
    if hi < lo + 2 {
        return 0;
    }
    let cap = config.move_cap(order.len());
    let threshold = -config.min_improvement;

    let mut moves = 0;
    while moves < cap {
        let mut found = None;
        'scan: for i in lo..hi {
            for j in lo..hi {
                if i < j {
                    let mv = TourMove::TwoOpt { i, j };
                    if space.delta(order, &mv) < threshold {
                        found = Some(mv);
                        break 'scan;
                    }
                }
                if i != j {
                    let mv = TourMove::Relocate { from: i, to: j };
                    if space.delta(order, &mv) < threshold {
                        found = Some(mv);
                        break 'scan;
                    }
                }
            }
        }
        match found {
            Some(mv) => {
                mv.apply(order);
                moves += 1;
            }
            None => break,
        }
    }
    moves
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::{ReducedCostIndex, FREE_EDGE_COST};
    use crate::distance::Position;
    use crate::graph::{FreeEdge, Node, RouteGraph};

    fn space_of(
        points: &[(NodeId, f64, f64)],
        edges: &[(NodeId, NodeId)],
        max_hop: f64,
        start: Option<NodeId>,
        end: Option<NodeId>,
        closed: bool,
    ) -> SearchSpace {
        let nodes = points
            .iter()
            .map(|&(id, x, y)| Node::new(id, format!("N{id}"), Position::new(x, y, 0.0)))
            .collect();
        let edges: Vec<FreeEdge> = edges.iter().map(|&(a, b)| FreeEdge::new(a, b)).collect();
        let graph = RouteGraph::new(nodes, &edges).unwrap();
        let ids: Vec<NodeId> = points.iter().map(|p| p.0).collect();
        let index = ReducedCostIndex::build(&graph, &ids, max_hop).unwrap();
        SearchSpace::new(index, start, end, closed).unwrap()
    }

    fn ids(baseline: &Baseline) -> Vec<NodeId> {
        let index = baseline.space.index();
        baseline.tour.order().iter().map(|&s| index.node_id(s)).collect()
    }

    #[test]
    fn test_line_is_walked_in_order() {
        let points = [(1, 0.0, 0.0), (2, 3.0, 0.0), (3, 1.0, 0.0), (4, 2.0, 0.0)];
        let space = space_of(&points, &[], 10.0, Some(1), None, false);
        let b = BaselineBuilder::build(space, &BaselineConfig::default()).unwrap();
        assert_eq!(ids(&b), vec![1, 3, 4, 2]);
        assert!((b.tour.cost() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_free_edge_wins_cost_tie() {
        // From node 1, nodes 2 and 3 are both FREE_EDGE_COST away; only the
        // edge to 3 is free.
        let points = [(1, 0.0, 0.0), (2, FREE_EDGE_COST, 0.0), (3, 50.0, 0.0)];
        let space = space_of(&points, &[(1, 3)], 100.0, Some(1), None, false);
        let config = BaselineConfig::default().with_construction_only(true);
        let b = BaselineBuilder::build(space, &config).unwrap();
        assert_eq!(ids(&b)[1], 3);
    }

    #[test]
    fn test_lowest_id_wins_exact_tie() {
        let points = [(5, 0.0, 0.0), (9, 1.0, 0.0), (7, -1.0, 0.0)];
        let space = space_of(&points, &[], 10.0, Some(5), None, false);
        let config = BaselineConfig::default().with_construction_only(true);
        let b = BaselineBuilder::build(space, &config).unwrap();
        assert_eq!(ids(&b), vec![5, 7, 9]);
    }

    #[test]
    fn test_pinned_end_is_last() {
        let points = [(1, 0.0, 0.0), (2, 1.0, 0.0), (3, 2.0, 0.0), (4, 3.0, 0.0)];
        let space = space_of(&points, &[], 10.0, Some(2), Some(3), false);
        let b = BaselineBuilder::build(space, &BaselineConfig::default()).unwrap();
        let order = ids(&b);
        assert_eq!(order.first(), Some(&2));
        assert_eq!(order.last(), Some(&3));
        assert_eq!(order.len(), 4);
    }

    #[test]
    fn test_free_start_picks_endpoint() {
        let points = [(1, 1.0, 0.0), (2, 0.0, 0.0), (3, 2.0, 0.0)];
        // 2 -- 1 -- 3 with hops of 1; 2 and 3 have one connection each.
        let space = space_of(&points, &[], 1.5, None, None, false);
        let b = BaselineBuilder::build(space, &BaselineConfig::default()).unwrap();
        assert_eq!(ids(&b), vec![2, 1, 3]);
        assert!((b.tour.cost() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_stranded_node_is_inserted() {
        // Greedy from 1 walks 1 -> 2 -> 3 and gets stuck; 4 only fits between 1 and 2.
        let points = [(1, 0.0, 0.0), (2, 1.0, 0.0), (3, 2.0, 0.0), (4, 0.5, 0.9)];
        let space = space_of(&points, &[], 1.05, Some(1), None, false);
        let b = BaselineBuilder::build(space, &BaselineConfig::default()).unwrap();
        assert!(b.unplaced.is_empty());
        assert_eq!(ids(&b), vec![1, 4, 2, 3]);
        assert!(b.space.is_feasible(b.tour.order()));
    }

    #[test]
    fn test_unplaceable_node_is_excluded() {
        // 3 hangs off 2 alone; a pinned path 1 -> 4 through 2 cannot detour to 3 and back.
        let points = [(1, 0.0, 0.0), (2, 1.0, 0.0), (3, 1.0, 1.0), (4, 2.0, 0.0)];
        let space = space_of(&points, &[], 1.0, Some(1), Some(4), false);
        let b = BaselineBuilder::build(space, &BaselineConfig::default()).unwrap();
        assert_eq!(b.unplaced, vec![3]);
        assert_eq!(ids(&b), vec![1, 2, 4]);
        assert_eq!(b.space.len(), 3);
    }

    #[test]
    fn test_stranded_chain_is_bridged() {
        // Greedy from 1 takes the dead end 3; 4 and 5 only fit together,
        // as 1 -> 4 -> 5 -> 2.
        let points = [
            (1, 0.0, 0.0),
            (2, 1.0, 0.0),
            (3, -0.5, 0.0),
            (4, 0.0, -0.9),
            (5, 0.9, -0.9),
        ];
        let space = space_of(&points, &[], 1.0, Some(1), Some(2), false);
        let b = BaselineBuilder::build(space, &BaselineConfig::default()).unwrap();
        assert_eq!(ids(&b), vec![1, 4, 5, 2]);
        assert_eq!(b.unplaced, vec![3]);
        assert!(b.space.is_feasible(b.tour.order()));
    }

    #[test]
    fn test_chain_closes_round_trip() {
        // Unit square, hops of exactly 1. With 1 and 2 placed, neither 3 nor 4
        // fits alone; together they close the loop.
        let points = [(1, 0.0, 0.0), (2, 1.0, 0.0), (3, 1.0, 1.0), (4, 0.0, 1.0)];
        let space = space_of(&points, &[], 1.0, Some(1), None, true);
        let mut order = vec![0, 1];
        let left = insert_remaining(&space, &mut order, vec![2, 3]);
        assert!(left.is_empty());
        assert_eq!(order, vec![0, 3, 2, 1]);
        assert!((space.tour_cost(&order) - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_round_trip_closes() {
        let points = [(1, 0.0, 0.0), (2, 10.0, 0.0), (3, 10.0, 10.0), (4, 0.0, 10.0)];
        let edges = [(1, 2), (2, 3), (3, 4), (4, 1)];
        let space = space_of(&points, &edges, 1.0, Some(1), None, true);
        let b = BaselineBuilder::build(space, &BaselineConfig::default()).unwrap();
        assert_eq!(ids(&b).len(), 4);
        assert_eq!(b.space.hop_count(b.tour.order()), 0);
        assert!((b.tour.cost() - 4.0 * FREE_EDGE_COST).abs() < 1e-15);
    }

    #[test]
    fn test_local_search_not_worse_than_greedy() {
        let points: Vec<(NodeId, f64, f64)> = (0..25)
            .map(|i| {
                let t = i as f64 * 2.399;
                (i as NodeId, 10.0 * t.cos() * (i as f64).sqrt(), 10.0 * t.sin())
            })
            .collect();
        let space = space_of(&points, &[], 1e6, None, None, false);
        let b = BaselineBuilder::build(space, &BaselineConfig::default()).unwrap();
        assert!(b.tour.cost() <= b.greedy_cost);
        assert_eq!(b.tour.len(), 25);
    }

    #[test]
    fn test_single_node() {
        let space = space_of(&[(1, 0.0, 0.0)], &[], 1.0, None, None, false);
        let b = BaselineBuilder::build(space, &BaselineConfig::default()).unwrap();
        assert_eq!(ids(&b), vec![1]);
        assert_eq!(b.tour.cost(), 0.0);
    }
}
