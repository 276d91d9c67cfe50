use super::graph::NavGraph;
use super::types::{PathResult, Waypoint};
use ordered_float::OrderedFloat;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

/// Dijkstra shortest path from `start` to `goal`.
///
/// Returns `None` when either endpoint is not part of the graph or the goal
/// cannot be reached. Frontier ties are broken by waypoint order, so the
/// result is the same for every call with the same input.
pub fn shortest_path(graph: &NavGraph, start: Waypoint, goal: Waypoint) -> Option<PathResult> {
    if !graph.contains(&start) || !graph.contains(&goal) {
        return None;
    }

    let mut dist: HashMap<Waypoint, f64> = graph.waypoints().map(|w| (*w, f64::INFINITY)).collect();
    let mut previous: HashMap<Waypoint, Waypoint> = HashMap::new();
    let mut settled: HashSet<Waypoint> = HashSet::new();
    let mut frontier = BinaryHeap::new();

    dist.insert(start, 0.0);
    frontier.push(Reverse((OrderedFloat(0.0), start)));

    while let Some(Reverse((OrderedFloat(current_dist), current))) = frontier.pop() {
        if !settled.insert(current) {
            continue;
        }
        if current == goal {
            break;
        }

        for edge in graph.neighbors(&current) {
            if settled.contains(&edge.to) {
                continue;
            }
            let candidate = current_dist + edge.weight;
            let known = dist.get(&edge.to).copied().unwrap_or(f64::INFINITY);
            if candidate < known {
                dist.insert(edge.to, candidate);
                previous.insert(edge.to, current);
                frontier.push(Reverse((OrderedFloat(candidate), edge.to)));
            }
        }
    }

    if !settled.contains(&goal) {
        return None;
    }

    let mut path = vec![goal];
    let mut cursor = goal;
    while let Some(prev) = previous.get(&cursor) {
        path.push(*prev);
        cursor = *prev;
    }
    path.reverse();

    Some(PathResult {
        path,
        distance: dist.get(&goal).copied().unwrap_or(0.0),
    })
}
