// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::{BinaryHeap, HashMap};

use crate::{earth_distance, Graph, GraphError, Node};

#[derive(Debug, Clone, Copy)]
struct QueueItem {
    at: i64,
    cost: f64,
    score: f64,
}

impl PartialEq for QueueItem {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl Eq for QueueItem {}

impl PartialOrd for QueueItem {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueItem {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // NOTE: We revert the order of comparison,
        // as lower scores are considered better ("higher"),
        // and Rust's BinaryHeap is a max-heap.
        other.score.total_cmp(&self.score)
    }
}

fn reconstruct_path(came_from: &HashMap<i64, i64>, mut last: i64) -> Vec<i64> {
    let mut path = vec![last];

    while let Some(&nd) = came_from.get(&last) {
        path.push(nd);
        last = nd;
    }

    path.reverse();
    path
}

/// Uses the [A* algorithm](https://en.wikipedia.org/wiki/A*_search_algorithm)
/// to find the shortest route between two vertices in the provided graph.
///
/// Edges cost the great-circle distance between their ends, and the same distance
/// to the destination serves as the (admissible) heuristic, so the returned
/// route is always the shortest one.
///
/// Returns an empty vector if there is no route between the two vertices,
/// and [GraphError::UnknownVertex] if any of them doesn't exist.
pub fn find_route(g: &Graph, from_id: i64, to_id: i64) -> Result<Vec<i64>, GraphError> {
    let to_node = g.get_node(to_id).ok_or(GraphError::UnknownVertex(to_id))?;
    let from_node = g
        .get_node(from_id)
        .ok_or(GraphError::UnknownVertex(from_id))?;

    let heuristic = |n: Node| earth_distance(n.lon, n.lat, to_node.lon, to_node.lat);

    let mut queue: BinaryHeap<QueueItem> = BinaryHeap::default();
    let mut came_from: HashMap<i64, i64> = HashMap::default();
    let mut known_costs: HashMap<i64, f64> = HashMap::default();
    let mut expanded: usize = 0;

    queue.push(QueueItem {
        at: from_id,
        cost: 0.0,
        score: heuristic(from_node),
    });
    known_costs.insert(from_id, 0.0);

    while let Some(item) = queue.pop() {
        if item.at == to_id {
            log::debug!("route {from_id} → {to_id} found after expanding {expanded} vertices");
            return Ok(reconstruct_path(&came_from, to_id));
        }

        // Contrary to the wikipedia definition, we might keep multiple items in the queue for the same node.
        if item.cost > known_costs.get(&item.at).cloned().unwrap_or(f64::INFINITY) {
            continue;
        }
        expanded += 1;

        let Some(at_node) = g.get_node(item.at) else {
            continue;
        };

        for &neighbor_id in g.neighbors(item.at)? {
            // Connections to replaced vertices may point nowhere
            let Some(neighbor) = g.get_node(neighbor_id) else {
                continue;
            };

            // Check if this is the cheapest way to the neighbor
            let neighbor_cost =
                item.cost + earth_distance(at_node.lon, at_node.lat, neighbor.lon, neighbor.lat);
            if neighbor_cost
                >= known_costs
                    .get(&neighbor_id)
                    .cloned()
                    .unwrap_or(f64::INFINITY)
            {
                continue;
            }

            // Push the new item into the queue
            came_from.insert(neighbor_id, item.at);
            known_costs.insert(neighbor_id, neighbor_cost);
            queue.push(QueueItem {
                at: neighbor_id,
                cost: neighbor_cost,
                score: neighbor_cost + heuristic(neighbor),
            });
        }
    }

    log::debug!("no route {from_id} → {to_id} after expanding {expanded} vertices");
    Ok(vec![])
}

/// Finds the shortest route between the vertices closest to the start
/// and destination positions.
///
/// Returns an empty vector if there is no route, and [GraphError::EmptyGraph]
/// if the graph has no vertices.
pub fn route(
    g: &Graph,
    start_lon: f64,
    start_lat: f64,
    dest_lon: f64,
    dest_lat: f64,
) -> Result<Vec<i64>, GraphError> {
    let from = g.find_nearest_node(start_lon, start_lat)?;
    let to = g.find_nearest_node(dest_lon, dest_lat)?;
    find_route(g, from.id, to.id)
}
