// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::btree_map::{BTreeMap, Entry};
use std::collections::BTreeSet;

use crate::{earth_distance, initial_bearing, GraphError, Location, NameIndex, Node};

/// Internal storage of a single vertex.
#[derive(Debug, Clone, PartialEq)]
struct Vertex {
    node: Node,

    /// Undirected neighbors. A pair of vertices connected by multiple ways
    /// appears here multiple times.
    adjacent: Vec<i64>,

    /// Names of all ways passing through this vertex.
    ways: BTreeSet<String>,
}

impl Vertex {
    fn new(node: Node) -> Self {
        Self {
            node,
            adjacent: Vec::default(),
            ways: BTreeSet::default(),
        }
    }
}

/// Represents a road network as a set of [Nodes](Node) with undirected
/// connections between them, together with an index of named [Locations](Location).
///
/// A Graph is immutable; use a [GraphBuilder] to create one. As all queries only
/// borrow the graph, it may be freely shared between threads.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Graph {
    vertices: BTreeMap<i64, Vertex>,
    locations: BTreeMap<i64, Location>,
    names: NameIndex,
}

impl Graph {
    /// Returns the number of vertices in the graph.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Returns an iterator over all [Nodes](Node) in the graph, in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = Node> + '_ {
        self.vertices.values().map(|v| v.node)
    }

    /// Checks whether a vertex with the provided id exists.
    pub fn contains(&self, id: i64) -> bool {
        self.vertices.contains_key(&id)
    }

    /// Retrieves a [Node] with the provided id.
    pub fn get_node(&self, id: i64) -> Option<Node> {
        self.vertices.get(&id).map(|v| v.node)
    }

    fn vertex(&self, id: i64) -> Result<&Vertex, GraphError> {
        self.vertices.get(&id).ok_or(GraphError::UnknownVertex(id))
    }

    fn node(&self, id: i64) -> Result<Node, GraphError> {
        self.vertex(id).map(|v| v.node)
    }

    /// Returns ids of all vertices adjacent to `id`. Duplicates are possible
    /// if two vertices are connected by multiple ways.
    pub fn neighbors(&self, id: i64) -> Result<&[i64], GraphError> {
        self.vertex(id).map(|v| v.adjacent.as_slice())
    }

    pub fn longitude(&self, id: i64) -> Result<f64, GraphError> {
        self.node(id).map(|n| n.lon)
    }

    pub fn latitude(&self, id: i64) -> Result<f64, GraphError> {
        self.node(id).map(|n| n.lat)
    }

    /// Returns the names of all ways passing through a vertex, in lexicographic order.
    pub fn way_names(&self, id: i64) -> Result<&BTreeSet<String>, GraphError> {
        self.vertex(id).map(|v| &v.ways)
    }

    /// Returns the great-circle distance between two vertices, in miles.
    pub fn distance(&self, from_id: i64, to_id: i64) -> Result<f64, GraphError> {
        let a = self.node(from_id)?;
        let b = self.node(to_id)?;
        Ok(earth_distance(a.lon, a.lat, b.lon, b.lat))
    }

    /// Returns the initial bearing from one vertex towards another, in degrees
    /// in the range (-180, 180].
    pub fn bearing(&self, from_id: i64, to_id: i64) -> Result<f64, GraphError> {
        let a = self.node(from_id)?;
        let b = self.node(to_id)?;
        Ok(initial_bearing(a.lon, a.lat, b.lon, b.lat))
    }

    /// Finds the closest [Node] to the given position.
    ///
    /// Exact ties are resolved in favor of the smallest id.
    ///
    /// This function requires computing the distance to every [Node] in the graph.
    /// For repeated queries on large graphs, consider a [KDTree](crate::KDTree).
    pub fn find_nearest_node(&self, lon: f64, lat: f64) -> Result<Node, GraphError> {
        // min_by keeps the first of equal elements, and vertices are iterated by ascending id
        self.iter()
            .map(|nd| (earth_distance(lon, lat, nd.lon, nd.lat), nd))
            .min_by(|(a_dist, _), (b_dist, _)| a_dist.total_cmp(b_dist))
            .map(|(_, nd)| nd)
            .ok_or(GraphError::EmptyGraph)
    }

    /// Retrieves a named [Location] attached to the provided id.
    ///
    /// Locations outlive pruning: a named place which isn't on any road
    /// has a location, but isn't a vertex of the graph.
    pub fn location(&self, id: i64) -> Option<&Location> {
        self.locations.get(&id)
    }

    /// Returns an iterator over all named [Locations](Location), in ascending id order.
    pub fn locations(&self) -> impl Iterator<Item = &Location> {
        self.locations.values()
    }

    /// Returns the underlying index of place names.
    pub fn names(&self) -> &NameIndex {
        &self.names
    }

    /// Returns ids of all places whose name matches `name`
    /// after [normalization](crate::normalize_name), in registration order.
    pub fn lookup(&self, name: &str) -> &[i64] {
        self.names.lookup(name)
    }

    /// Like [Graph::lookup], but resolves the ids to [Locations](Location).
    pub fn locations_named(&self, name: &str) -> Vec<&Location> {
        self.lookup(name)
            .iter()
            .filter_map(|id| self.locations.get(id))
            .collect()
    }

    /// Returns display names of all places whose normalized name starts
    /// with the normalized `prefix`, in lexicographic order of the normalized names.
    ///
    /// Every matching normalized name contributes the display name of
    /// the first place registered under it.
    pub fn search(&self, prefix: &str) -> Vec<&str> {
        self.names
            .with_prefix(prefix)
            .into_iter()
            .filter_map(|(_, id)| self.locations.get(&id))
            .map(|loc| loc.name.as_str())
            .collect()
    }
}

/// Mutable precursor of a [Graph], filled in by an ingester.
///
/// Once all data has been added, [GraphBuilder::build] removes vertices without
/// any connections and freezes the result.
#[derive(Debug, Default, Clone)]
pub struct GraphBuilder(Graph);

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of vertices added so far.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, id: i64) -> bool {
        self.0.contains(id)
    }

    pub fn get_node(&self, id: i64) -> Option<Node> {
        self.0.get_node(id)
    }

    /// Creates or replaces a vertex.
    ///
    /// Replacing a vertex discards its connections and way names;
    /// other vertices still referring to it keep their connections.
    pub fn add_vertex(&mut self, id: i64, lon: f64, lat: f64) {
        let vertex = Vertex::new(Node { id, lon, lat });
        match self.0.vertices.entry(id) {
            Entry::Vacant(e) => {
                e.insert(vertex);
            }
            Entry::Occupied(mut e) => {
                log::debug!("vertex {id} added twice - replacing");
                e.insert(vertex);
            }
        }
    }

    /// Connects two existing vertices with an undirected edge.
    ///
    /// Connections are not deduplicated.
    pub fn add_edge(&mut self, a: i64, b: i64) -> Result<(), GraphError> {
        self.ensure_exists(a)?;
        self.ensure_exists(b)?;
        self.push_adjacent(a, b);
        self.push_adjacent(b, a);
        Ok(())
    }

    /// Marks every vertex of `path` as belonging to a way called `way_name`,
    /// and connects all consecutive vertices.
    ///
    /// Either the whole path is added, or (if any of the vertices doesn't exist)
    /// nothing is changed.
    pub fn tag_way(&mut self, path: &[i64], way_name: &str) -> Result<(), GraphError> {
        for &id in path {
            self.ensure_exists(id)?;
        }

        for &id in path {
            if let Some(v) = self.0.vertices.get_mut(&id) {
                if !v.ways.contains(way_name) {
                    v.ways.insert(way_name.to_string());
                }
            }
        }

        for pair in path.windows(2) {
            self.push_adjacent(pair[0], pair[1]);
            self.push_adjacent(pair[1], pair[0]);
        }

        Ok(())
    }

    /// Registers a named place at the provided position under vertex id `id`.
    ///
    /// The id doesn't need to be a vertex. Registering the same id again
    /// replaces its [Location], but the id stays indexed under the old name as well.
    pub fn register_name(&mut self, id: i64, lon: f64, lat: f64, name: &str) {
        self.0.names.insert(id, name);
        self.0.locations.insert(
            id,
            Location {
                id,
                lon,
                lat,
                name: name.to_string(),
            },
        );
    }

    /// Removes all vertices without any connections. Returns the number of removed vertices.
    ///
    /// Named [Locations](Location) are not affected.
    pub fn prune(&mut self) -> usize {
        let before = self.0.vertices.len();
        self.0.vertices.retain(|_, v| !v.adjacent.is_empty());
        let removed = before - self.0.vertices.len();
        log::debug!("pruned {removed} unconnected vertices");
        removed
    }

    /// Prunes the graph and returns the immutable result.
    pub fn build(mut self) -> Graph {
        self.prune();
        log::info!(
            "graph built: {} vertices, {} named locations",
            self.0.vertices.len(),
            self.0.locations.len(),
        );
        self.0
    }

    fn ensure_exists(&self, id: i64) -> Result<(), GraphError> {
        if self.0.vertices.contains_key(&id) {
            Ok(())
        } else {
            Err(GraphError::UnknownVertex(id))
        }
    }

    fn push_adjacent(&mut self, from: i64, to: i64) {
        if let Some(v) = self.0.vertices.get_mut(&from) {
            v.adjacent.push(to);
        }
    }
}
