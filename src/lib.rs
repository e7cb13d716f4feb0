// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Routing, turn-by-turn directions and place search over
//! [OpenStreetMap](https://www.openstreetmap.org/) road networks.
//!
//! Roads are loaded into an undirected [Graph] through a [GraphBuilder],
//! shortest paths are found with A*, and paths are turned into human-readable
//! [Directions](Direction). Named places are kept in a prefix-searchable
//! [NameIndex] for autocomplete. All distances are expressed in miles.
//!
//! # Example
//!
//! ```no_run
//! let osm_options = waymark::osm::Options {
//!     profile: &waymark::osm::CAR_PROFILE,
//!     file_format: waymark::osm::FileFormat::Unknown,
//!     bbox: [0.0; 4],
//! };
//! let g = waymark::osm::load_file(&osm_options, "path/to/berkeley.osm")
//!     .expect("failed to load berkeley.osm");
//!
//! let route = waymark::route(&g, -122.2579, 37.8719, -122.2680, 37.8716)
//!     .expect("graph is not empty");
//!
//! for direction in waymark::directions(&g, &route).expect("route consists of valid vertices") {
//!     println!("{direction}");
//! }
//!
//! println!("{:?}", g.search("top"));
//! ```

mod astar;
mod directions;
mod distance;
mod error;
mod graph;
mod kd;
mod names;
pub mod osm;
mod trie;

pub use astar::{find_route, route};
pub use directions::{directions, Direction, ParseDirectionError, Turn};
pub use distance::{earth_distance, initial_bearing};
pub use error::GraphError;
pub use graph::{Graph, GraphBuilder};
pub use kd::KDTree;
pub use names::{normalize_name, NameIndex};
pub use trie::Trie;

/// Coordinates of a vertex of the [Graph].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Node {
    pub id: i64,
    pub lon: f64,
    pub lat: f64,
}

/// A named place, as registered with [GraphBuilder::register_name].
///
/// `name` is the original display name, before any normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub id: i64,
    pub lon: f64,
    pub lat: f64,
    pub name: String,
}
