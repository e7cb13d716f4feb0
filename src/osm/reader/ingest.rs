// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::{GraphBuilder, GraphError};

use super::{model, Options};

/// Helper object used for feeding [OSM features](super::model::Feature)
/// into a [GraphBuilder].
///
/// Features are only ever added through the builder's ingestion interface;
/// pruning is left to [GraphBuilder::build].
pub(super) struct Ingester<'a> {
    b: &'a mut GraphBuilder,
    options: &'a Options<'a>,
    ignore_bbox: bool,
    nodes: usize,
    ways: usize,
}

impl<'a> Ingester<'a> {
    pub(super) fn new(b: &'a mut GraphBuilder, options: &'a Options<'a>) -> Self {
        let ignore_bbox =
            options.bbox.iter().all(|&x| x == 0.0) || options.bbox.iter().any(|x| !x.is_finite());
        if ignore_bbox && options.bbox.iter().any(|&x| x != 0.0) {
            log::warn!("ignoring invalid bounding box {:?}", options.bbox);
        }

        Self {
            b,
            options,
            ignore_bbox,
            nodes: 0,
            ways: 0,
        }
    }

    /// Add all features from the provided iterator.
    pub(super) fn add_features<I, E>(&mut self, features: I) -> Result<(), E>
    where
        I: IntoIterator<Item = Result<model::Feature, E>>,
        E: From<GraphError>,
    {
        for f in features {
            self.add_feature(f?)?;
        }
        log::debug!(
            "added {} nodes and {} ways using the {} profile",
            self.nodes,
            self.ways,
            self.options.profile.name,
        );
        Ok(())
    }

    fn add_feature(&mut self, f: model::Feature) -> Result<(), GraphError> {
        match f {
            model::Feature::Node(n) => {
                self.add_node(n);
                Ok(())
            }
            model::Feature::Way(w) => self.add_way(w),
        }
    }

    fn add_node(&mut self, n: model::Node) {
        if !self.is_in_bbox(n.lon, n.lat) {
            return;
        }

        self.b.add_vertex(n.id, n.lon, n.lat);
        if let Some(name) = n.tags.get("name") {
            self.b.register_name(n.id, n.lon, n.lat, name);
        }
        self.nodes += 1;
    }

    fn is_in_bbox(&self, lon: f64, lat: f64) -> bool {
        if self.ignore_bbox {
            return true;
        }
        let [min_lon, min_lat, max_lon, max_lat] = self.options.bbox;
        lat >= min_lat && lat <= max_lat && lon >= min_lon && lon <= max_lon
    }

    fn add_way(&mut self, w: model::Way) -> Result<(), GraphError> {
        if !self.options.profile.is_routable(&w.tags) {
            return Ok(());
        }

        let nodes = self.get_way_nodes(&w);
        if nodes.len() < 2 {
            log::warn!(
                "way {} has {} known node(s) - skipping",
                w.id,
                nodes.len()
            );
            return Ok(());
        }

        self.b
            .tag_way(&nodes, self.options.profile.way_name(&w.tags))?;
        self.ways += 1;
        Ok(())
    }

    fn get_way_nodes(&self, w: &model::Way) -> Vec<i64> {
        // Remove references to unknown nodes
        w.nodes
            .iter()
            .cloned()
            .filter(|&node_id| self.b.contains(node_id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::osm::{FileFormat, Profile, CAR_PROFILE};

    macro_rules! tags {
        {} => { HashMap::default() };
        {$( $k:literal : $v:literal ),+} => {
            HashMap::from_iter([ $( ($k.to_string(), $v.to_string()) ),+ ])
        };
    }

    fn options(profile: &'static Profile<'static>, bbox: [f64; 4]) -> Options<'static> {
        Options {
            profile,
            file_format: FileFormat::Xml,
            bbox,
        }
    }

    fn node(id: i64, lon: f64, lat: f64, tags: HashMap<String, String>) -> model::Feature {
        model::Feature::Node(model::Node { id, lon, lat, tags })
    }

    fn way(id: i64, nodes: Vec<i64>, tags: HashMap<String, String>) -> model::Feature {
        model::Feature::Way(model::Way { id, nodes, tags })
    }

    fn ingest(options: &Options<'_>, features: Vec<model::Feature>) -> GraphBuilder {
        let mut b = GraphBuilder::new();
        Ingester::new(&mut b, options)
            .add_features(features.into_iter().map(Ok::<_, GraphError>))
            .unwrap();
        b
    }

    #[test]
    fn adds_routable_ways() {
        let g = ingest(
            &options(&CAR_PROFILE, [0.0; 4]),
            vec![
                node(1, 0.0, 0.0, tags! {}),
                node(2, 0.0, 0.001, tags! {}),
                node(3, 0.001, 0.001, tags! {}),
                way(10, vec![1, 2], tags! {"highway": "residential", "name": "Bancroft Way"}),
                way(11, vec![2, 3], tags! {"highway": "footway", "name": "Sproul Plaza"}),
            ],
        )
        .build();

        assert_eq!(g.len(), 2);
        assert_eq!(g.neighbors(1).unwrap(), &[2]);
        assert!(g.way_names(2).unwrap().contains("Bancroft Way"));
        assert!(!g.contains(3));
    }

    #[test]
    fn unnamed_ways() {
        let g = ingest(
            &options(&CAR_PROFILE, [0.0; 4]),
            vec![
                node(1, 0.0, 0.0, tags! {}),
                node(2, 0.0, 0.001, tags! {}),
                way(10, vec![1, 2], tags! {"highway": "service"}),
            ],
        )
        .build();

        assert!(g.way_names(1).unwrap().contains(""));
    }

    #[test]
    fn drops_unknown_references() {
        let g = ingest(
            &options(&CAR_PROFILE, [0.0; 4]),
            vec![
                node(1, 0.0, 0.0, tags! {}),
                node(2, 0.0, 0.001, tags! {}),
                node(3, 0.0, 0.002, tags! {}),
                way(10, vec![1, 99, 2], tags! {"highway": "residential"}),
                way(11, vec![98, 3], tags! {"highway": "residential"}),
            ],
        )
        .build();

        assert_eq!(g.neighbors(1).unwrap(), &[2]);
        assert!(!g.contains(3));
    }

    #[test]
    fn registers_named_nodes() {
        let g = ingest(
            &options(&CAR_PROFILE, [0.0; 4]),
            vec![
                node(1, 0.0, 0.0, tags! {}),
                node(2, 0.0, 0.001, tags! {"name": "Sather Gate"}),
                node(3, 0.5, 0.5, tags! {"amenity": "cafe", "name": "Caffe Strada"}),
                way(10, vec![1, 2], tags! {"highway": "residential"}),
            ],
        )
        .build();

        assert_eq!(g.lookup("sather gate"), &[2]);
        assert_eq!(g.lookup("caffe strada"), &[3]);
        assert!(!g.contains(3));
        assert_eq!(g.search("caffe"), vec!["Caffe Strada"]);
    }

    #[test]
    fn bbox_filter() {
        let g = ingest(
            &options(&CAR_PROFILE, [-0.01, -0.01, 0.01, 0.01]),
            vec![
                node(1, 0.0, 0.0, tags! {}),
                node(2, 0.0, 0.001, tags! {}),
                node(3, 1.0, 1.0, tags! {"name": "Far Away"}),
                way(10, vec![1, 2, 3], tags! {"highway": "residential"}),
            ],
        )
        .build();

        assert_eq!(g.len(), 2);
        assert!(!g.contains(3));
        assert!(g.lookup("far away").is_empty());
    }

    #[test]
    fn invalid_bbox_is_ignored() {
        let b = ingest(
            &options(&CAR_PROFILE, [f64::NAN, 0.0, 0.0, 0.0]),
            vec![node(1, 5.0, 5.0, tags! {})],
        );
        assert!(b.contains(1));
    }
}
