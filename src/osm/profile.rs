// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::HashMap;

/// Describes which OSM ways become roads of a [Graph](crate::Graph).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Profile<'a> {
    /// Human readable name of the routing profile,
    /// customary the most specific [access tag](https://wiki.openstreetmap.org/wiki/Key:access).
    ///
    /// This value is not used for actual OSM data interpretation.
    pub name: &'a str,

    /// Values of the [highway](https://wiki.openstreetmap.org/wiki/Key:highway) tag
    /// of ways which can be used for routing. Ways with any other (or missing)
    /// highway tag are ignored.
    pub highways: &'a [&'a str],

    /// Array of OSM [access tags](https://wiki.openstreetmap.org/wiki/Key:access#Land-based_transportation)
    /// (in order from least to most specific) to consider when checking for road prohibitions.
    /// See [Profile::is_allowed].
    pub access: &'a [&'a str],

    /// Force no routing over [motorroad=yes](https://wiki.openstreetmap.org/wiki/Key:motorroad) ways.
    pub disallow_motorroad: bool,
}

impl Profile<'_> {
    /// Returns true if a way with the given tags should be turned into a road:
    /// its highway value is listed in [Profile::highways] and it is [allowed](Profile::is_allowed).
    pub fn is_routable(&self, tags: &HashMap<String, String>) -> bool {
        match tags.get("highway") {
            Some(highway) => self.highways.contains(&highway.as_str()) && self.is_allowed(tags),
            None => false,
        }
    }

    /// Checks the access tags of a way.
    ///
    /// The most specific access tag present decides; "no" and "private" prohibit routing.
    pub fn is_allowed(&self, tags: &HashMap<String, String>) -> bool {
        // Check against the motorroad tag
        if self.disallow_motorroad && tags.get("motorroad").map(|v| v.as_str()) == Some("yes") {
            return false;
        }

        // Check against the access tags
        !matches!(
            self.access
                .iter()
                .rev()
                .find_map(|&mode| tags.get(mode).map(|v| v.as_str())),
            Some("no") | Some("private")
        )
    }

    /// Returns the name under which a way is known, or an empty string for unnamed ways.
    pub fn way_name<'t>(&self, tags: &'t HashMap<String, String>) -> &'t str {
        tags.get("name").map(|v| v.as_str()).unwrap_or("")
    }
}

/// Car routing profile.
pub const CAR_PROFILE: Profile = Profile {
    name: "motorcar",
    highways: &[
        "motorway",
        "motorway_link",
        "trunk",
        "trunk_link",
        "primary",
        "primary_link",
        "secondary",
        "secondary_link",
        "tertiary",
        "tertiary_link",
        "unclassified",
        "minor",
        "residential",
        "living_street",
        "track",
        "service",
    ],
    access: &["access", "vehicle", "motor_vehicle", "motorcar"],
    disallow_motorroad: false,
};

/// Bicycle routing profile.
pub const BICYCLE_PROFILE: Profile = Profile {
    name: "bicycle",
    highways: &[
        "trunk",
        "trunk_link",
        "primary",
        "primary_link",
        "secondary",
        "secondary_link",
        "tertiary",
        "tertiary_link",
        "unclassified",
        "minor",
        "cycleway",
        "residential",
        "living_street",
        "track",
        "service",
        "bridleway",
        "footway",
        "steps",
        "path",
    ],
    access: &["access", "vehicle", "bicycle"],
    disallow_motorroad: true,
};

/// Pedestrian routing profile.
pub const FOOT_PROFILE: Profile = Profile {
    name: "foot",
    highways: &[
        "trunk",
        "trunk_link",
        "primary",
        "primary_link",
        "secondary",
        "secondary_link",
        "tertiary",
        "tertiary_link",
        "unclassified",
        "minor",
        "residential",
        "living_street",
        "track",
        "service",
        "bridleway",
        "footway",
        "path",
        "steps",
        "pedestrian",
        "platform",
    ],
    access: &["access", "foot"],
    disallow_motorroad: true,
};
