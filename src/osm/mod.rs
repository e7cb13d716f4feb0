// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Loading of [OpenStreetMap](https://www.openstreetmap.org/) data into a [Graph](crate::Graph).

mod profile;
mod reader;

pub use profile::{Profile, BICYCLE_PROFILE, CAR_PROFILE, FOOT_PROFILE};
pub use reader::{
    add_features_from_buffer, add_features_from_file, add_features_from_io, load_file, Error,
    FileFormat, Options,
};
