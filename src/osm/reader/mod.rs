// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::fs::File;
use std::io::{self, BufRead};
use std::path::Path;

use ingest::Ingester;

use crate::osm::Profile;
use crate::{Graph, GraphBuilder, GraphError};

mod ingest;
mod model;
mod xml;

/// Format of the input OSM file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Unknown format - guess the format based on the content
    Unknown,

    /// Force uncompressed [OSM XML](https://wiki.openstreetmap.org/wiki/OSM_XML)
    Xml,

    /// Force [OSM XML](https://wiki.openstreetmap.org/wiki/OSM_XML)
    /// with [gzip](https://en.wikipedia.org/wiki/Gzip) compression
    XmlGz,

    /// Force [OSM XML](https://wiki.openstreetmap.org/wiki/OSM_XML)
    /// with [bzip2](https://en.wikipedia.org/wiki/Bzip2) compression
    XmlBz2,
}

impl FileFormat {
    /// Guesses the format of a file by looking at its first few bytes.
    /// Anything which is neither gzip- nor bzip2-compressed is assumed to be plain XML.
    pub fn detect(head: &[u8]) -> Self {
        if head.starts_with(b"\x1F\x8B") {
            Self::XmlGz
        } else if head.starts_with(b"BZh") {
            Self::XmlBz2
        } else {
            Self::Xml
        }
    }
}

/// Additional controls for interpreting OSM data as a routing [Graph].
#[derive(Debug)]
pub struct Options<'a> {
    /// Decides which OSM ways become roads of the [Graph].
    pub profile: &'a Profile<'a>,

    /// Format of the input data.
    pub file_format: FileFormat,

    /// Filter nodes by a specific bounding box. In order: left (min lon), bottom (min lat),
    /// right (max lon), top (max lat). Ignored if all values are set to zero, or at least one
    /// of them is not finite.
    pub bbox: [f64; 4],
}

/// Error which can occur when loading OSM data.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("xml: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Parse OSM features from a reader into a [GraphBuilder] as per the provided [Options].
///
/// The provided stream will be automatically wrapped in a buffered reader when needed.
pub fn add_features_from_io<R: io::Read>(
    b: &mut GraphBuilder,
    options: &Options<'_>,
    reader: R,
) -> Result<(), Error> {
    match options.file_format {
        FileFormat::Unknown => {
            let mut r = io::BufReader::new(reader);
            let format = FileFormat::detect(r.fill_buf()?);
            log::debug!("detected file format: {format:?}");
            add_features_with_format(b, options, format, r)
        }
        format => add_features_with_format(b, options, format, reader),
    }
}

fn add_features_with_format<R: io::Read>(
    b: &mut GraphBuilder,
    options: &Options<'_>,
    format: FileFormat,
    reader: R,
) -> Result<(), Error> {
    match format {
        FileFormat::Unknown | FileFormat::Xml => {
            let r = xml::Reader::from_io(io::BufReader::new(reader));
            Ingester::new(b, options).add_features(r.map(|f| f.map_err(Error::from)))
        }

        FileFormat::XmlGz => {
            let d = flate2::read::MultiGzDecoder::new(reader);
            let r = xml::Reader::from_io(io::BufReader::new(d));
            Ingester::new(b, options).add_features(r.map(|f| f.map_err(Error::from)))
        }

        FileFormat::XmlBz2 => {
            let d = bzip2::read::MultiBzDecoder::new(reader);
            let r = xml::Reader::from_io(io::BufReader::new(d));
            Ingester::new(b, options).add_features(r.map(|f| f.map_err(Error::from)))
        }
    }
}

/// Parse OSM features from a file at the provided path into a [GraphBuilder]
/// as per the provided [Options].
pub fn add_features_from_file<P: AsRef<Path>>(
    b: &mut GraphBuilder,
    options: &Options<'_>,
    path: P,
) -> Result<(), Error> {
    let f = File::open(path)?;
    add_features_from_io(b, options, f)
}

/// Parse OSM features from a static buffer into a [GraphBuilder] as per the provided [Options].
pub fn add_features_from_buffer(
    b: &mut GraphBuilder,
    options: &Options<'_>,
    data: &[u8],
) -> Result<(), Error> {
    let format = match options.file_format {
        FileFormat::Unknown => FileFormat::detect(data),
        format => format,
    };

    if format == FileFormat::Xml {
        // Fast path is available for in-memory XML data
        let r = xml::Reader::from_buffer(data);
        Ingester::new(b, options).add_features(r.map(|f| f.map_err(Error::from)))
    } else {
        add_features_with_format(b, options, format, data)
    }
}

/// Loads a whole OSM file into a pruned, read-only [Graph].
pub fn load_file<P: AsRef<Path>>(options: &Options<'_>, path: P) -> Result<Graph, Error> {
    let mut b = GraphBuilder::new();
    add_features_from_file(&mut b, options, path)?;
    Ok(b.build())
}
