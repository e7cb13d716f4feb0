use std::error::Error;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Debug, thiserror::Error)]
#[error("{0}: {1}")]
struct GraphLoadError(PathBuf, #[source] waymark::osm::Error);

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ProfileName {
    Car,
    Bicycle,
    Foot,
}

impl ProfileName {
    fn profile(self) -> &'static waymark::osm::Profile<'static> {
        match self {
            Self::Car => &waymark::osm::CAR_PROFILE,
            Self::Bicycle => &waymark::osm::BICYCLE_PROFILE,
            Self::Foot => &waymark::osm::FOOT_PROFILE,
        }
    }
}

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// The path to the OSM file (plain, gzip- or bzip2-compressed XML)
    osm_file: PathBuf,

    /// Which ways are considered roads
    #[arg(long, value_enum, default_value = "car")]
    profile: ProfileName,

    /// Only load nodes within "min_lon,min_lat,max_lon,max_lat"
    #[arg(long, value_parser = parse_bbox, allow_hyphen_values = true)]
    bbox: Option<[f64; 4]>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print turn-by-turn directions between two positions
    #[command(allow_negative_numbers = true)]
    Route {
        /// Longitude of the start point
        start_lon: f64,

        /// Latitude of the start point
        start_lat: f64,

        /// Longitude of the destination
        dest_lon: f64,

        /// Latitude of the destination
        dest_lat: f64,
    },

    /// Print names of all places starting with the given prefix
    Search { prefix: String },

    /// Print all places with the given name
    Lookup { name: String },
}

fn parse_bbox(s: &str) -> Result<[f64; 4], String> {
    let values = s
        .split(',')
        .map(|part| part.trim().parse::<f64>().map_err(|e| format!("{part:?}: {e}")))
        .collect::<Result<Vec<_>, _>>()?;
    values
        .try_into()
        .map_err(|v: Vec<f64>| format!("expected 4 comma-separated values, got {}", v.len()))
}

pub fn main() -> Result<(), Box<dyn Error>> {
    colog::init();
    let cli = Cli::parse();

    let g = load_graph(&cli.osm_file, cli.profile, cli.bbox)?;

    match cli.command {
        Command::Route {
            start_lon,
            start_lat,
            dest_lon,
            dest_lat,
        } => {
            let route = waymark::route(&g, start_lon, start_lat, dest_lon, dest_lat)?;
            if route.is_empty() {
                println!("No route found.");
            } else {
                for direction in waymark::directions(&g, &route)? {
                    println!("{direction}");
                }
            }
        }

        Command::Search { prefix } => {
            for name in g.search(&prefix) {
                println!("{name}");
            }
        }

        Command::Lookup { name } => {
            for loc in g.locations_named(&name) {
                println!("{}\t{}\t{}\t{}", loc.id, loc.lon, loc.lat, loc.name);
            }
        }
    }

    Ok(())
}

fn load_graph<P: AsRef<Path>>(
    path: P,
    profile: ProfileName,
    bbox: Option<[f64; 4]>,
) -> Result<waymark::Graph, GraphLoadError> {
    let options = waymark::osm::Options {
        profile: profile.profile(),
        file_format: waymark::osm::FileFormat::Unknown,
        bbox: bbox.unwrap_or([0.0; 4]),
    };
    waymark::osm::load_file(&options, path.as_ref())
        .map_err(|e| GraphLoadError(PathBuf::from(path.as_ref()), e))
}
