// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::{Graph, GraphError};

/// Kind of maneuver starting a [Direction].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Turn {
    Start,
    Straight,
    SlightLeft,
    SlightRight,
    Left,
    Right,
    SharpLeft,
    SharpRight,
}

impl Turn {
    /// All turn kinds, in declaration order.
    pub const ALL: [Turn; 8] = [
        Turn::Start,
        Turn::Straight,
        Turn::SlightLeft,
        Turn::SlightRight,
        Turn::Left,
        Turn::Right,
        Turn::SharpLeft,
        Turn::SharpRight,
    ];

    /// Classifies a change of heading, in degrees. Negative values turn left,
    /// positive values turn right. Any angle is accepted and normalized into (-180°, 180°].
    pub fn from_bearing_change(degrees: f64) -> Self {
        let mut delta = degrees % 360.0;
        if delta > 180.0 {
            delta -= 360.0;
        } else if delta <= -180.0 {
            delta += 360.0;
        }

        let left = delta < 0.0;
        match delta.abs() {
            d if d <= 15.0 => Turn::Straight,
            d if d <= 30.0 => {
                if left {
                    Turn::SlightLeft
                } else {
                    Turn::SlightRight
                }
            }
            d if d <= 100.0 => {
                if left {
                    Turn::Left
                } else {
                    Turn::Right
                }
            }
            _ => {
                if left {
                    Turn::SharpLeft
                } else {
                    Turn::SharpRight
                }
            }
        }
    }

    /// Returns the human-readable phrase for this maneuver, e.g. "Turn left".
    pub fn phrase(self) -> &'static str {
        match self {
            Turn::Start => "Start",
            Turn::Straight => "Go straight",
            Turn::SlightLeft => "Slight left",
            Turn::SlightRight => "Slight right",
            Turn::Left => "Turn left",
            Turn::Right => "Turn right",
            Turn::SharpLeft => "Sharp left",
            Turn::SharpRight => "Sharp right",
        }
    }

    fn from_phrase(phrase: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.phrase() == phrase)
    }
}

impl fmt::Display for Turn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.phrase())
    }
}

/// A single turn-by-turn instruction: make a [Turn] onto a way,
/// and follow it for `distance` miles.
///
/// Directions are rendered (with [Display](fmt::Display)) and parsed
/// (with [FromStr]) in the following format:
///
/// ```
/// let d = waymark::Direction {
///     turn: waymark::Turn::Left,
///     way: "Shattuck Avenue".to_string(),
///     distance: 0.125,
/// };
/// let text = "Turn left on Shattuck Avenue and continue for 0.125 miles.";
/// assert_eq!(d.to_string(), text);
/// assert_eq!(text.parse::<waymark::Direction>().unwrap(), d);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Direction {
    pub turn: Turn,

    /// Name of the followed way; empty for unnamed roads.
    pub way: String,

    /// Distance traveled along the way, in miles.
    pub distance: f64,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} on {} and continue for {:.3} miles.",
            self.turn, self.way, self.distance
        )
    }
}

/// Error returned when parsing a [Direction] from text fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseDirectionError {
    #[error("direction doesn't follow the \"<turn> on <way> and continue for <distance> miles.\" format")]
    Format,

    #[error("unknown turn: {0:?}")]
    UnknownTurn(String),

    #[error("invalid distance: {0:?}")]
    InvalidDistance(String),
}

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s
            .strip_suffix(" miles.")
            .ok_or(ParseDirectionError::Format)?;
        let (head, distance) = s
            .rsplit_once(" and continue for ")
            .ok_or(ParseDirectionError::Format)?;

        // Turn phrases never contain " on ", way names might
        let (turn, way) = head
            .split_once(" on ")
            .ok_or(ParseDirectionError::Format)?;

        let turn =
            Turn::from_phrase(turn).ok_or_else(|| ParseDirectionError::UnknownTurn(turn.into()))?;

        let invalid_distance = || ParseDirectionError::InvalidDistance(distance.into());
        if !distance.bytes().all(|b| b.is_ascii_digit() || b == b'.') {
            return Err(invalid_distance());
        }
        let distance: f64 = distance.parse().map_err(|_| invalid_distance())?;

        Ok(Self {
            turn,
            way: way.to_string(),
            distance,
        })
    }
}

/// Returns the first non-empty way name shared by two vertices, or an empty string if there's none.
fn shared_way<'a>(a: &'a BTreeSet<String>, b: &'a BTreeSet<String>) -> &'a str {
    a.intersection(b)
        .find(|name| !name.is_empty())
        .map(|s| s.as_str())
        .unwrap_or("")
}

/// Turns a path (as returned by [find_route](crate::find_route)) into a list of
/// turn-by-turn [Directions](Direction).
///
/// Consecutive edges are grouped into a single direction for as long as they
/// follow the same named way. Unnamed stretches are grouped only while the
/// road goes straight on. The maneuver between two groups is classified
/// by comparing the initial bearing of the previous group with the bearing
/// of the first edge of the next group. The first direction is always [Turn::Start].
///
/// Paths with fewer than 2 vertices produce no directions.
pub fn directions(g: &Graph, path: &[i64]) -> Result<Vec<Direction>, GraphError> {
    let mut result = Vec::new();
    if path.len() < 2 {
        return Ok(result);
    }

    let mut current_way = shared_way(g.way_names(path[0])?, g.way_names(path[1])?);
    let mut distance = 0.0;
    let mut turn = Turn::Start;
    let mut segment_bearing = g.bearing(path[0], path[1])?;

    for i in 1..path.len() {
        let prev = path[i - 1];
        let curr = path[i];
        let is_last = i == path.len() - 1;
        let edge = g.distance(prev, curr)?;
        let prev_ways = g.way_names(prev)?;
        let curr_ways = g.way_names(curr)?;
        let edge_bearing = g.bearing(prev, curr)?;

        // Unnamed stretches continue while no named way is shared and the road goes straight on
        let continues = curr_ways.contains(current_way)
            || (current_way.is_empty()
                && shared_way(prev_ways, curr_ways).is_empty()
                && Turn::from_bearing_change(edge_bearing - segment_bearing) == Turn::Straight);

        if continues {
            distance += edge;
            if is_last {
                result.push(Direction {
                    turn,
                    way: current_way.to_string(),
                    distance,
                });
            }
            continue;
        }

        // The way changes at prev: wrap up the current segment and start a new one
        result.push(Direction {
            turn,
            way: current_way.to_string(),
            distance,
        });

        turn = Turn::from_bearing_change(edge_bearing - segment_bearing);
        current_way = shared_way(prev_ways, curr_ways);
        distance = edge;
        segment_bearing = edge_bearing;

        if is_last {
            result.push(Direction {
                turn,
                way: current_way.to_string(),
                distance,
            });
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GraphBuilder;

    macro_rules! assert_almost_eq {
        ($a:expr, $b:expr) => {
            assert!(
                (($a - $b).abs() < 1e-9),
                "assertion failed: {} ≈ {}",
                $a,
                $b
            )
        };
    }

    #[test]
    fn turn_classification() {
        assert_eq!(Turn::from_bearing_change(0.0), Turn::Straight);
        assert_eq!(Turn::from_bearing_change(15.0), Turn::Straight);
        assert_eq!(Turn::from_bearing_change(-15.0), Turn::Straight);
        assert_eq!(Turn::from_bearing_change(15.5), Turn::SlightRight);
        assert_eq!(Turn::from_bearing_change(-30.0), Turn::SlightLeft);
        assert_eq!(Turn::from_bearing_change(90.0), Turn::Right);
        assert_eq!(Turn::from_bearing_change(-100.0), Turn::Left);
        assert_eq!(Turn::from_bearing_change(100.5), Turn::SharpRight);
        assert_eq!(Turn::from_bearing_change(-170.0), Turn::SharpLeft);
        assert_eq!(Turn::from_bearing_change(180.0), Turn::SharpRight);
        assert_eq!(Turn::from_bearing_change(-180.0), Turn::SharpRight);
    }

    #[test]
    fn turn_classification_wraps_around() {
        // Heading 170° → -170° is a 20° right turn, not a 340° left one
        assert_eq!(Turn::from_bearing_change(-170.0 - 170.0), Turn::SlightRight);
        assert_eq!(Turn::from_bearing_change(170.0 - -170.0), Turn::SlightLeft);
        assert_eq!(Turn::from_bearing_change(270.0), Turn::Left);
        assert_eq!(Turn::from_bearing_change(-270.0), Turn::Right);
        assert_eq!(Turn::from_bearing_change(720.0), Turn::Straight);
    }

    #[test]
    fn render() {
        let d = Direction {
            turn: Turn::SharpRight,
            way: "Oak Ave".to_string(),
            distance: 1.23456,
        };
        assert_eq!(
            d.to_string(),
            "Sharp right on Oak Ave and continue for 1.235 miles.",
        );

        let unnamed = Direction {
            turn: Turn::Start,
            way: String::new(),
            distance: 0.0,
        };
        assert_eq!(unnamed.to_string(), "Start on  and continue for 0.000 miles.");
    }

    #[test]
    fn round_trip() {
        let ways = ["Main St", "", "Carry on Lane", "Ave and continue for Road", "I-80 W"];
        let distances = [0.0, 0.001, 1.5, 12.345];
        for turn in Turn::ALL {
            for way in ways {
                for distance in distances {
                    let d = Direction {
                        turn,
                        way: way.to_string(),
                        distance,
                    };
                    assert_eq!(d.to_string().parse::<Direction>(), Ok(d));
                }
            }
        }
    }

    #[test]
    fn parse_errors() {
        assert_eq!(
            "Go left on Main St and continue for 1.000 miles.".parse::<Direction>(),
            Err(ParseDirectionError::UnknownTurn("Go left".into())),
        );
        assert_eq!(
            "Turn left on Main St and continue for -1.000 miles.".parse::<Direction>(),
            Err(ParseDirectionError::InvalidDistance("-1.000".into())),
        );
        assert_eq!(
            "Turn left on Main St and continue for 1.0.0 miles.".parse::<Direction>(),
            Err(ParseDirectionError::InvalidDistance("1.0.0".into())),
        );
        assert_eq!(
            "Turn left on Main St and continue for 1.000 km.".parse::<Direction>(),
            Err(ParseDirectionError::Format),
        );
        assert_eq!(
            "Turn left and continue for 1.000 miles.".parse::<Direction>(),
            Err(ParseDirectionError::Format),
        );
        assert_eq!("".parse::<Direction>(), Err(ParseDirectionError::Format));
    }

    #[test]
    fn short_paths() {
        let mut b = GraphBuilder::new();
        b.add_vertex(1, 0.0, 0.0);
        b.add_vertex(2, 0.0, 1.0);
        b.tag_way(&[1, 2], "Main St").unwrap();
        let g = b.build();

        assert!(directions(&g, &[]).unwrap().is_empty());
        assert!(directions(&g, &[1]).unwrap().is_empty());
        assert_eq!(
            directions(&g, &[1, 2]).unwrap(),
            vec![Direction {
                turn: Turn::Start,
                way: "Main St".to_string(),
                distance: g.distance(1, 2).unwrap(),
            }],
        );
    }

    #[test]
    fn single_way() {
        let mut b = GraphBuilder::new();
        b.add_vertex(1, 0.0, 0.0);
        b.add_vertex(2, 0.0, 1.0);
        b.add_vertex(3, 0.0, 2.0);
        b.add_vertex(4, 0.0, 3.0);
        b.tag_way(&[1, 2, 3, 4], "Main St").unwrap();
        let g = b.build();

        let d = directions(&g, &[1, 2, 3, 4]).unwrap();
        assert_eq!(d.len(), 1);
        assert_eq!(d[0].turn, Turn::Start);
        assert_eq!(d[0].way, "Main St");
        assert_almost_eq!(d[0].distance, g.distance(1, 4).unwrap());
    }

    fn corner_graph() -> Graph {
        // 5   3───4
        //  \  │
        //   \ 2
        //     │
        //     1
        let mut b = GraphBuilder::new();
        b.add_vertex(1, 0.0, 0.0);
        b.add_vertex(2, 0.0, 0.01);
        b.add_vertex(3, 0.0, 0.02);
        b.add_vertex(4, 0.01, 0.02);
        b.add_vertex(5, -0.02, 0.03);
        b.tag_way(&[1, 2, 3], "Main St").unwrap();
        b.tag_way(&[3, 4], "Oak Ave").unwrap();
        b.tag_way(&[2, 5], "Diagonal").unwrap();
        b.build()
    }

    #[test]
    fn right_turn_at_path_end() {
        let g = corner_graph();
        let d = directions(&g, &[2, 3, 4]).unwrap();

        assert_eq!(d.len(), 2);
        assert_eq!(d[0].turn, Turn::Start);
        assert_eq!(d[0].way, "Main St");
        assert_almost_eq!(d[0].distance, g.distance(2, 3).unwrap());
        assert_eq!(d[1].turn, Turn::Right);
        assert_eq!(d[1].way, "Oak Ave");
        assert_almost_eq!(d[1].distance, g.distance(3, 4).unwrap());
    }

    #[test]
    fn left_turn_mid_path() {
        let g = corner_graph();
        let d = directions(&g, &[4, 3, 2, 1]).unwrap();

        assert_eq!(d.len(), 2);
        assert_eq!(d[0].turn, Turn::Start);
        assert_eq!(d[0].way, "Oak Ave");
        assert_almost_eq!(d[0].distance, g.distance(4, 3).unwrap());
        assert_eq!(d[1].turn, Turn::Left);
        assert_eq!(d[1].way, "Main St");
        assert_almost_eq!(
            d[1].distance,
            g.distance(3, 2).unwrap() + g.distance(2, 1).unwrap()
        );
    }

    #[test]
    fn sharp_and_slight_turns() {
        let g = corner_graph();

        // North on Main St, then north-west onto Diagonal: bearing change ≈ -45°
        let d = directions(&g, &[1, 2, 5]).unwrap();
        assert_eq!(
            d.iter().map(|d| (d.turn, d.way.as_str())).collect::<Vec<_>>(),
            vec![(Turn::Start, "Main St"), (Turn::Left, "Diagonal")],
        );

        // East-bound on Oak Ave, then south on Main St, then north-west on Diagonal
        let d = directions(&g, &[4, 3, 2, 5]).unwrap();
        assert_eq!(
            d.iter().map(|d| (d.turn, d.way.as_str())).collect::<Vec<_>>(),
            vec![
                (Turn::Start, "Oak Ave"),
                (Turn::Left, "Main St"),
                (Turn::SharpRight, "Diagonal"),
            ],
        );
    }

    #[test]
    fn unnamed_road() {
        let mut b = GraphBuilder::new();
        b.add_vertex(1, 0.0, 0.0);
        b.add_vertex(2, 0.0, 0.01);
        b.add_edge(1, 2).unwrap();
        let g = b.build();

        let d = directions(&g, &[1, 2]).unwrap();
        assert_eq!(d.len(), 1);
        assert_eq!(d[0].way, "");
        assert_almost_eq!(d[0].distance, g.distance(1, 2).unwrap());
    }

    #[test]
    fn unnamed_road_with_corner() {
        // 3───4───5
        // │
        // 2
        // │
        // 1
        let mut b = GraphBuilder::new();
        b.add_vertex(1, 0.0, 0.0);
        b.add_vertex(2, 0.0, 0.01);
        b.add_vertex(3, 0.0, 0.02);
        b.add_vertex(4, 0.01, 0.02);
        b.add_vertex(5, 0.02, 0.02);
        for pair in [(1, 2), (2, 3), (3, 4), (4, 5)] {
            b.add_edge(pair.0, pair.1).unwrap();
        }
        let g = b.build();

        // North, north again, then east twice
        let d = directions(&g, &[1, 2, 3, 4, 5]).unwrap();
        assert_eq!(
            d.iter().map(|d| (d.turn, d.way.as_str())).collect::<Vec<_>>(),
            vec![(Turn::Start, ""), (Turn::Right, "")],
        );
        assert_almost_eq!(
            d[0].distance,
            g.distance(1, 2).unwrap() + g.distance(2, 3).unwrap()
        );
        assert_almost_eq!(
            d[1].distance,
            g.distance(3, 4).unwrap() + g.distance(4, 5).unwrap()
        );

        let d = directions(&g, &[2, 3, 4]).unwrap();
        assert_eq!(
            d.iter().map(|d| (d.turn, d.way.as_str())).collect::<Vec<_>>(),
            vec![(Turn::Start, ""), (Turn::Right, "")],
        );
    }

    #[test]
    fn named_way_wins_over_unnamed_overlap() {
        let mut b = GraphBuilder::new();
        b.add_vertex(1, 0.0, 0.0);
        b.add_vertex(2, 0.0, 0.01);
        b.add_vertex(3, 0.0, 0.02);
        b.tag_way(&[1, 2, 3], "Main St").unwrap();
        b.tag_way(&[1, 2], "").unwrap();
        let g = b.build();

        let d = directions(&g, &[1, 2, 3]).unwrap();
        assert_eq!(d.len(), 1);
        assert_eq!(d[0].turn, Turn::Start);
        assert_eq!(d[0].way, "Main St");
        assert_almost_eq!(d[0].distance, g.distance(1, 3).unwrap());
    }

    #[test]
    fn unknown_vertex() {
        let g = corner_graph();
        assert_eq!(
            directions(&g, &[1, 2, 99]),
            Err(GraphError::UnknownVertex(99)),
        );
    }
}
