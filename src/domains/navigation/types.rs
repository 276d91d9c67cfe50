use crate::common::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A navigable grid location. Identity is the coordinate pair.
///
/// The derived ordering (x, then y) is what the planner uses to break ties,
/// so it must stay stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Waypoint {
    pub x: i32,
    pub y: i32,
}

impl Waypoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Waypoint) -> f64 {
        let dx = f64::from(other.x) - f64::from(self.x);
        let dy = f64::from(other.y) - f64::from(self.y);
        (dx * dx + dy * dy).sqrt()
    }
}

impl fmt::Display for Waypoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

impl FromStr for Waypoint {
    type Err = DomainError;

    /// Parses the `"x,y"` key form, surrounding whitespace and parentheses allowed.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| DomainError::InvalidWaypoint {
            input: s.to_string(),
            reason: reason.to_string(),
        };
        let trimmed = s.trim().trim_start_matches('(').trim_end_matches(')');
        let (x, y) = trimmed
            .split_once(',')
            .ok_or_else(|| invalid("expected 'x,y'"))?;
        let x = x.trim().parse().map_err(|_| invalid("x is not an integer"))?;
        let y = y.trim().parse().map_err(|_| invalid("y is not an integer"))?;
        Ok(Waypoint { x, y })
    }
}

/// An undirected adjacency as seen from `from`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub from: Waypoint,
    pub to: Waypoint,
    pub weight: f64,
}

/// Result of a successful shortest-path query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathResult {
    pub path: Vec<Waypoint>,
    pub distance: f64,
}

impl PathResult {
    pub fn start(&self) -> Option<&Waypoint> {
        self.path.first()
    }

    pub fn goal(&self) -> Option<&Waypoint> {
        self.path.last()
    }
}

/// Compass orientation. Discriminants are the turn arithmetic order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Heading {
    #[default]
    North = 0,
    East = 1,
    South = 2,
    West = 3,
}

impl Heading {
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Clockwise quarter turns needed to face `target`, in `0..4`.
    pub fn quarter_turns_to(self, target: Heading) -> u8 {
        (target.index() + 4 - self.index()) % 4
    }
}

/// Abstract actuator command. Wire names live in the telemetry wire codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Advance,
    TurnLeft,
    TurnRight,
    Halt,
}

impl Command {
    pub const ALL: [Command; 4] = [
        Command::Advance,
        Command::TurnLeft,
        Command::TurnRight,
        Command::Halt,
    ];
}

/// A planned path together with the commands that drive it.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub path: Vec<Waypoint>,
    pub distance: f64,
    pub commands: Vec<Command>,
}
