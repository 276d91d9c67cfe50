use super::types::{Edge, Waypoint};
use crate::common::{DomainError, DomainResult};
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

const GRID_COLUMNS: [i32; 3] = [0, 3, 6];
const GRID_ROWS: [i32; 3] = [0, 4, 8];
/// Row of the default grid that carries no horizontal edges.
const ISOLATED_ROW: i32 = 4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeSpec {
    pub from: Waypoint,
    pub to: Waypoint,
}

/// Optional name for a waypoint, keyed by the RFID card placed on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaypointLabel {
    pub waypoint: Waypoint,
    pub card_id: String,
    pub label: String,
}

/// Declarative description of an embedded planar graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopologyConfig {
    pub waypoints: Vec<Waypoint>,
    pub edges: Vec<EdgeSpec>,
    #[serde(default)]
    pub labels: Vec<WaypointLabel>,
}

impl Default for TopologyConfig {
    /// The 3x3 track: columns 0/3/6, rows 0/4/8, no horizontal links on row 4.
    fn default() -> Self {
        let mut waypoints = Vec::new();
        for x in GRID_COLUMNS {
            for y in GRID_ROWS {
                waypoints.push(Waypoint::new(x, y));
            }
        }

        let mut edges = Vec::new();
        for x in GRID_COLUMNS {
            for pair in GRID_ROWS.windows(2) {
                edges.push(EdgeSpec {
                    from: Waypoint::new(x, pair[0]),
                    to: Waypoint::new(x, pair[1]),
                });
            }
        }
        for y in GRID_ROWS.into_iter().filter(|y| *y != ISOLATED_ROW) {
            for pair in GRID_COLUMNS.windows(2) {
                edges.push(EdgeSpec {
                    from: Waypoint::new(pair[0], y),
                    to: Waypoint::new(pair[1], y),
                });
            }
        }

        Self {
            waypoints,
            edges,
            labels: Vec::new(),
        }
    }
}

/// Undirected waypoint graph weighted by Euclidean distance.
#[derive(Debug, Clone)]
pub struct NavGraph {
    graph: UnGraph<Waypoint, f64>,
    index: HashMap<Waypoint, NodeIndex>,
    labels: Vec<WaypointLabel>,
}

/// Builds the default grid topology.
pub fn build_graph() -> NavGraph {
    NavGraph::from_topology(&TopologyConfig::default())
        .unwrap_or_else(|e| unreachable!("default topology is valid: {e}"))
}

impl NavGraph {
    pub fn from_topology(topology: &TopologyConfig) -> DomainResult<Self> {
        let invalid = |reason: String| DomainError::InvalidTopology { reason };

        let mut graph = UnGraph::with_capacity(topology.waypoints.len(), topology.edges.len());
        let mut index = HashMap::with_capacity(topology.waypoints.len());
        for waypoint in &topology.waypoints {
            if index.contains_key(waypoint) {
                return Err(invalid(format!("duplicate waypoint ({})", waypoint)));
            }
            index.insert(*waypoint, graph.add_node(*waypoint));
        }

        for edge in &topology.edges {
            let from = *index
                .get(&edge.from)
                .ok_or_else(|| invalid(format!("edge references unknown waypoint ({})", edge.from)))?;
            let to = *index
                .get(&edge.to)
                .ok_or_else(|| invalid(format!("edge references unknown waypoint ({})", edge.to)))?;
            if edge.from == edge.to {
                return Err(invalid(format!("zero-length edge at ({})", edge.from)));
            }
            if edge.from.x != edge.to.x && edge.from.y != edge.to.y {
                return Err(invalid(format!(
                    "diagonal edge ({}) - ({}) cannot be driven",
                    edge.from, edge.to
                )));
            }
            graph.add_edge(from, to, edge.from.distance_to(&edge.to));
        }

        for label in &topology.labels {
            if !index.contains_key(&label.waypoint) {
                return Err(invalid(format!(
                    "label '{}' references unknown waypoint ({})",
                    label.label, label.waypoint
                )));
            }
        }

        Ok(Self {
            graph,
            index,
            labels: topology.labels.clone(),
        })
    }

    pub fn contains(&self, waypoint: &Waypoint) -> bool {
        self.index.contains_key(waypoint)
    }

    pub fn waypoint_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn waypoints(&self) -> impl Iterator<Item = &Waypoint> {
        self.graph.node_weights()
    }

    /// Edges leaving `waypoint`, oriented so that `edge.from == *waypoint`.
    pub fn neighbors(&self, waypoint: &Waypoint) -> Vec<Edge> {
        let Some(&node) = self.index.get(waypoint) else {
            return Vec::new();
        };
        self.graph
            .edges(node)
            .map(|e| {
                let other = if e.source() == node { e.target() } else { e.source() };
                Edge {
                    from: *waypoint,
                    to: self.graph[other],
                    weight: *e.weight(),
                }
            })
            .collect()
    }

    pub fn edge_weight(&self, a: &Waypoint, b: &Waypoint) -> Option<f64> {
        let a = *self.index.get(a)?;
        let b = *self.index.get(b)?;
        self.graph
            .find_edge(a, b)
            .and_then(|e| self.graph.edge_weight(e))
            .copied()
    }

    /// Adjacency lists keyed by waypoint, every edge listed under both endpoints.
    pub fn adjacency(&self) -> BTreeMap<Waypoint, Vec<Edge>> {
        self.waypoints()
            .map(|w| (*w, self.neighbors(w)))
            .collect()
    }

    pub fn label_for_card(&self, card_id: &str) -> Option<&WaypointLabel> {
        self.labels.iter().find(|l| l.card_id == card_id)
    }

    pub fn label_for_waypoint(&self, waypoint: &Waypoint) -> Option<&WaypointLabel> {
        self.labels.iter().find(|l| l.waypoint == *waypoint)
    }
}
