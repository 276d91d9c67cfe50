use super::session_manager::SessionManager;
use crate::common::ApplicationResult;
use crate::domains::logger::DynLogger;
use crate::domains::navigation::{
    compile, shortest_path, Heading, NavGraph, Route, TopologySource, Waypoint,
};

/// Outcome of asking the rover to drive between two waypoints.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteDispatch {
    /// The route was queued on the live session.
    Sent(Route),
    /// A route exists but the session was not connected; nothing was sent.
    Rejected(Route),
    /// The endpoints are unknown or not connected in the topology.
    NoRoute,
}

pub struct NavigationService {
    graph: NavGraph,
    initial_heading: Heading,
    logger: DynLogger,
}

impl NavigationService {
    pub fn new(graph: NavGraph, initial_heading: Heading, logger: DynLogger) -> Self {
        Self {
            graph,
            initial_heading,
            logger,
        }
    }

    pub fn from_source(
        source: &dyn TopologySource,
        initial_heading: Heading,
        logger: DynLogger,
    ) -> ApplicationResult<Self> {
        let topology = source.load_topology()?;
        let graph = NavGraph::from_topology(&topology)?;
        logger.info(&format!(
            "Loaded topology with {} waypoints and {} edges",
            graph.waypoint_count(),
            graph.edge_count()
        ));
        Ok(Self::new(graph, initial_heading, logger))
    }

    pub fn graph(&self) -> &NavGraph {
        &self.graph
    }

    pub fn initial_heading(&self) -> Heading {
        self.initial_heading
    }

    /// Shortest route and its commands, assuming the device starts facing
    /// the configured initial heading.
    pub fn plan_route(&self, start: Waypoint, goal: Waypoint) -> Option<Route> {
        let Some(result) = shortest_path(&self.graph, start, goal) else {
            self.logger
                .warn(&format!("No route from ({}) to ({})", start, goal));
            return None;
        };
        let commands = compile(&result.path, self.initial_heading);
        self.logger.info(&format!(
            "Route ({}) -> ({}): {} waypoints, distance {:.2}, {} commands",
            start,
            goal,
            result.path.len(),
            result.distance,
            commands.len()
        ));
        Some(Route {
            path: result.path,
            distance: result.distance,
            commands,
        })
    }

    pub fn dispatch_route(&self, session: &SessionManager, start: Waypoint, goal: Waypoint) -> RouteDispatch {
        match self.plan_route(start, goal) {
            None => RouteDispatch::NoRoute,
            Some(route) if session.send(&route.commands) => RouteDispatch::Sent(route),
            Some(route) => RouteDispatch::Rejected(route),
        }
    }
}
