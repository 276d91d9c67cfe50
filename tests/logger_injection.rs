mod common;

use common::{session_config, CaptureLogger, FakeConnector};
use gridpilot::adapters::inbound::FileTopologySource;
use gridpilot::adapters::outbound::{init_buffered_logger, init_noop_logger, MultiLogger};
use gridpilot::application::{NavigationService, RouteDispatch, SessionManager};
use gridpilot::common::{ApplicationError, DomainError};
use gridpilot::domains::logger::DomainLogger;
use gridpilot::domains::navigation::{
    Command, Heading, StaticTopology, TopologyConfig, Waypoint,
};
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn test_buffered_and_noop_logger() {
    let capture = CaptureLogger::new();

    // Small capacity so the background drain is exercised.
    let buffered = init_buffered_logger(capture.as_dyn(), 8);

    buffered.info("one");
    buffered.warn("two");
    buffered.error("three");

    tokio::time::sleep(Duration::from_millis(50)).await;

    assert!(capture.contains("INFO:one"));
    assert!(capture.contains("WARN:two"));
    assert!(capture.contains("ERR:three"));

    let noop = init_noop_logger();
    noop.info("ignored");
    noop.error("ignored-err");
}

#[test]
fn test_multi_logger_fans_out() {
    let first = CaptureLogger::new();
    let second = CaptureLogger::new();
    let multi = MultiLogger::new(vec![first.as_dyn(), second.as_dyn()]);

    multi.warn("battery low");

    assert!(first.contains("WARN:battery low"));
    assert!(second.contains("WARN:battery low"));
}

#[test]
fn test_navigation_service_logs_topology_and_routes() {
    let capture = CaptureLogger::new();
    let service = NavigationService::from_source(
        &StaticTopology(TopologyConfig::default()),
        Heading::North,
        capture.as_dyn(),
    )
    .unwrap();
    assert!(capture.contains("INFO:Loaded topology with 9 waypoints and 10 edges"));

    let route = service.plan_route(Waypoint::new(0, 8), Waypoint::new(0, 0)).unwrap();
    assert_eq!(route.commands, vec![Command::Advance, Command::Advance, Command::Halt]);
    assert_eq!(route.distance, 8.0);
    assert!(capture.contains("INFO:Route (0,8) -> (0,0)"));

    assert!(service.plan_route(Waypoint::new(0, 0), Waypoint::new(2, 2)).is_none());
    assert!(capture.contains("WARN:No route from (0,0) to (2,2)"));
}

#[test]
fn test_navigation_service_reports_bad_source() {
    let dir = tempfile::tempdir().unwrap();
    let source = FileTopologySource::new(dir.path().join("absent.toml"));
    let result = NavigationService::from_source(&source, Heading::North, init_noop_logger());
    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::InfrastructureError(_)))
    ));
}

#[tokio::test]
async fn test_dispatch_route_without_session_is_rejected() {
    let capture = CaptureLogger::new();
    let connector: Arc<FakeConnector> = FakeConnector::refusing();
    let session = SessionManager::new(session_config(), connector.clone(), capture.as_dyn());
    let service = NavigationService::from_source(
        &StaticTopology(TopologyConfig::default()),
        Heading::East,
        capture.as_dyn(),
    )
    .unwrap();

    match service.dispatch_route(&session, Waypoint::new(0, 0), Waypoint::new(6, 0)) {
        RouteDispatch::Rejected(route) => {
            assert_eq!(route.commands, vec![Command::Advance, Command::Advance, Command::Halt]);
        }
        other => panic!("Expected Rejected, got {:?}", other),
    }
    assert!(capture.contains("cannot send 3 commands while disconnected"));
    assert_eq!(connector.attempts(), 0);

    assert_eq!(
        service.dispatch_route(&session, Waypoint::new(0, 0), Waypoint::new(9, 9)),
        RouteDispatch::NoRoute
    );
}
