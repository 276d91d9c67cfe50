use gridpilot::adapters::inbound::FileTopologySource;
use gridpilot::common::DomainError;
use gridpilot::config::Config;
use gridpilot::domains::navigation::{Heading, NavGraph, TopologyConfig, TopologySource, Waypoint};
use std::fs;
use std::time::Duration;
use tempfile::tempdir;

const TOPOLOGY_TOML: &str = r#"
waypoints = [
    { x = 0, y = 0 },
    { x = 4, y = 0 },
    { x = 4, y = 3 },
]

[[edges]]
from = { x = 0, y = 0 }
to = { x = 4, y = 0 }

[[edges]]
from = { x = 4, y = 0 }
to = { x = 4, y = 3 }

[[labels]]
waypoint = { x = 4, y = 3 }
card_id = "D4"
label = "charger"
"#;

#[test]
fn test_defaults() {
    let config = Config::default();
    assert_eq!(config.session.url, "ws://localhost:8080");
    assert_eq!(config.session.reconnect_delay(), Duration::from_secs(5));
    assert_eq!(config.navigation.initial_heading, Heading::North);
    assert!(config.navigation.topology_file.is_none());
    assert_eq!(config.topology, TopologyConfig::default());
    assert_eq!(config.logging.level, "info");
}

#[tokio::test]
async fn test_from_file_fills_missing_sections() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("gridpilot.toml");
    fs::write(
        &path,
        r#"
[session]
url = "ws://rover.local:9000"
reconnect_delay_ms = 250

[navigation]
initial_heading = "east"
"#,
    )
    .unwrap();

    let config = Config::from_file(&path).await.unwrap();
    assert_eq!(config.session.url, "ws://rover.local:9000");
    assert_eq!(config.session.reconnect_delay(), Duration::from_millis(250));
    assert_eq!(config.session.channel_capacity, 64);
    assert_eq!(config.navigation.initial_heading, Heading::East);
    assert_eq!(config.topology.waypoints.len(), 9);
    assert_eq!(config.logging.level, "info");
}

#[tokio::test]
async fn test_from_file_with_embedded_topology() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("gridpilot.toml");
    let content = format!("[topology]\n{}", TOPOLOGY_TOML.replace("[[", "[[topology."));
    fs::write(&path, content).unwrap();

    let config = Config::from_file(&path).await.unwrap();
    let graph = NavGraph::from_topology(&config.topology).unwrap();
    assert_eq!(graph.waypoint_count(), 3);
    assert_eq!(graph.edge_weight(&Waypoint::new(0, 0), &Waypoint::new(4, 0)), Some(4.0));
    assert_eq!(graph.label_for_card("D4").unwrap().label, "charger");
}

#[tokio::test]
async fn test_from_file_missing_is_error() {
    let dir = tempdir().unwrap();
    assert!(Config::from_file(dir.path().join("absent.toml")).await.is_err());
}

#[test]
fn test_load_layers_file_and_environment() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("gridpilot.toml");
    fs::write(
        &path,
        r#"
[session]
url = "ws://from-file:8080"
reconnect_delay_ms = 1000

[logging]
level = "debug"
"#,
    )
    .unwrap();

    std::env::set_var("GRIDPILOT__SESSION__RECONNECT_DELAY_MS", "2500");
    let config = Config::load(Some(path.as_path()));
    std::env::remove_var("GRIDPILOT__SESSION__RECONNECT_DELAY_MS");
    let config = config.unwrap();

    assert_eq!(config.session.url, "ws://from-file:8080");
    assert_eq!(config.session.reconnect_delay_ms, 2500);
    assert_eq!(config.session.channel_capacity, 64);
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.topology.edges.len(), 10);
}

#[test]
fn test_load_without_file_uses_defaults() {
    let dir = tempdir().unwrap();
    let config = Config::load(Some(dir.path().join("absent.toml").as_path())).unwrap();
    assert_eq!(config.session.url, "ws://localhost:8080");
    assert_eq!(config.topology.waypoints.len(), 9);
}

#[test]
fn test_topology_file_toml() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("track.toml");
    fs::write(&path, TOPOLOGY_TOML).unwrap();

    let source = FileTopologySource::new(&path);
    assert_eq!(source.path(), path.as_path());
    let topology = source.load_topology().unwrap();
    assert_eq!(topology.edges.len(), 2);
    assert_eq!(topology.labels[0].card_id, "D4");
}

#[test]
fn test_topology_file_json() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("track.json");
    fs::write(
        &path,
        r#"{
  "waypoints": [{"x": 0, "y": 0}, {"x": 0, "y": 5}],
  "edges": [{"from": {"x": 0, "y": 0}, "to": {"x": 0, "y": 5}}]
}"#,
    )
    .unwrap();

    let topology = FileTopologySource::new(&path).load_topology().unwrap();
    assert!(topology.labels.is_empty());
    let graph = NavGraph::from_topology(&topology).unwrap();
    assert_eq!(graph.edge_weight(&Waypoint::new(0, 5), &Waypoint::new(0, 0)), Some(5.0));
}

#[test]
fn test_topology_file_errors() {
    let dir = tempdir().unwrap();

    let missing = FileTopologySource::new(dir.path().join("absent.toml"));
    assert!(matches!(missing.load_topology(), Err(DomainError::InfrastructureError(_))));

    let broken = dir.path().join("broken.toml");
    fs::write(&broken, "waypoints = 3").unwrap();
    assert!(matches!(
        FileTopologySource::new(&broken).load_topology(),
        Err(DomainError::InvalidTopology { .. })
    ));

    let broken_json = dir.path().join("broken.json");
    fs::write(&broken_json, "{").unwrap();
    assert!(matches!(
        FileTopologySource::new(&broken_json).load_topology(),
        Err(DomainError::SerializationError(_))
    ));
}
