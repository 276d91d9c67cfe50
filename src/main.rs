use gridpilot::adapters::inbound::FileTopologySource;
use gridpilot::adapters::outbound::{init_combined_logger, WebSocketConnector};
use gridpilot::application::{NavigationService, RouteDispatch, SessionManager};
use gridpilot::domains::navigation::{NavGraph, StaticTopology, TopologySource, Waypoint};
use gridpilot::Config;
use std::error::Error;
use std::fmt::Debug;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const CONNECT_WAIT: Duration = Duration::from_secs(10);

/// Usage: `gridpilot [START GOAL]`, waypoints written as `x,y`.
/// The config file is `config.toml` unless `GRIDPILOT_CONFIG` names another.
#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config_path = std::env::var("GRIDPILOT_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));
    let config = Config::load(Some(config_path.as_path()))?;

    // set_global_default leaves the `log` facade free for fast_log.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing::subscriber::set_global_default(
        tracing_subscriber::fmt().with_env_filter(filter).finish(),
    )?;

    info!("Starting gridpilot");

    let level = config
        .logging
        .level
        .parse::<log::LevelFilter>()
        .unwrap_or(log::LevelFilter::Info);
    let logger = init_combined_logger(config.logging.file.as_deref(), level);

    let source: Box<dyn TopologySource> = match &config.navigation.topology_file {
        Some(path) => Box::new(FileTopologySource::new(path)),
        None => Box::new(StaticTopology(config.topology.clone())),
    };
    let navigation = NavigationService::from_source(
        source.as_ref(),
        config.navigation.initial_heading,
        logger.clone(),
    )?;

    let session = SessionManager::new(
        config.session.clone(),
        Arc::new(WebSocketConnector::new()),
        logger.clone(),
    );
    spawn_telemetry_loggers(&session, navigation.graph().clone());
    session.connect();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if let [start, goal] = args.as_slice() {
        let start: Waypoint = start.parse()?;
        let goal: Waypoint = goal.parse()?;
        if !wait_for_connection(&session, CONNECT_WAIT).await {
            warn!("Device not reachable at {} after {:?}", session.url(), CONNECT_WAIT);
        }
        match navigation.dispatch_route(&session, start, goal) {
            RouteDispatch::Sent(route) => info!("Route sent: {:?}", route.commands),
            RouteDispatch::Rejected(route) => {
                warn!("Not connected, route of {} commands not sent", route.commands.len())
            }
            RouteDispatch::NoRoute => warn!("No route from ({}) to ({})", start, goal),
        }
    }

    tokio::signal::ctrl_c().await?;
    info!("Shutting down gridpilot");
    session.disconnect();

    Ok(())
}

async fn wait_for_connection(session: &SessionManager, limit: Duration) -> bool {
    let mut connection = session.subscribe_connection();
    if session.is_connected() {
        return true;
    }
    let wait = async {
        loop {
            match connection.recv().await {
                Ok(true) => return true,
                Ok(false) | Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => return false,
            }
        }
    };
    tokio::time::timeout(limit, wait).await.unwrap_or(false)
}

fn spawn_telemetry_loggers(session: &SessionManager, graph: NavGraph) {
    spawn_stream_logger("connection", session.subscribe_connection());
    spawn_stream_logger("sensor", session.subscribe_sensor());
    spawn_stream_logger("status", session.subscribe_status());

    let mut positions = session.subscribe_position();
    tokio::spawn(async move {
        loop {
            match positions.recv().await {
                Ok(event) => {
                    let label = graph
                        .label_for_card(&event.card_id)
                        .map(|l| l.label.as_str())
                        .unwrap_or("unlabelled");
                    info!("position: card {} at ({}) [{}]", event.card_id, event.position, label);
                }
                Err(RecvError::Lagged(skipped)) => warn!("position: skipped {} events", skipped),
                Err(RecvError::Closed) => break,
            }
        }
    });
}

fn spawn_stream_logger<T>(name: &'static str, mut receiver: broadcast::Receiver<T>)
where
    T: Debug + Clone + Send + 'static,
{
    tokio::spawn(async move {
        loop {
            match receiver.recv().await {
                Ok(item) => info!("{}: {:?}", name, item),
                Err(RecvError::Lagged(skipped)) => warn!("{}: skipped {} messages", name, skipped),
                Err(RecvError::Closed) => break,
            }
        }
    });
}
