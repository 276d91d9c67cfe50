//! Persistent, self-healing command session with the rover.
//!
//! A [`SessionManager`] owns at most one live connection at a time. Every
//! connection is driven by a single link task that writes queued frames and
//! decodes inbound frames, so writes never interleave and telemetry is
//! published in arrival order. When a connection fails or drops, one
//! reconnection timer is armed; it is the only piece of deferred work the
//! manager owns and it is cancelled by `disconnect()`, by a successful
//! handshake, or by dropping the manager.

use crate::common::ProtocolError;
use crate::config::SessionConfig;
use crate::domains::logger::DynLogger;
use crate::domains::navigation::Command;
use crate::domains::session::{Connection, ConnectionState, Connector};
use crate::domains::telemetry::{wire, PositionEvent, SensorReading, StatusUpdate, TelemetryHub};
use futures::{SinkExt, StreamExt};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use uuid::Uuid;

enum Outbound {
    Frame(String),
    Close,
}

struct ReconnectTimer {
    token: u64,
    handle: JoinHandle<()>,
}

struct Core {
    url: String,
    state: ConnectionState,
    /// Bumped on every new link and on disconnect; events from an older
    /// link are ignored.
    generation: u64,
    timer_tokens: u64,
    outbound: Option<mpsc::UnboundedSender<Outbound>>,
    link: Option<JoinHandle<()>>,
    reconnect: Option<ReconnectTimer>,
}

struct Shared {
    id: Uuid,
    config: SessionConfig,
    connector: Arc<dyn Connector>,
    logger: DynLogger,
    hub: TelemetryHub,
    core: Mutex<Core>,
}

pub struct SessionManager {
    shared: Arc<Shared>,
}

impl SessionManager {
    pub fn new(config: SessionConfig, connector: Arc<dyn Connector>, logger: DynLogger) -> Self {
        let core = Core {
            url: config.url.clone(),
            state: ConnectionState::Disconnected,
            generation: 0,
            timer_tokens: 0,
            outbound: None,
            link: None,
            reconnect: None,
        };
        let shared = Shared {
            id: Uuid::new_v4(),
            hub: TelemetryHub::new(config.channel_capacity),
            config,
            connector,
            logger,
            core: Mutex::new(core),
        };
        Self {
            shared: Arc::new(shared),
        }
    }

    /// Starts connecting unless a link already exists or is being set up.
    /// Must be called from within a tokio runtime.
    pub fn connect(&self) {
        self.shared.start_link();
    }

    /// Cancels any pending reconnection and closes the active link. No
    /// reconnection follows.
    pub fn disconnect(&self) {
        self.shared.stop();
    }

    /// Queues `commands` as one `robot_actions` frame.
    ///
    /// Returns `false`, without writing anything, when the session is not
    /// connected. Delivery is at most once: nothing is retried.
    pub fn send(&self, commands: &[Command]) -> bool {
        let (state, outbound) = {
            let core = self.shared.core();
            let outbound = match core.state {
                ConnectionState::Connected => core.outbound.clone(),
                _ => None,
            };
            (core.state, outbound)
        };
        let Some(outbound) = outbound else {
            self.shared.logger.warn(&format!(
                "Session {}: cannot send {} commands while {}",
                self.shared.id,
                commands.len(),
                state
            ));
            return false;
        };

        let frame = match wire::encode_actions(commands) {
            Ok(frame) => frame,
            Err(e) => {
                self.shared
                    .logger
                    .error(&format!("Session {}: failed to encode actions: {}", self.shared.id, e));
                return false;
            }
        };
        if outbound.send(Outbound::Frame(frame)).is_err() {
            self.shared
                .logger
                .warn(&format!("Session {}: link closed before send", self.shared.id));
            return false;
        }

        self.shared
            .logger
            .info(&format!("Session {}: sent {} actions", self.shared.id, commands.len()));
        true
    }

    /// Changes the device address. An active session is restarted against
    /// the new address; otherwise the address is used by the next `connect()`.
    pub fn set_url(&self, url: impl Into<String>) {
        let url = url.into();
        let active = {
            let mut core = self.shared.core();
            core.url = url;
            core.state.is_active()
        };
        if active {
            self.disconnect();
            self.connect();
        }
    }

    pub fn url(&self) -> String {
        self.shared.core().url.clone()
    }

    pub fn state(&self) -> ConnectionState {
        self.shared.core().state
    }

    pub fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Connected
    }

    pub fn has_pending_reconnect(&self) -> bool {
        self.shared.core().reconnect.is_some()
    }

    pub fn session_id(&self) -> Uuid {
        self.shared.id
    }

    /// `true` on every successful handshake, `false` on every loss.
    pub fn subscribe_connection(&self) -> broadcast::Receiver<bool> {
        self.shared.hub.subscribe_connection()
    }

    pub fn subscribe_sensor(&self) -> broadcast::Receiver<SensorReading> {
        self.shared.hub.subscribe_sensor()
    }

    pub fn subscribe_position(&self) -> broadcast::Receiver<PositionEvent> {
        self.shared.hub.subscribe_position()
    }

    pub fn subscribe_status(&self) -> broadcast::Receiver<StatusUpdate> {
        self.shared.hub.subscribe_status()
    }
}

impl Drop for SessionManager {
    fn drop(&mut self) {
        self.shared.stop();
    }
}

impl Shared {
    fn core(&self) -> MutexGuard<'_, Core> {
        self.core.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn start_link(self: &Arc<Self>) {
        let mut core = self.core();
        if core.state.is_active() {
            return;
        }
        core.state = ConnectionState::Connecting;
        core.generation += 1;
        let generation = core.generation;
        let url = core.url.clone();
        self.logger
            .info(&format!("Session {}: connecting to {}", self.id, url));

        let shared = Arc::clone(self);
        core.link = Some(tokio::spawn(async move {
            shared.run_link(generation, url).await;
        }));
    }

    async fn run_link(self: Arc<Self>, generation: u64, url: String) {
        let Connection {
            mut outbound,
            mut inbound,
        } = match self.connector.open(&url).await {
            Ok(connection) => connection,
            Err(e) => {
                self.logger.warn(&format!("Session {}: {}", self.id, e));
                self.link_closed(generation);
                return;
            }
        };

        let (tx, mut rx) = mpsc::unbounded_channel();
        if !self.link_opened(generation, tx) {
            let _ = outbound.close().await;
            return;
        }

        let reason = loop {
            tokio::select! {
                queued = rx.recv() => match queued {
                    Some(Outbound::Frame(frame)) => {
                        if let Err(e) = outbound.send(frame).await {
                            break e.to_string();
                        }
                    }
                    // Explicit disconnect; the session state is already reset.
                    Some(Outbound::Close) | None => {
                        let _ = outbound.close().await;
                        return;
                    }
                },
                received = inbound.next() => match received {
                    Some(Ok(frame)) => self.dispatch(&frame),
                    Some(Err(e)) => break e.to_string(),
                    None => break "closed by peer".to_string(),
                },
            }
        };

        self.logger
            .warn(&format!("Session {}: connection lost ({})", self.id, reason));
        self.link_closed(generation);
    }

    fn link_opened(&self, generation: u64, outbound: mpsc::UnboundedSender<Outbound>) -> bool {
        let mut core = self.core();
        if core.generation != generation || core.state != ConnectionState::Connecting {
            return false;
        }
        core.state = ConnectionState::Connected;
        core.outbound = Some(outbound);
        if let Some(timer) = core.reconnect.take() {
            timer.handle.abort();
        }
        self.hub.publish_connection(true);
        drop(core);

        self.logger
            .info(&format!("Session {}: connected", self.id));
        true
    }

    fn link_closed(self: &Arc<Self>, generation: u64) {
        let mut core = self.core();
        if core.generation != generation {
            return;
        }
        core.state = ConnectionState::Disconnected;
        core.outbound = None;
        core.link = None;
        self.hub.publish_connection(false);
        self.schedule_reconnect(&mut core);
    }

    /// Arms the reconnection timer unless one is already pending.
    fn schedule_reconnect(self: &Arc<Self>, core: &mut Core) {
        if core.reconnect.is_some() {
            return;
        }
        core.timer_tokens += 1;
        let token = core.timer_tokens;
        let delay = self.config.reconnect_delay();
        let weak: Weak<Shared> = Arc::downgrade(self);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(shared) = weak.upgrade() {
                shared.fire_reconnect(token);
            }
        });
        core.reconnect = Some(ReconnectTimer { token, handle });
        self.logger
            .info(&format!("Session {}: reconnecting in {:?}", self.id, delay));
    }

    fn fire_reconnect(self: &Arc<Self>, token: u64) {
        {
            let mut core = self.core();
            // A timer cancelled while already running must not reconnect.
            if core.reconnect.as_ref().map(|timer| timer.token) != Some(token) {
                return;
            }
            core.reconnect = None;
        }
        self.logger
            .info(&format!("Session {}: attempting to reconnect", self.id));
        self.start_link();
    }

    fn stop(&self) {
        let mut core = self.core();
        if let Some(timer) = core.reconnect.take() {
            timer.handle.abort();
        }
        core.generation += 1;
        let link = core.link.take();
        match core.outbound.take() {
            Some(outbound) => {
                let _ = outbound.send(Outbound::Close);
            }
            None => {
                if let Some(link) = link {
                    link.abort();
                }
            }
        }

        let previous = core.state;
        core.state = ConnectionState::Disconnected;
        if previous == ConnectionState::Connected {
            self.hub.publish_connection(false);
        }
        drop(core);

        if previous.is_active() {
            self.logger
                .info(&format!("Session {}: disconnected", self.id));
        }
    }

    fn dispatch(&self, frame: &str) {
        match wire::decode_frame(frame) {
            Ok(message) => self.hub.route(message),
            Err(ProtocolError::UnknownType(kind)) => self.logger.warn(&format!(
                "Session {}: unknown message type '{}' dropped",
                self.id, kind
            )),
            Err(e) => self
                .logger
                .error(&format!("Session {}: dropped malformed frame: {}", self.id, e)),
        }
    }
}
