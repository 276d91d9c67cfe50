#![allow(dead_code)]

use async_trait::async_trait;
use futures::channel::mpsc as chan;
use futures::SinkExt;
use gridpilot::common::TransportError;
use gridpilot::domains::logger::{DomainLogger, DynLogger};
use gridpilot::domains::session::{Connection, Connector};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

pub struct CaptureLogger {
    pub messages: Arc<Mutex<Vec<String>>>,
}

impl CaptureLogger {
    pub fn new() -> Arc<Self> {
        Arc::new(Self { messages: Arc::new(Mutex::new(Vec::new())) })
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.messages.lock().unwrap().iter().any(|m| m.contains(needle))
    }

    pub fn as_dyn(self: &Arc<Self>) -> DynLogger {
        self.clone()
    }
}

impl DomainLogger for CaptureLogger {
    fn info(&self, msg: &str) { self.messages.lock().unwrap().push(format!("INFO:{}", msg)); }
    fn warn(&self, msg: &str) { self.messages.lock().unwrap().push(format!("WARN:{}", msg)); }
    fn error(&self, msg: &str) { self.messages.lock().unwrap().push(format!("ERR:{}", msg)); }
}

/// The device side of one in-memory connection.
pub struct DeviceEnd {
    pub url: String,
    /// Frames pushed here arrive at the session as inbound frames.
    pub to_session: chan::UnboundedSender<Result<String, TransportError>>,
    /// Frames the session wrote. Ends when the session closes its side.
    pub from_session: chan::UnboundedReceiver<String>,
}

impl DeviceEnd {
    pub fn push(&self, frame: &str) {
        self.to_session.unbounded_send(Ok(frame.to_string())).unwrap();
    }
}

/// In-memory connector. Every successful `open` hands the device end to the
/// test through `accepted`.
pub struct FakeConnector {
    attempts: AtomicUsize,
    refuse: AtomicBool,
    urls: Mutex<Vec<String>>,
    accepted: mpsc::UnboundedSender<DeviceEnd>,
}

impl FakeConnector {
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<DeviceEnd>) {
        let (accepted, devices) = mpsc::unbounded_channel();
        let connector = Arc::new(Self {
            attempts: AtomicUsize::new(0),
            refuse: AtomicBool::new(false),
            urls: Mutex::new(Vec::new()),
            accepted,
        });
        (connector, devices)
    }

    pub fn refusing() -> Arc<Self> {
        let (connector, _devices) = Self::new();
        connector.set_refuse(true);
        connector
    }

    pub fn set_refuse(&self, refuse: bool) {
        self.refuse.store(refuse, Ordering::SeqCst);
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Connector for FakeConnector {
    async fn open(&self, url: &str) -> Result<Connection, TransportError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        self.urls.lock().unwrap().push(url.to_string());
        if self.refuse.load(Ordering::SeqCst) {
            return Err(TransportError::Handshake {
                url: url.to_string(),
                reason: "connection refused".to_string(),
            });
        }

        let (to_device, from_session) = chan::unbounded::<String>();
        let (to_session, from_device) = chan::unbounded::<Result<String, TransportError>>();
        let _ = self.accepted.send(DeviceEnd {
            url: url.to_string(),
            to_session,
            from_session,
        });

        Ok(Connection {
            outbound: Box::pin(to_device.sink_map_err(|e| TransportError::Io(e.to_string()))),
            inbound: Box::pin(from_device),
        })
    }
}

/// Lets spawned session tasks run until they block again.
pub async fn settle() {
    for _ in 0..20 {
        tokio::task::yield_now().await;
    }
}

pub const DELAY: Duration = Duration::from_secs(5);

pub fn session_config() -> gridpilot::config::SessionConfig {
    gridpilot::config::SessionConfig {
        url: "ws://rover.test:8080".to_string(),
        reconnect_delay_ms: DELAY.as_millis() as u64,
        channel_capacity: 16,
    }
}
