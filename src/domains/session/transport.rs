use crate::common::TransportError;
use async_trait::async_trait;
use futures::{Sink, Stream};
use std::pin::Pin;

/// Outbound half of a live connection; one item is one text frame.
pub type FrameSink = Pin<Box<dyn Sink<String, Error = TransportError> + Send>>;

/// Inbound half of a live connection. The stream ends when the peer closes.
pub type FrameStream = Pin<Box<dyn Stream<Item = Result<String, TransportError>> + Send>>;

pub struct Connection {
    pub outbound: FrameSink,
    pub inbound: FrameStream,
}

/// Port the session manager uses to reach the device.
/// Adapters provide WebSocket or in-memory transports.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Opens a connection and completes the handshake.
    async fn open(&self, url: &str) -> Result<Connection, TransportError>;
}
