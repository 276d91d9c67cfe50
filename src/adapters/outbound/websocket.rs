use crate::common::TransportError;
use crate::domains::session::{Connection, Connector};
use async_trait::async_trait;
use futures::{future, SinkExt, StreamExt};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};

/// [`Connector`] speaking text-frame WebSocket, the transport of the rover's
/// on-board bridge.
#[derive(Debug, Default, Clone)]
pub struct WebSocketConnector;

impl WebSocketConnector {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Connector for WebSocketConnector {
    async fn open(&self, url: &str) -> Result<Connection, TransportError> {
        let (stream, _response) = connect_async(url).await.map_err(|e| TransportError::Handshake {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        let (sink, stream) = stream.split();

        let outbound = sink
            .with(|frame: String| future::ready(Ok::<_, WsError>(Message::Text(frame))))
            .sink_map_err(|e| TransportError::Io(e.to_string()));

        // Control frames are handled by tungstenite; a Close frame is followed
        // by the end of the stream.
        let inbound = stream.filter_map(|item| {
            future::ready(match item {
                Ok(Message::Text(text)) => Some(Ok(text)),
                Ok(Message::Binary(bytes)) => Some(Ok(String::from_utf8_lossy(&bytes).into_owned())),
                Ok(_) => None,
                Err(WsError::ConnectionClosed) | Err(WsError::AlreadyClosed) => {
                    Some(Err(TransportError::Closed("peer closed the connection".to_string())))
                }
                Err(e) => Some(Err(TransportError::Io(e.to_string()))),
            })
        });

        Ok(Connection {
            outbound: Box::pin(outbound),
            inbound: Box::pin(inbound),
        })
    }
}
