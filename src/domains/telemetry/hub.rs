use super::messages::{PositionEvent, SensorReading, StatusUpdate, TelemetryMessage};
use tokio::sync::broadcast;

/// Fan-out of connectivity changes and the three telemetry streams.
///
/// Every subscriber gets its own receiver. A subscriber that falls more than
/// `capacity` messages behind sees `RecvError::Lagged` instead of slowing the
/// publisher down.
#[derive(Clone)]
pub struct TelemetryHub {
    connection: broadcast::Sender<bool>,
    sensor: broadcast::Sender<SensorReading>,
    position: broadcast::Sender<PositionEvent>,
    status: broadcast::Sender<StatusUpdate>,
}

impl TelemetryHub {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (connection, _) = broadcast::channel(capacity);
        let (sensor, _) = broadcast::channel(capacity);
        let (position, _) = broadcast::channel(capacity);
        let (status, _) = broadcast::channel(capacity);
        Self {
            connection,
            sensor,
            position,
            status,
        }
    }

    pub fn subscribe_connection(&self) -> broadcast::Receiver<bool> {
        self.connection.subscribe()
    }

    pub fn subscribe_sensor(&self) -> broadcast::Receiver<SensorReading> {
        self.sensor.subscribe()
    }

    pub fn subscribe_position(&self) -> broadcast::Receiver<PositionEvent> {
        self.position.subscribe()
    }

    pub fn subscribe_status(&self) -> broadcast::Receiver<StatusUpdate> {
        self.status.subscribe()
    }

    // Send errors only mean nobody is subscribed right now.

    pub fn publish_connection(&self, connected: bool) {
        let _ = self.connection.send(connected);
    }

    /// Routes a message to exactly one stream.
    pub fn route(&self, message: TelemetryMessage) {
        match message {
            TelemetryMessage::Sensor(reading) => {
                let _ = self.sensor.send(reading);
            }
            TelemetryMessage::Position(event) => {
                let _ = self.position.send(event);
            }
            TelemetryMessage::Status(update) => {
                let _ = self.status.send(update);
            }
        }
    }
}
