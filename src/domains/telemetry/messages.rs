use crate::domains::navigation::{Command, Waypoint};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    /// Percentage, 0-100.
    #[serde(alias = "soilMoisture")]
    pub soil_moisture: f64,
    /// Degrees Celsius.
    pub temperature: f64,
    /// Percentage, 0-100.
    pub humidity: f64,
    pub timestamp: DateTime<Utc>,
}

/// The device crossed an RFID card placed on a waypoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionEvent {
    pub card_id: String,
    pub position: Waypoint,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    #[serde(default)]
    pub current_position: Option<PositionEvent>,
    pub is_moving: bool,
    #[serde(default)]
    pub current_action: Option<Command>,
    /// Percentage, 0-100. Older firmware omits it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub battery: Option<i32>,
}

/// Inbound frame after decoding, one variant per telemetry stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum TelemetryMessage {
    #[serde(rename = "sensor")]
    Sensor(SensorReading),
    #[serde(rename = "rfid")]
    Position(PositionEvent),
    #[serde(rename = "robot_status")]
    Status(StatusUpdate),
}
