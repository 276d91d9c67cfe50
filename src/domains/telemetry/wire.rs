//! Wire format shared with the device firmware.
//!
//! Every frame is a JSON object `{"type": ..., "data": ...}`. The only
//! outbound type is `robot_actions`; inbound frames are decoded into
//! [`TelemetryMessage`]. Command names on the wire are owned here, not by
//! the navigation domain.

use super::messages::{PositionEvent, SensorReading, StatusUpdate, TelemetryMessage};
use crate::common::ProtocolError;
use crate::domains::navigation::Command;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub const ROBOT_ACTIONS: &str = "robot_actions";
pub const SENSOR: &str = "sensor";
pub const RFID: &str = "rfid";
pub const ROBOT_STATUS: &str = "robot_status";

const WIRE_NAMES: &[&str] = &["forward", "left", "right", "stop"];

pub fn wire_name(command: Command) -> &'static str {
    match command {
        Command::Advance => "forward",
        Command::TurnLeft => "left",
        Command::TurnRight => "right",
        Command::Halt => "stop",
    }
}

pub fn parse_wire_name(name: &str) -> Option<Command> {
    match name {
        "forward" => Some(Command::Advance),
        "left" => Some(Command::TurnLeft),
        "right" => Some(Command::TurnRight),
        "stop" => Some(Command::Halt),
        _ => None,
    }
}

impl Serialize for Command {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(wire_name(*self))
    }
}

impl<'de> Deserialize<'de> for Command {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        parse_wire_name(&name).ok_or_else(|| D::Error::unknown_variant(&name, WIRE_NAMES))
    }
}

#[derive(Serialize)]
struct ActionsFrame<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    data: ActionsPayload<'a>,
}

#[derive(Serialize)]
struct ActionsPayload<'a> {
    actions: &'a [Command],
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: serde_json::Value,
}

#[derive(Deserialize)]
struct ActionsBody {
    actions: Vec<Command>,
}

/// Encodes a command sequence as one `robot_actions` frame.
pub fn encode_actions(commands: &[Command]) -> Result<String, serde_json::Error> {
    serde_json::to_string(&ActionsFrame {
        kind: ROBOT_ACTIONS,
        data: ActionsPayload { actions: commands },
    })
}

/// Decodes a `robot_actions` frame; this is the device side of [`encode_actions`].
pub fn decode_actions(frame: &str) -> Result<Vec<Command>, ProtocolError> {
    let envelope: Envelope = serde_json::from_str(frame)?;
    if envelope.kind != ROBOT_ACTIONS {
        return Err(ProtocolError::UnknownType(envelope.kind));
    }
    let body: ActionsBody = serde_json::from_value(envelope.data)?;
    Ok(body.actions)
}

pub fn encode_telemetry(message: &TelemetryMessage) -> Result<String, serde_json::Error> {
    serde_json::to_string(message)
}

/// Decodes one inbound frame.
///
/// The envelope is read first so an unrecognised `type` can be told apart
/// from a recognised type with a broken payload.
pub fn decode_frame(frame: &str) -> Result<TelemetryMessage, ProtocolError> {
    let envelope: Envelope = serde_json::from_str(frame)?;
    let message = match envelope.kind.as_str() {
        SENSOR => TelemetryMessage::Sensor(serde_json::from_value::<SensorReading>(envelope.data)?),
        RFID => TelemetryMessage::Position(serde_json::from_value::<PositionEvent>(envelope.data)?),
        ROBOT_STATUS => TelemetryMessage::Status(serde_json::from_value::<StatusUpdate>(envelope.data)?),
        _ => return Err(ProtocolError::UnknownType(envelope.kind)),
    };
    Ok(message)
}
