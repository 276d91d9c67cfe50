use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid topology: {reason}")]
    InvalidTopology { reason: String },

    #[error("Invalid waypoint '{input}': {reason}")]
    InvalidWaypoint { input: String, reason: String },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Infrastructure error: {0}")]
    InfrastructureError(String),
}

/// Failure to open or keep a connection to the device. Never surfaced to
/// callers directly; the session recovers from it with a reconnection.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransportError {
    #[error("Handshake with {url} failed: {reason}")]
    Handshake { url: String, reason: String },

    #[error("Connection closed: {0}")]
    Closed(String),

    #[error("I/O error on connection: {0}")]
    Io(String),
}

/// An inbound frame that could not be turned into a telemetry message.
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Malformed frame: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Unknown message type: {0}")]
    UnknownType(String),
}

#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Configuration error: {0}")]
    Configuration(#[from] anyhow::Error),
}

pub type DomainResult<T> = Result<T, DomainError>;
pub type ApplicationResult<T> = Result<T, ApplicationError>;
