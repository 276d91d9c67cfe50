//! Route planning on a fixed waypoint grid and delivery of the resulting
//! drive commands to a rover over a reconnecting WebSocket session.

pub mod adapters;
pub mod application;
pub mod common;
pub mod config;
pub mod domains;

pub use self::config::Config;

pub use common::*;
pub use domains::*;
