pub mod logging;
pub mod websocket;

pub use logging::*;
pub use websocket::*;
