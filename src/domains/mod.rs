pub mod logger;
pub mod navigation;
pub mod session;
pub mod telemetry;

pub use logger::*;
pub use navigation::*;
pub use session::*;
pub use telemetry::*;
