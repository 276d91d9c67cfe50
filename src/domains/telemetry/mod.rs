pub mod hub;
pub mod messages;
pub mod wire;

pub use hub::*;
pub use messages::*;
