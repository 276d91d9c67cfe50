pub mod state;
pub mod transport;

pub use state::*;
pub use transport::*;
