pub mod compiler;
pub mod graph;
pub mod planner;
pub mod ports;
pub mod types;

pub use compiler::{compile, final_heading};
pub use graph::*;
pub use planner::shortest_path;
pub use ports::*;
pub use types::*;
