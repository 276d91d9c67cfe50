pub mod topology_file;

pub use topology_file::*;
