pub mod navigation_service;
pub mod session_manager;

pub use navigation_service::*;
pub use session_manager::*;
