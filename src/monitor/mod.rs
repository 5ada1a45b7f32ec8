pub mod controller;
pub mod state;

pub use controller::MonitorController;
pub use state::{MonitorState, MonitorStatus};
