pub mod camera;
pub mod controller;
pub mod detector;
pub mod loop_worker;

pub use camera::{Camera, CameraGuard, Frame, SharedCamera};
pub use controller::SensingController;
pub use detector::LandmarkDetector;
pub use loop_worker::{SamplingContext, SamplingStats};
