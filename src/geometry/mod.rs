pub mod landmarks;
pub mod metrics;

pub use landmarks::{LandmarkSet, Point};
pub use metrics::{
    average_ear, eye_aspect_ratio, head_pose_deviation, mouth_opening_ratio, FrameMetrics,
};
