use anyhow::Result;
use async_trait::async_trait;

use crate::geometry::LandmarkSet;

use super::camera::Frame;

/// External facial-landmark detector.
///
/// Returns `Ok(None)` when no face is found in the frame.
#[async_trait]
pub trait LandmarkDetector: Send + Sync {
    async fn detect(&self, frame: &Frame) -> Result<Option<LandmarkSet>>;
}
