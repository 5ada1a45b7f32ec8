use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use image::RgbImage;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::error::{EngineError, EngineResult};

const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

/// One captured video frame.
#[derive(Debug, Clone)]
pub struct Frame {
    pub sequence: u64,
    pub captured_at: DateTime<Utc>,
    pub image: RgbImage,
}

/// Video source owned by one monitoring session at a time.
#[async_trait]
pub trait Camera: Send {
    /// Acquire the device at the requested resolution.
    async fn open(&mut self, width: u32, height: u32) -> Result<()>;

    async fn grab(&mut self) -> Result<Frame>;

    /// Release the device. Must be safe to call when not open.
    fn release(&mut self);

    fn name(&self) -> &str {
        "camera"
    }
}

pub type SharedCamera = Arc<Mutex<Box<dyn Camera>>>;

pub fn shared(camera: impl Camera + 'static) -> SharedCamera {
    Arc::new(Mutex::new(Box::new(camera)))
}

/// Exclusive, opened camera. Dropping the guard releases the device.
pub struct CameraGuard {
    camera: OwnedMutexGuard<Box<dyn Camera>>,
}

impl CameraGuard {
    /// Take exclusive ownership of the camera and open it.
    ///
    /// Fails with `CameraUnavailable` if another session holds the camera or the
    /// device refuses to open; in both cases nothing stays acquired.
    pub async fn acquire(camera: SharedCamera, width: u32, height: u32) -> EngineResult<Self> {
        let camera = camera
            .try_lock_owned()
            .map_err(|_| EngineError::camera_unavailable("camera is held by another session"))?;

        let mut guard = Self { camera };
        if let Err(err) = guard.camera.open(width, height).await {
            log_warn!("{} failed to open at {}x{}: {err:#}", guard.camera.name(), width, height);
            return Err(EngineError::camera_unavailable(format!("{err:#}")));
        }

        log_info!("{} opened at {}x{}", guard.camera.name(), width, height);
        Ok(guard)
    }

    pub async fn grab(&mut self) -> Result<Frame> {
        self.camera.grab().await
    }
}

impl Drop for CameraGuard {
    fn drop(&mut self) {
        self.camera.release();
        log_info!("{} released", self.camera.name());
    }
}
