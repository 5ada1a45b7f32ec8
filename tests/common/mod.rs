#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::Utc;
use image::RgbImage;
use readfocus_lib::sensing::camera;
use readfocus_lib::{
    Camera, Frame, LandmarkDetector, LandmarkSet, Point, ResultsReporter, SessionSummary,
    SharedCamera,
};

fn eye(origin_x: f64, origin_y: f64, ear: f64) -> Vec<Point> {
    let width = 30.0;
    let half = ear * width / 2.0;
    vec![
        Point::new(origin_x, origin_y),
        Point::new(origin_x + 10.0, origin_y - half),
        Point::new(origin_x + 20.0, origin_y - half),
        Point::new(origin_x + width, origin_y),
        Point::new(origin_x + 20.0, origin_y + half),
        Point::new(origin_x + 10.0, origin_y + half),
    ]
}

/// Face centered at x = 240 with the requested EAR, nose offset and lip gap.
pub fn face(ear: f64, nose_offset: f64, lip_gap: f64) -> LandmarkSet {
    let jaw = (0..17)
        .map(|i| Point::new(140.0 + 12.5 * i as f64, 200.0))
        .collect();
    let nose = (0..9)
        .map(|i| Point::new(240.0 + nose_offset, 140.0 + 8.0 * i as f64))
        .collect();
    let mouth = (0..20)
        .map(|i| match i {
            3 => Point::new(240.0, 260.0),
            9 => Point::new(240.0, 260.0 + lip_gap),
            _ => Point::new(215.0 + 2.5 * i as f64, 265.0),
        })
        .collect();

    LandmarkSet::new(
        eye(190.0, 150.0, ear),
        eye(260.0, 150.0, ear),
        nose,
        jaw,
        mouth,
    )
}

/// All three indicators satisfied.
pub fn attentive() -> LandmarkSet {
    face(0.35, 2.0, 10.0)
}

/// No indicator satisfied.
pub fn distracted() -> LandmarkSet {
    face(0.1, 40.0, 40.0)
}

#[derive(Clone, Default)]
pub struct FakeCamera {
    pub open: Arc<AtomicBool>,
    pub fail_open: bool,
    sequence: Arc<AtomicU64>,
}

impl FakeCamera {
    pub fn failing() -> Self {
        Self {
            fail_open: true,
            ..Default::default()
        }
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    pub fn shared(&self) -> SharedCamera {
        camera::shared(self.clone())
    }
}

#[async_trait]
impl Camera for FakeCamera {
    async fn open(&mut self, _width: u32, _height: u32) -> Result<()> {
        if self.fail_open {
            bail!("permission denied by the user");
        }
        self.open.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn grab(&mut self) -> Result<Frame> {
        Ok(Frame {
            sequence: self.sequence.fetch_add(1, Ordering::SeqCst),
            captured_at: Utc::now(),
            image: RgbImage::new(4, 3),
        })
    }

    fn release(&mut self) {
        self.open.store(false, Ordering::SeqCst);
    }

    fn name(&self) -> &str {
        "fake camera"
    }
}

/// Serves a fixed script of detections, then no face.
pub struct ScriptedDetector {
    script: Mutex<VecDeque<Option<LandmarkSet>>>,
}

impl ScriptedDetector {
    pub fn new(script: impl IntoIterator<Item = Option<LandmarkSet>>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
        }
    }

    /// The same face on every frame.
    pub fn repeating(face: LandmarkSet, frames: usize) -> Self {
        Self::new(std::iter::repeat(Some(face)).take(frames))
    }
}

#[async_trait]
impl LandmarkDetector for ScriptedDetector {
    async fn detect(&self, _frame: &Frame) -> Result<Option<LandmarkSet>> {
        Ok(self.script.lock().unwrap().pop_front().flatten())
    }
}

/// Keeps every delivered summary; optionally fails each delivery.
#[derive(Default)]
pub struct RecordingReporter {
    pub delivered: Mutex<Vec<SessionSummary>>,
    pub fail: bool,
}

impl RecordingReporter {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn delivered(&self) -> Vec<SessionSummary> {
        self.delivered.lock().unwrap().clone()
    }
}

#[async_trait]
impl ResultsReporter for RecordingReporter {
    async fn deliver(&self, summary: &SessionSummary) -> Result<()> {
        self.delivered.lock().unwrap().push(summary.clone());
        if self.fail {
            bail!("results endpoint unreachable");
        }
        Ok(())
    }
}
