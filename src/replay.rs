//! Recorded landmark traces played back through a fake camera and detector.
//!
//! A trace is JSON lines, one detection per line: `null` for "no face", an
//! object with `leftEye`/`rightEye`/`nose`/`jaw`/`mouth` point arrays, or a
//! flat array of the 68 standard-layout points as `[x, y]` pairs. Blank lines
//! and lines starting with `#` are ignored.

use std::{fs, path::Path, sync::Arc};

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use image::RgbImage;
use serde::Deserialize;
use tokio::sync::Notify;

use crate::geometry::{LandmarkSet, Point};
use crate::sensing::{Camera, Frame, LandmarkDetector};

#[derive(Deserialize)]
#[serde(untagged)]
enum TraceEntry {
    Grouped(LandmarkSet),
    Flat(Vec<[f64; 2]>),
}

pub fn parse_trace(contents: &str) -> Result<Vec<Option<LandmarkSet>>> {
    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| {
            let trimmed = line.trim();
            !trimmed.is_empty() && !trimmed.starts_with('#')
        })
        .map(|(idx, line)| {
            let entry: Option<TraceEntry> = serde_json::from_str(line)
                .with_context(|| format!("trace line {} is not a detection", idx + 1))?;
            match entry {
                None => Ok(None),
                Some(TraceEntry::Grouped(set)) => Ok(Some(set)),
                Some(TraceEntry::Flat(pairs)) => {
                    let points: Vec<Point> = pairs.iter().map(|[x, y]| Point::new(*x, *y)).collect();
                    LandmarkSet::from_standard_layout(&points)
                        .map(Some)
                        .with_context(|| format!("trace line {}", idx + 1))
                }
            }
        })
        .collect()
}

pub fn load_trace(path: &Path) -> Result<Vec<Option<LandmarkSet>>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read landmark trace {}", path.display()))?;
    let trace = parse_trace(&contents)?;
    if trace.is_empty() {
        bail!("landmark trace {} has no detections", path.display());
    }
    Ok(trace)
}

/// Camera producing blank frames at the negotiated resolution.
#[derive(Default)]
pub struct ReplayCamera {
    resolution: Option<(u32, u32)>,
    sequence: u64,
}

#[async_trait]
impl Camera for ReplayCamera {
    async fn open(&mut self, width: u32, height: u32) -> Result<()> {
        self.resolution = Some((width, height));
        self.sequence = 0;
        Ok(())
    }

    async fn grab(&mut self) -> Result<Frame> {
        let Some((width, height)) = self.resolution else {
            bail!("replay camera is not open");
        };

        let frame = Frame {
            sequence: self.sequence,
            captured_at: Utc::now(),
            image: RgbImage::new(width, height),
        };
        self.sequence += 1;
        Ok(frame)
    }

    fn release(&mut self) {
        self.resolution = None;
    }

    fn name(&self) -> &str {
        "replay camera"
    }
}

/// Detector answering frame `n` with trace entry `n`.
pub struct ReplayDetector {
    trace: Vec<Option<LandmarkSet>>,
    exhausted: Arc<Notify>,
}

impl ReplayDetector {
    pub fn new(trace: Vec<Option<LandmarkSet>>) -> Self {
        Self {
            trace,
            exhausted: Arc::new(Notify::new()),
        }
    }

    pub fn frame_count(&self) -> usize {
        self.trace.len()
    }

    /// Notified once the last trace entry has been served.
    pub fn exhausted(&self) -> Arc<Notify> {
        self.exhausted.clone()
    }
}

#[async_trait]
impl LandmarkDetector for ReplayDetector {
    async fn detect(&self, frame: &Frame) -> Result<Option<LandmarkSet>> {
        let idx = frame.sequence as usize;
        if idx + 1 >= self.trace.len() {
            self.exhausted.notify_one();
        }
        Ok(self.trace.get(idx).cloned().flatten())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_entry_shapes() {
        let flat: Vec<[f64; 2]> = (0..68).map(|i| [i as f64, 1.0]).collect();
        let trace = format!(
            "# recorded at 480x360\nnull\n\n{}\n{}\n",
            r#"{"leftEye":[],"rightEye":[],"nose":[],"jaw":[],"mouth":[{"x":1,"y":2}]}"#,
            serde_json::to_string(&flat).unwrap()
        );

        let parsed = parse_trace(&trace).unwrap();
        assert_eq!(parsed.len(), 3);
        assert!(parsed[0].is_none());
        assert_eq!(parsed[1].as_ref().unwrap().mouth, vec![Point::new(1.0, 2.0)]);
        assert_eq!(parsed[2].as_ref().unwrap().nose[3].x, 30.0);
    }

    #[test]
    fn rejects_bad_lines_with_line_number() {
        let err = parse_trace("null\n[[1, 2]]\n").unwrap_err();
        assert!(format!("{err:#}").contains("line 2"));

        assert!(parse_trace("{not json}").is_err());
    }

    #[tokio::test]
    async fn camera_requires_open() {
        let mut camera = ReplayCamera::default();
        assert!(camera.grab().await.is_err());

        camera.open(8, 6).await.unwrap();
        let first = camera.grab().await.unwrap();
        let second = camera.grab().await.unwrap();
        assert_eq!((first.sequence, second.sequence), (0, 1));
        assert_eq!(first.image.dimensions(), (8, 6));

        camera.release();
        assert!(camera.grab().await.is_err());
    }

    #[tokio::test]
    async fn detector_signals_end_of_trace() {
        let detector = ReplayDetector::new(vec![None, None]);
        assert_eq!(detector.frame_count(), 2);
        let exhausted = detector.exhausted();
        let mut camera = ReplayCamera::default();
        camera.open(2, 2).await.unwrap();

        let frame = camera.grab().await.unwrap();
        assert!(detector.detect(&frame).await.unwrap().is_none());
        let frame = camera.grab().await.unwrap();
        assert!(detector.detect(&frame).await.unwrap().is_none());

        tokio::time::timeout(std::time::Duration::from_secs(1), exhausted.notified())
            .await
            .unwrap();
    }
}
