//! Per-frame geometric attention indicators.
//!
//! All values are in image-pixel units of the source video. None of them are
//! normalized by face size, so thresholds applied on top are tied to the
//! capture resolution.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::landmarks::{LandmarkSet, Point};

const EYE_POINTS: usize = 6;
const MIN_NOSE_POINTS: usize = 4;
const MIN_JAW_POINTS: usize = 17;
const MIN_MOUTH_POINTS: usize = 12;

const NOSE_TIP: usize = 3;
const JAW_LEFT_EDGE: usize = 0;
const JAW_RIGHT_EDGE: usize = 16;
const UPPER_LIP_MID: usize = 3;
const LOWER_LIP_MID: usize = 9;

/// Eye aspect ratio of a 6-point eye contour.
///
/// Points are ordered outer corner, two upper-lid points, inner corner, two
/// lower-lid points: `(|p2-p6| + |p3-p5|) / (2 * |p1-p4|)`.
pub fn eye_aspect_ratio(eye: &[Point]) -> EngineResult<f64> {
    require_exact("eye", eye, EYE_POINTS)?;

    let width = eye[0].distance(&eye[3]);
    if width <= f64::EPSILON {
        return Err(EngineError::malformed("eye corners coincide"));
    }

    let vertical = eye[1].distance(&eye[5]) + eye[2].distance(&eye[4]);
    Ok(vertical / (2.0 * width))
}

/// Mean EAR across both eyes.
pub fn average_ear(left_eye: &[Point], right_eye: &[Point]) -> EngineResult<f64> {
    let left = eye_aspect_ratio(left_eye)?;
    let right = eye_aspect_ratio(right_eye)?;
    Ok((left + right) / 2.0)
}

/// Horizontal offset between the nose tip and the midpoint of the two outer
/// jaw points. A coarse yaw proxy.
pub fn head_pose_deviation(nose: &[Point], jaw: &[Point]) -> EngineResult<f64> {
    require_at_least("nose", nose, MIN_NOSE_POINTS)?;
    require_at_least("jaw", jaw, MIN_JAW_POINTS)?;

    let face_center_x = (jaw[JAW_LEFT_EDGE].x + jaw[JAW_RIGHT_EDGE].x) / 2.0;
    Ok((nose[NOSE_TIP].x - face_center_x).abs())
}

/// Distance between the upper- and lower-lip midpoints.
pub fn mouth_opening_ratio(mouth: &[Point]) -> EngineResult<f64> {
    require_at_least("mouth", mouth, MIN_MOUTH_POINTS)?;
    Ok(mouth[UPPER_LIP_MID].distance(&mouth[LOWER_LIP_MID]))
}

/// The three raw indicator values of one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameMetrics {
    pub avg_ear: f64,
    pub head_pose_deviation: f64,
    pub mouth_opening_ratio: f64,
}

impl FrameMetrics {
    pub fn measure(landmarks: &LandmarkSet) -> EngineResult<Self> {
        Ok(Self {
            avg_ear: average_ear(&landmarks.left_eye, &landmarks.right_eye)?,
            head_pose_deviation: head_pose_deviation(&landmarks.nose, &landmarks.jaw)?,
            mouth_opening_ratio: mouth_opening_ratio(&landmarks.mouth)?,
        })
    }
}

fn require_exact(region: &str, points: &[Point], expected: usize) -> EngineResult<()> {
    if points.len() != expected {
        return Err(EngineError::malformed(format!(
            "{region} has {} points, expected {expected}",
            points.len()
        )));
    }
    Ok(())
}

fn require_at_least(region: &str, points: &[Point], minimum: usize) -> EngineResult<()> {
    if points.len() < minimum {
        return Err(EngineError::malformed(format!(
            "{region} has {} points, expected at least {minimum}",
            points.len()
        )));
    }
    Ok(())
}
