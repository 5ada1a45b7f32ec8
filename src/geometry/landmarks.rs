use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Number of points in the standard 68-point facial landmark layout.
pub const STANDARD_LAYOUT_POINTS: usize = 68;

const JAW: std::ops::Range<usize> = 0..17;
const NOSE: std::ops::Range<usize> = 27..36;
const LEFT_EYE: std::ops::Range<usize> = 36..42;
const RIGHT_EYE: std::ops::Range<usize> = 42..48;
const MOUTH: std::ops::Range<usize> = 48..68;

/// Image-pixel coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Labeled landmark groups for one detected face.
///
/// Point counts are not checked on construction: a detector may hand over an
/// incomplete face, and the metrics reject it as malformed when they need the
/// missing indices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LandmarkSet {
    pub left_eye: Vec<Point>,
    pub right_eye: Vec<Point>,
    pub nose: Vec<Point>,
    pub jaw: Vec<Point>,
    pub mouth: Vec<Point>,
}

impl LandmarkSet {
    pub fn new(
        left_eye: Vec<Point>,
        right_eye: Vec<Point>,
        nose: Vec<Point>,
        jaw: Vec<Point>,
        mouth: Vec<Point>,
    ) -> Self {
        Self {
            left_eye,
            right_eye,
            nose,
            jaw,
            mouth,
        }
    }

    /// Split a flat 68-point detection into its named groups.
    pub fn from_standard_layout(points: &[Point]) -> EngineResult<Self> {
        if points.len() != STANDARD_LAYOUT_POINTS {
            return Err(EngineError::malformed(format!(
                "standard layout needs {} points, got {}",
                STANDARD_LAYOUT_POINTS,
                points.len()
            )));
        }

        Ok(Self {
            left_eye: points[LEFT_EYE].to_vec(),
            right_eye: points[RIGHT_EYE].to_vec(),
            nose: points[NOSE].to_vec(),
            jaw: points[JAW].to_vec(),
            mouth: points[MOUTH].to_vec(),
        })
    }
}
