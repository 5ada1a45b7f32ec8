use serde::{Deserialize, Serialize};

use crate::geometry::FrameMetrics;

use super::indicator::{FrameVerdict, IndicatorName, PerIndicator};

/// Defaults are calibrated for 480x360 video.
pub const DEFAULT_EAR_THRESHOLD: f64 = 0.3;
pub const DEFAULT_HEAD_POSE_THRESHOLD_PX: f64 = 15.0;
pub const DEFAULT_MOR_THRESHOLD_PX: f64 = 25.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Comparison {
    /// Satisfied when the value is strictly greater than the threshold.
    Above,
    /// Satisfied when the value is strictly less than the threshold.
    Below,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ThresholdRule {
    pub value: f64,
    pub comparison: Comparison,
}

impl ThresholdRule {
    pub fn is_satisfied(&self, measured: f64) -> bool {
        match self.comparison {
            Comparison::Above => measured > self.value,
            Comparison::Below => measured < self.value,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Thresholds {
    pub ear: f64,
    pub head_pose_px: f64,
    pub mor_px: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            ear: DEFAULT_EAR_THRESHOLD,
            head_pose_px: DEFAULT_HEAD_POSE_THRESHOLD_PX,
            mor_px: DEFAULT_MOR_THRESHOLD_PX,
        }
    }
}

impl Thresholds {
    pub fn rule(&self, name: IndicatorName) -> ThresholdRule {
        match name {
            IndicatorName::EyeOpenness => ThresholdRule {
                value: self.ear,
                comparison: Comparison::Above,
            },
            IndicatorName::HeadPose => ThresholdRule {
                value: self.head_pose_px,
                comparison: Comparison::Below,
            },
            IndicatorName::MouthClosure => ThresholdRule {
                value: self.mor_px,
                comparison: Comparison::Below,
            },
        }
    }

    pub fn rules(&self) -> PerIndicator<ThresholdRule> {
        PerIndicator::from_fn(|name| self.rule(name))
    }
}

/// Applies fixed thresholds to one frame's metrics.
#[derive(Debug, Clone)]
pub struct FrameClassifier {
    rules: PerIndicator<ThresholdRule>,
}

impl FrameClassifier {
    pub fn new(thresholds: Thresholds) -> Self {
        Self {
            rules: thresholds.rules(),
        }
    }

    pub fn classify(&self, metrics: &FrameMetrics) -> FrameVerdict {
        let measured = PerIndicator {
            eye_openness: metrics.avg_ear,
            head_pose: metrics.head_pose_deviation,
            mouth_closure: metrics.mouth_opening_ratio,
        };

        PerIndicator::from_fn(|name| self.rules.get(name).is_satisfied(*measured.get(name)))
    }
}

impl Default for FrameClassifier {
    fn default() -> Self {
        Self::new(Thresholds::default())
    }
}
