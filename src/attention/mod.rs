pub mod classifier;
pub mod indicator;

pub use classifier::{Comparison, FrameClassifier, ThresholdRule, Thresholds};
pub use indicator::{FrameVerdict, IndicatorName, PerIndicator};
