pub mod attention;
pub mod cli;
pub mod documents;
pub mod error;
pub mod geometry;
pub mod monitor;
pub mod replay;
pub mod reporting;
pub mod sensing;
pub mod session;
pub mod settings;
pub mod utils;

pub use attention::{FrameClassifier, FrameVerdict, IndicatorName, PerIndicator, Thresholds};
pub use documents::{Document, DocumentId};
pub use error::{EngineError, EngineResult};
pub use geometry::{FrameMetrics, LandmarkSet, Point};
pub use monitor::{MonitorController, MonitorState, MonitorStatus};
pub use reporting::{DisabledReporter, HttpReporter, ResultsPayload, ResultsReporter};
pub use sensing::{Camera, Frame, LandmarkDetector, SharedCamera};
pub use session::{SessionAccumulator, SessionCounters, SessionSummary};
pub use settings::MonitorConfig;

/// Entry point for the `readfocus` binary.
pub fn run() -> anyhow::Result<()> {
    cli::run()
}
