use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::attention::{IndicatorName, PerIndicator};
use crate::documents::DocumentId;
use crate::error::EngineResult;

use super::state::{SessionAccumulator, SessionCounters};

/// Final result of one reading session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub session_id: String,
    pub document_id: DocumentId,
    pub percentages: PerIndicator<f64>,
    pub best: IndicatorName,
    pub total_frames: u64,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl SessionSummary {
    pub fn best_percentage(&self) -> f64 {
        *self.percentages.get(self.best)
    }
}

/// Share of frames on which each indicator was satisfied, in `[0, 100]`.
///
/// An empty session divides by one, so every percentage is zero.
pub fn percentages(counters: &SessionCounters) -> PerIndicator<f64> {
    let denominator = counters.total_frames.max(1) as f64;
    PerIndicator::from_fn(|name| 100.0 * counters.satisfied(name) as f64 / denominator)
}

/// Indicator with the strictly greatest percentage; ties go to the one
/// enumerated first.
pub fn select_best(percentages: &PerIndicator<f64>) -> IndicatorName {
    let mut iter = percentages.iter();
    let (mut best, mut best_value) = match iter.next() {
        Some((name, value)) => (name, *value),
        None => return IndicatorName::EyeOpenness,
    };

    for (name, value) in iter {
        if *value > best_value {
            best = name;
            best_value = *value;
        }
    }

    best
}

pub struct SessionMeta {
    pub session_id: String,
    pub document_id: DocumentId,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Build the summary of a closed session.
pub fn summarize(accumulator: &SessionAccumulator, meta: SessionMeta) -> EngineResult<SessionSummary> {
    let counters = accumulator.frozen_counters()?;
    let percentages = percentages(&counters);

    Ok(SessionSummary {
        session_id: meta.session_id,
        document_id: meta.document_id,
        best: select_best(&percentages),
        percentages,
        total_frames: counters.total_frames,
        started_at: meta.started_at,
        finished_at: meta.finished_at,
    })
}
