use serde::{Deserialize, Serialize};

use crate::attention::{FrameVerdict, IndicatorName, PerIndicator};
use crate::error::{EngineError, EngineResult};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum AccumulatorStatus {
    Active,
    Closed,
}

impl Default for AccumulatorStatus {
    fn default() -> Self {
        AccumulatorStatus::Active
    }
}

/// Running per-session frame counts.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionCounters {
    pub total_frames: u64,
    pub satisfied_frames: PerIndicator<u64>,
}

impl SessionCounters {
    pub fn satisfied(&self, name: IndicatorName) -> u64 {
        *self.satisfied_frames.get(name)
    }
}

/// Two-state accumulator: counts frames while active, frozen once closed.
#[derive(Debug, Clone, Default)]
pub struct SessionAccumulator {
    status: AccumulatorStatus,
    counters: SessionCounters,
}

impl SessionAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> AccumulatorStatus {
        self.status
    }

    pub fn is_closed(&self) -> bool {
        self.status == AccumulatorStatus::Closed
    }

    pub fn counters(&self) -> SessionCounters {
        self.counters
    }

    /// Count one classified frame and return the updated counters.
    ///
    /// Recording on a closed session is a contract violation: it trips a
    /// debug assertion and, in release builds, is rejected without touching
    /// the counters.
    pub fn record(&mut self, verdict: &FrameVerdict) -> EngineResult<SessionCounters> {
        debug_assert!(
            self.status == AccumulatorStatus::Active,
            "frame recorded on a closed session"
        );
        if self.is_closed() {
            return Err(EngineError::SessionClosed);
        }

        self.counters.total_frames += 1;
        for name in verdict.satisfied() {
            *self.counters.satisfied_frames.get_mut(name) += 1;
        }

        Ok(self.counters)
    }

    /// Freeze the counters. Closing twice is harmless.
    pub fn close(&mut self) -> SessionCounters {
        self.status = AccumulatorStatus::Closed;
        self.counters
    }

    /// Counters of a closed session.
    pub fn frozen_counters(&self) -> EngineResult<SessionCounters> {
        if !self.is_closed() {
            return Err(EngineError::SessionStillActive);
        }
        Ok(self.counters)
    }
}
