use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::documents::DocumentId;
use crate::session::SessionCounters;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum MonitorStatus {
    Idle,
    Monitoring,
}

impl Default for MonitorStatus {
    fn default() -> Self {
        MonitorStatus::Idle
    }
}

/// What the presentation layer needs to render the current session.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonitorState {
    pub status: MonitorStatus,
    pub session_id: Option<String>,
    pub document_id: Option<DocumentId>,
    pub started_at: Option<DateTime<Utc>>,
    pub counters: SessionCounters,
}

impl MonitorState {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn elapsed_ms(&self, now: DateTime<Utc>) -> u64 {
        match (self.status, self.started_at) {
            (MonitorStatus::Monitoring, Some(started_at)) => {
                (now - started_at).num_milliseconds().max(0) as u64
            }
            _ => 0,
        }
    }
}
