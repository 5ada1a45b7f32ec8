//! Hand-off of finished sessions to an external results sink.

pub mod http;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::session::SessionSummary;

pub use http::HttpReporter;

/// Wire record expected by the results endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResultsPayload {
    pub documento: String,
    pub ear: f64,
    #[serde(rename = "headPose")]
    pub head_pose: f64,
    pub mor: f64,
    pub mejor: String,
}

impl From<&SessionSummary> for ResultsPayload {
    fn from(summary: &SessionSummary) -> Self {
        Self {
            documento: summary.document_id.key().to_string(),
            ear: summary.percentages.eye_openness,
            head_pose: summary.percentages.head_pose,
            mor: summary.percentages.mouth_closure,
            mejor: summary.best.label().to_string(),
        }
    }
}

/// Receives each finished session. Failures are the caller's to log; they
/// never affect the local summary.
#[async_trait]
pub trait ResultsReporter: Send + Sync {
    async fn deliver(&self, summary: &SessionSummary) -> Result<()>;
}

/// Reporter used when no endpoint is configured.
pub struct DisabledReporter;

#[async_trait]
impl ResultsReporter for DisabledReporter {
    async fn deliver(&self, summary: &SessionSummary) -> Result<()> {
        log::debug!("reporting disabled; session {} kept local", summary.session_id);
        Ok(())
    }
}
