use anyhow::{bail, Context, Result};
use log::info;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::loop_worker::{sampling_loop, SamplingContext, SamplingStats};

/// Owns the sampling task of the current session.
pub struct SensingController {
    handle: Option<JoinHandle<SamplingStats>>,
    cancel_token: Option<CancellationToken>,
}

impl SensingController {
    pub fn new() -> Self {
        Self {
            handle: None,
            cancel_token: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.handle.is_some()
    }

    pub fn start_sampling(&mut self, ctx: SamplingContext) -> Result<()> {
        if self.handle.is_some() {
            bail!("sampling already active");
        }

        info!("Starting sampling loop for session {}", ctx.session_id);

        let cancel_token = CancellationToken::new();
        let handle = tokio::spawn(sampling_loop(ctx, cancel_token.clone()));

        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        Ok(())
    }

    /// Cancel the loop and wait for it to finish. Once this returns the
    /// camera has been released and no further frame will be applied.
    pub async fn stop_sampling(&mut self) -> Result<Option<SamplingStats>> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }

        if let Some(handle) = self.handle.take() {
            handle
                .await
                .context("sampling loop task failed to join")
                .map(Some)
        } else {
            Ok(None)
        }
    }
}

impl Default for SensingController {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for SensingController {
    fn drop(&mut self) {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }
    }
}
