use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::{watch, Mutex};
use tokio::time::{Duration, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::{
    attention::{FrameClassifier, FrameVerdict},
    geometry::FrameMetrics,
    session::{SessionAccumulator, SessionCounters},
};

use super::camera::CameraGuard;
use super::detector::LandmarkDetector;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_error, log_info, log_warn};

pub const DEFAULT_SAMPLE_INTERVAL_MS: u64 = 200;
pub const DEFAULT_DETECT_TIMEOUT_MS: u64 = 1_000;

/// Everything one session's sampling task owns or shares.
pub struct SamplingContext {
    pub session_id: String,
    pub camera: CameraGuard,
    pub detector: Arc<dyn LandmarkDetector>,
    pub classifier: FrameClassifier,
    pub accumulator: Arc<Mutex<SessionAccumulator>>,
    pub snapshots: Arc<watch::Sender<SessionCounters>>,
    pub interval: Duration,
    pub detect_timeout: Duration,
}

/// Tick bookkeeping reported when the loop exits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SamplingStats {
    pub ticks: u64,
    pub applied: u64,
    pub no_face: u64,
    pub failed: u64,
    pub timed_out: u64,
    pub discarded: u64,
}

impl SamplingStats {
    pub fn skipped(&self) -> u64 {
        self.no_face + self.failed + self.timed_out
    }
}

enum TickOutcome {
    Classified {
        verdict: FrameVerdict,
        metrics: FrameMetrics,
    },
    NoFace,
}

/// Run detect, classify and accumulate cycles until cancelled.
///
/// Cycles run back to back on this task, so at most one is in flight. A cycle
/// still waiting on the detector when cancellation arrives is dropped along
/// with its result. The camera guard is released when the task ends.
pub async fn sampling_loop(mut ctx: SamplingContext, cancel_token: CancellationToken) -> SamplingStats {
    let mut ticker = tokio::time::interval(ctx.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut stats = SamplingStats::default();

    loop {
        tokio::select! {
            biased;
            _ = cancel_token.cancelled() => {
                break;
            }
            _ = ticker.tick() => {}
        }

        stats.ticks += 1;
        let tick_start = Instant::now();
        let cycle = sample_once(&mut ctx.camera, ctx.detector.as_ref(), &ctx.classifier);

        let outcome = tokio::select! {
            biased;
            _ = cancel_token.cancelled() => {
                stats.discarded += 1;
                log_debug!("in-flight tick discarded for session {}", ctx.session_id);
                break;
            }
            result = tokio::time::timeout(ctx.detect_timeout, cycle) => result,
        };

        match outcome {
            Ok(Ok(TickOutcome::Classified { verdict, metrics })) => {
                log_debug!(
                    "session {} frame: EAR={:.3} head={:.1}px MOR={:.1}px",
                    ctx.session_id,
                    metrics.avg_ear,
                    metrics.head_pose_deviation,
                    metrics.mouth_opening_ratio
                );
                let applied = apply_verdict(
                    &ctx.accumulator,
                    &ctx.snapshots,
                    &ctx.session_id,
                    &verdict,
                    &cancel_token,
                )
                .await;
                if applied {
                    stats.applied += 1;
                } else {
                    stats.discarded += 1;
                    break;
                }
            }
            Ok(Ok(TickOutcome::NoFace)) => stats.no_face += 1,
            Ok(Err(err)) => {
                stats.failed += 1;
                log_warn!("sampling tick skipped for session {}: {err:#}", ctx.session_id);
            }
            Err(_) => {
                stats.timed_out += 1;
                log_warn!(
                    "detection timeout (> {}ms) session {}",
                    ctx.detect_timeout.as_millis(),
                    ctx.session_id
                );
            }
        }

        let elapsed = tick_start.elapsed();
        if elapsed > ctx.interval {
            log_debug!("tick took {}ms, next tick delayed", elapsed.as_millis());
        }
    }

    log_info!(
        "sampling loop for session {} shutting down: {} applied, {} skipped, {} discarded",
        ctx.session_id,
        stats.applied,
        stats.skipped(),
        stats.discarded
    );
    stats
}

async fn sample_once(
    camera: &mut CameraGuard,
    detector: &dyn LandmarkDetector,
    classifier: &FrameClassifier,
) -> Result<TickOutcome> {
    let frame = camera.grab().await.context("frame grab failed")?;

    let Some(landmarks) = detector
        .detect(&frame)
        .await
        .context("landmark detection failed")?
    else {
        return Ok(TickOutcome::NoFace);
    };

    let metrics = FrameMetrics::measure(&landmarks)
        .with_context(|| format!("frame {} has unusable landmarks", frame.sequence))?;

    Ok(TickOutcome::Classified {
        verdict: classifier.classify(&metrics),
        metrics,
    })
}

/// Apply one verdict, or nothing if the session stopped meanwhile.
async fn apply_verdict(
    accumulator: &Mutex<SessionAccumulator>,
    snapshots: &watch::Sender<SessionCounters>,
    session_id: &str,
    verdict: &FrameVerdict,
    cancel_token: &CancellationToken,
) -> bool {
    let mut accumulator = accumulator.lock().await;
    if cancel_token.is_cancelled() || accumulator.is_closed() {
        return false;
    }

    match accumulator.record(verdict) {
        Ok(counters) => {
            snapshots.send_replace(counters);
            true
        }
        Err(err) => {
            log_error!("failed to record frame for session {}: {err}", session_id);
            false
        }
    }
}
