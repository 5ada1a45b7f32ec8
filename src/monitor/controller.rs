use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Utc};
use log::{error, info, warn};
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::{
    attention::FrameClassifier,
    documents::DocumentId,
    error::{EngineError, EngineResult},
    reporting::{DisabledReporter, HttpReporter, ResultsReporter},
    sensing::{CameraGuard, LandmarkDetector, SamplingContext, SensingController, SharedCamera},
    session::{summarize, SessionAccumulator, SessionCounters, SessionMeta, SessionSummary},
    settings::MonitorConfig,
};

use super::{MonitorState, MonitorStatus};

struct ActiveSession {
    id: String,
    document_id: DocumentId,
    started_at: DateTime<Utc>,
    accumulator: Arc<Mutex<SessionAccumulator>>,
}

/// Drives one reading session at a time: camera, sampling loop, final
/// summary and its delivery.
#[derive(Clone)]
pub struct MonitorController {
    config: Arc<MonitorConfig>,
    camera: SharedCamera,
    detector: Arc<dyn LandmarkDetector>,
    reporter: Arc<dyn ResultsReporter>,
    active: Arc<Mutex<Option<ActiveSession>>>,
    sensing: Arc<Mutex<SensingController>>,
    counters_tx: Arc<watch::Sender<SessionCounters>>,
    summary_tx: Arc<watch::Sender<Option<Arc<SessionSummary>>>>,
    pending_reports: Arc<std::sync::Mutex<Vec<JoinHandle<()>>>>,
}

impl MonitorController {
    pub fn new(
        config: MonitorConfig,
        camera: SharedCamera,
        detector: Arc<dyn LandmarkDetector>,
        reporter: Arc<dyn ResultsReporter>,
    ) -> Self {
        let (counters_tx, _) = watch::channel(SessionCounters::default());
        let (summary_tx, _) = watch::channel(None);

        Self {
            config: Arc::new(config),
            camera,
            detector,
            reporter,
            active: Arc::new(Mutex::new(None)),
            sensing: Arc::new(Mutex::new(SensingController::new())),
            counters_tx: Arc::new(counters_tx),
            summary_tx: Arc::new(summary_tx),
            pending_reports: Arc::new(std::sync::Mutex::new(Vec::new())),
        }
    }

    /// Reporter matching the configuration: HTTP when a URL is set.
    pub fn reporter_for(config: &MonitorConfig) -> Result<Arc<dyn ResultsReporter>> {
        Ok(match &config.report_url {
            Some(url) => {
                let reporter = HttpReporter::new(url.clone(), config.report_timeout_secs)?;
                info!("Session results will be reported to {}", reporter.url());
                Arc::new(reporter)
            }
            None => {
                info!("No results endpoint configured; reporting disabled");
                Arc::new(DisabledReporter)
            }
        })
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn subscribe_counters(&self) -> watch::Receiver<SessionCounters> {
        self.counters_tx.subscribe()
    }

    pub fn subscribe_summary(&self) -> watch::Receiver<Option<Arc<SessionSummary>>> {
        self.summary_tx.subscribe()
    }

    pub async fn state(&self) -> MonitorState {
        let active = self.active.lock().await;
        match active.as_ref() {
            Some(session) => MonitorState {
                status: MonitorStatus::Monitoring,
                session_id: Some(session.id.clone()),
                document_id: Some(session.document_id),
                started_at: Some(session.started_at),
                counters: session.accumulator.lock().await.counters(),
            },
            None => MonitorState::idle(),
        }
    }

    /// Open the camera and start sampling for `document_id`.
    ///
    /// If the camera cannot be acquired nothing is started and the error is
    /// returned for the presentation layer to show.
    pub async fn start_session(&self, document_id: DocumentId) -> EngineResult<MonitorState> {
        {
            let mut active = self.active.lock().await;
            if active.is_some() {
                return Err(EngineError::SessionActive);
            }

            let camera = match CameraGuard::acquire(
                self.camera.clone(),
                self.config.video_width,
                self.config.video_height,
            )
            .await
            {
                Ok(camera) => camera,
                Err(err) => {
                    warn!("Monitoring for '{}' not started: {}", document_id, err);
                    return Err(err);
                }
            };

            let session_id = Uuid::new_v4().to_string();
            let started_at = Utc::now();
            let accumulator = Arc::new(Mutex::new(SessionAccumulator::new()));
            self.counters_tx.send_replace(SessionCounters::default());
            self.summary_tx.send_replace(None);

            let ctx = SamplingContext {
                session_id: session_id.clone(),
                camera,
                detector: self.detector.clone(),
                classifier: FrameClassifier::new(self.config.thresholds()),
                accumulator: accumulator.clone(),
                snapshots: self.counters_tx.clone(),
                interval: self.config.sample_interval(),
                detect_timeout: self.config.detect_timeout(),
            };
            self.sensing.lock().await.start_sampling(ctx)?;

            info!("Monitoring session {} started for '{}'", session_id, document_id);

            *active = Some(ActiveSession {
                id: session_id,
                document_id,
                started_at,
                accumulator,
            });
        }

        Ok(self.state().await)
    }

    /// Stop sampling, freeze the counters and publish the summary.
    ///
    /// The summary is handed to the reporter in the background; delivery
    /// problems are logged and never affect the returned value.
    pub async fn finish_session(&self) -> EngineResult<Arc<SessionSummary>> {
        let mut active = self.active.lock().await;
        let session = active.take().ok_or(EngineError::NoActiveSession)?;
        let finished_at = Utc::now();

        self.stop_sampling(&session.id).await;

        let summary = {
            let mut accumulator = session.accumulator.lock().await;
            accumulator.close();
            summarize(
                &accumulator,
                SessionMeta {
                    session_id: session.id.clone(),
                    document_id: session.document_id,
                    started_at: session.started_at,
                    finished_at,
                },
            )?
        };
        let summary = Arc::new(summary);

        info!(
            "Session {} finished: {} frames, best indicator {} ({:.2}%)",
            summary.session_id,
            summary.total_frames,
            summary.best.label(),
            summary.best_percentage()
        );

        self.summary_tx.send_replace(Some(summary.clone()));
        self.report(summary.clone());

        Ok(summary)
    }

    /// Drop the current session without a summary, e.g. when the reader
    /// switches documents. No-op when idle.
    pub async fn abandon_session(&self) -> EngineResult<()> {
        let mut active = self.active.lock().await;
        let Some(session) = active.take() else {
            return Ok(());
        };

        self.stop_sampling(&session.id).await;
        session.accumulator.lock().await.close();

        info!("Session {} abandoned", session.id);
        Ok(())
    }

    /// Return to the initial state so a new document can be monitored.
    pub async fn reset(&self) -> EngineResult<()> {
        self.abandon_session().await?;
        self.counters_tx.send_replace(SessionCounters::default());
        self.summary_tx.send_replace(None);
        Ok(())
    }

    async fn stop_sampling(&self, session_id: &str) {
        match self.sensing.lock().await.stop_sampling().await {
            Ok(Some(stats)) => info!(
                "Sampling for session {} stopped after {} ticks ({} frames, {} skipped)",
                session_id,
                stats.ticks,
                stats.applied,
                stats.skipped()
            ),
            Ok(None) => {}
            Err(err) => error!("Failed to stop sampling for session {}: {err:#}", session_id),
        }
    }

    /// Wait for deliveries still in flight. Used before process exit; the
    /// session flow itself never waits on reporting.
    pub async fn flush_reports(&self) {
        let pending: Vec<_> = {
            let mut guard = self
                .pending_reports
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            guard.drain(..).collect()
        };

        for handle in pending {
            if let Err(err) = handle.await {
                error!("Report delivery task failed: {err}");
            }
        }
    }

    fn report(&self, summary: Arc<SessionSummary>) {
        let reporter = self.reporter.clone();
        let handle = tokio::spawn(async move {
            if let Err(err) = reporter.deliver(&summary).await {
                warn!(
                    "Failed to deliver results for session {}: {err:#}",
                    summary.session_id
                );
            }
        });

        let mut pending = self
            .pending_reports
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        pending.retain(|handle| !handle.is_finished());
        pending.push(handle);
    }
}
