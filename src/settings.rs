use std::{fs, path::Path, time::Duration};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::attention::{
    classifier::{DEFAULT_EAR_THRESHOLD, DEFAULT_HEAD_POSE_THRESHOLD_PX, DEFAULT_MOR_THRESHOLD_PX},
    Thresholds,
};
use crate::error::EngineError;
use crate::sensing::loop_worker::{DEFAULT_DETECT_TIMEOUT_MS, DEFAULT_SAMPLE_INTERVAL_MS};

pub const DEFAULT_REPORT_URL: &str = "http://localhost:8000/api/resultados/";

const ENV_REPORT_URL: &str = "READFOCUS_REPORT_URL";
const ENV_SAMPLE_MS: &str = "READFOCUS_SAMPLE_MS";

/// Monitoring configuration.
///
/// The pixel thresholds only make sense at the configured video resolution;
/// changing `video_width`/`video_height` without recalibrating them shifts
/// what counts as attentive.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MonitorConfig {
    pub ear_threshold: f64,
    pub head_pose_threshold_px: f64,
    pub mor_threshold_px: f64,
    pub video_width: u32,
    pub video_height: u32,
    pub sample_interval_ms: u64,
    pub detect_timeout_ms: u64,
    /// Results endpoint; `None` disables reporting.
    pub report_url: Option<String>,
    pub report_timeout_secs: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            ear_threshold: DEFAULT_EAR_THRESHOLD,
            head_pose_threshold_px: DEFAULT_HEAD_POSE_THRESHOLD_PX,
            mor_threshold_px: DEFAULT_MOR_THRESHOLD_PX,
            video_width: 480,
            video_height: 360,
            sample_interval_ms: DEFAULT_SAMPLE_INTERVAL_MS,
            detect_timeout_ms: DEFAULT_DETECT_TIMEOUT_MS,
            report_url: Some(DEFAULT_REPORT_URL.into()),
            report_timeout_secs: 10,
        }
    }
}

impl MonitorConfig {
    /// Read the settings file (if any), apply environment overrides and validate.
    ///
    /// A missing file means defaults. A file that does not parse is logged and
    /// ignored, so a bad edit never blocks monitoring.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with(path, |key| std::env::var(key).ok())
    }

    fn load_with(path: Option<&Path>, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = match path {
            Some(path) if path.exists() => {
                let contents = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read settings from {}", path.display()))?;
                serde_json::from_str(&contents).unwrap_or_else(|err| {
                    log::warn!(
                        "Ignoring unreadable settings in {}: {err}; using defaults",
                        path.display()
                    );
                    Self::default()
                })
            }
            _ => Self::default(),
        };

        config.apply_overrides(lookup)?;
        config.validate()?;
        Ok(config)
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(url) = lookup(ENV_REPORT_URL) {
            let url = url.trim();
            self.report_url = if url.is_empty() { None } else { Some(url.to_string()) };
        }

        if let Some(raw) = lookup(ENV_SAMPLE_MS) {
            self.sample_interval_ms = raw
                .trim()
                .parse()
                .with_context(|| format!("{ENV_SAMPLE_MS} must be an integer, got '{raw}'"))?;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.sample_interval_ms == 0 {
            return Err(EngineError::config("sample_interval_ms must be positive"));
        }
        if self.detect_timeout_ms == 0 {
            return Err(EngineError::config("detect_timeout_ms must be positive"));
        }
        if self.report_timeout_secs == 0 {
            return Err(EngineError::config("report_timeout_secs must be positive"));
        }
        if self.video_width == 0 || self.video_height == 0 {
            return Err(EngineError::config("video dimensions must be positive"));
        }
        for (name, value) in [
            ("ear_threshold", self.ear_threshold),
            ("head_pose_threshold_px", self.head_pose_threshold_px),
            ("mor_threshold_px", self.mor_threshold_px),
        ] {
            if !value.is_finite() {
                return Err(EngineError::config(format!("{name} must be a finite number")));
            }
        }
        Ok(())
    }

    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            ear: self.ear_threshold,
            head_pose_px: self.head_pose_threshold_px,
            mor_px: self.mor_threshold_px,
        }
    }

    pub fn sample_interval(&self) -> Duration {
        Duration::from_millis(self.sample_interval_ms)
    }

    pub fn detect_timeout(&self) -> Duration {
        Duration::from_millis(self.detect_timeout_ms)
    }
}
