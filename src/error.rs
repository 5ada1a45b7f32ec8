//! Error taxonomy for the attention engine.

/// Errors raised by the engine and its session lifecycle.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Malformed landmarks: {message}")]
    MalformedInput { message: String },

    #[error("Session is closed; frame rejected")]
    SessionClosed,

    #[error("Session is still active")]
    SessionStillActive,

    #[error("A monitoring session is already active")]
    SessionActive,

    #[error("No active monitoring session")]
    NoActiveSession,

    #[error("Camera unavailable: {message}")]
    CameraUnavailable { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Report delivery failed: {message}")]
    Report { message: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type EngineResult<T> = Result<T, EngineError>;

impl EngineError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedInput {
            message: msg.into(),
        }
    }

    pub fn camera_unavailable(msg: impl Into<String>) -> Self {
        Self::CameraUnavailable {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn report(msg: impl Into<String>) -> Self {
        Self::Report {
            message: msg.into(),
        }
    }
}
