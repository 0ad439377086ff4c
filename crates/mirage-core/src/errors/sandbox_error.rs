//! Sandbox executor errors.

use super::error_code::{self, ErrorCode};

/// Failures of the isolated execution backend. Timeouts and harness
/// failures are NOT errors — they come back as structured outcomes; these
/// variants cover the cases where no outcome could be produced at all.
#[derive(Debug, thiserror::Error)]
pub enum SandboxError {
    #[error("container runtime unavailable: {message}")]
    ContainerUnavailable { message: String },

    #[error("refusing to execute: source imports denied module '{module}'")]
    DeniedImport { module: String },

    #[error("sandbox backend is disabled by configuration")]
    Disabled,

    #[error("failed to spawn sandbox process: {message}")]
    SpawnFailed { message: String },

    #[error("failed to stage harness file: {message}")]
    StagingFailed { message: String },
}

impl ErrorCode for SandboxError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::ContainerUnavailable { .. } => error_code::SANDBOX_UNAVAILABLE,
            Self::DeniedImport { .. } => error_code::DENY_IMPORT,
            _ => error_code::SANDBOX_ERROR,
        }
    }
}
