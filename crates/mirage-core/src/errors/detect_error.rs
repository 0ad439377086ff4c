//! Detector errors.

use super::error_code::{self, ErrorCode};

/// A static or linguistic detector failed internally. These are swallowed
/// at the stage boundary — one detector's failure never suppresses the
/// others — and surface only in the stage logs.
#[derive(Debug, thiserror::Error)]
pub enum DetectError {
    #[error("detector {detector} failed: {message}")]
    DetectorFailed { detector: String, message: String },

    #[error("regex bank failed to compile: {message}")]
    BadRegex { message: String },
}

impl ErrorCode for DetectError {
    fn error_code(&self) -> &'static str {
        error_code::DETECTION_ERROR
    }
}
