//! LLM reasoner errors.

use super::error_code::{self, ErrorCode};

/// Failures of the external model tier. All of these degrade the affected
/// detector to its fallback verdict; none abort the analysis.
#[derive(Debug, thiserror::Error)]
pub enum ReasonError {
    #[error("no model provider is configured")]
    NoProviders,

    #[error("provider {provider} request failed: {message}")]
    RequestFailed { provider: String, message: String },

    #[error("provider {provider} returned HTTP {status}")]
    BadStatus { provider: String, status: u16 },

    #[error("provider {provider} returned malformed verdict JSON: {message}")]
    MalformedVerdict { provider: String, message: String },

    #[error("all providers exhausted")]
    Exhausted,
}

impl ErrorCode for ReasonError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NoProviders | Self::Exhausted => error_code::PROVIDER_UNAVAILABLE,
            Self::MalformedVerdict { .. } => error_code::MALFORMED_VERDICT,
            _ => error_code::PROVIDER_ERROR,
        }
    }
}
