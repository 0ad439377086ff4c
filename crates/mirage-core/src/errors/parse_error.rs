//! Parser errors.

use super::error_code::{self, ErrorCode};

/// Errors that can occur while parsing the target program.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("grammar failed to load: {message}")]
    GrammarUnavailable { message: String },

    #[error("tree-sitter returned no tree")]
    NoTree,

    #[error("source is not valid UTF-8 at byte {offset}")]
    InvalidUtf8 { offset: usize },
}

impl ErrorCode for ParseError {
    fn error_code(&self) -> &'static str {
        error_code::PARSE_ERROR
    }
}
