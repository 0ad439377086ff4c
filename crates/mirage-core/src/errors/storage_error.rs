//! Persistence errors.

use super::error_code::{self, ErrorCode};

/// Errors from the SQLite persistence layer. Persistence failure is fatal
/// to the enclosing request — no partial records are written.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("sqlite error: {message}")]
    Sqlite { message: String },

    #[error("migration to version {version} failed: {message}")]
    MigrationFailed { version: u32, message: String },

    #[error("analysis {id} not found")]
    NotFound { id: i64 },

    #[error("refusing to persist unknown pattern tag '{tag}'")]
    UnknownPattern { tag: String },
}

impl StorageError {
    pub fn sqlite(message: impl std::fmt::Display) -> Self {
        Self::Sqlite {
            message: message.to_string(),
        }
    }
}

impl ErrorCode for StorageError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::MigrationFailed { .. } => error_code::MIGRATION_FAILED,
            Self::NotFound { .. } => error_code::NOT_FOUND,
            Self::UnknownPattern { .. } => error_code::UNKNOWN_PATTERN,
            Self::Sqlite { .. } => error_code::STORAGE_ERROR,
        }
    }
}
