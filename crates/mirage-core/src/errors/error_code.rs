//! ErrorCode trait for the JSON API boundary.

/// Trait for converting Mirage errors to stable API error codes.
/// Every error enum implements this so the HTTP layer can attach a
/// structured code string to its error responses.
pub trait ErrorCode {
    /// Returns the API error code string (e.g., "PARSE_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted boundary string: `[ERROR_CODE] message`.
    fn api_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

// Error code constants for the API boundary.
pub const PARSE_ERROR: &str = "PARSE_ERROR";
pub const DETECTION_ERROR: &str = "DETECTION_ERROR";
pub const SANDBOX_ERROR: &str = "SANDBOX_ERROR";
pub const SANDBOX_UNAVAILABLE: &str = "SANDBOX_UNAVAILABLE";
pub const DENY_IMPORT: &str = "DENY_IMPORT";
pub const PROVIDER_ERROR: &str = "PROVIDER_ERROR";
pub const PROVIDER_UNAVAILABLE: &str = "PROVIDER_UNAVAILABLE";
pub const MALFORMED_VERDICT: &str = "MALFORMED_VERDICT";
pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
pub const MIGRATION_FAILED: &str = "MIGRATION_FAILED";
pub const UNKNOWN_PATTERN: &str = "UNKNOWN_PATTERN";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const INVALID_INPUT: &str = "INVALID_INPUT";
pub const NOT_FOUND: &str = "NOT_FOUND";
