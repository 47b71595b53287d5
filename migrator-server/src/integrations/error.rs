// DB Migrator Integration Layer - Error Types
//
// Errors a migration source can report. Loader code turns every one of them
// into the same user-facing message, so variants only matter for logs.

use std::fmt;

/// Errors that can occur while fetching migrations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrationError {
    /// The source answered but the request failed
    FetchFailed(String),

    /// Payload could not be decoded into migration records
    ParseError(String),

    /// No answer within the allotted time
    Timeout { duration_secs: u64 },

    /// The source is switched off (e.g. mock data disabled, no backend)
    Unavailable(String),
}

impl fmt::Display for IntegrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FetchFailed(msg) => write!(f, "Failed to fetch migrations: {}", msg),
            Self::ParseError(msg) => write!(f, "Failed to parse migrations: {}", msg),
            Self::Timeout { duration_secs } => {
                write!(f, "Timeout after {}s waiting for migrations", duration_secs)
            },
            Self::Unavailable(source) => write!(f, "Migration source unavailable: {}", source),
        }
    }
}

impl std::error::Error for IntegrationError {}

impl From<serde_json::Error> for IntegrationError {
    fn from(err: serde_json::Error) -> Self {
        Self::ParseError(err.to_string())
    }
}

/// Result type for integration operations
pub type IntegrationResult<T> = Result<T, IntegrationError>;
