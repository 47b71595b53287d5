// Persistence error types
// Local key/value storage backing settings and the migration mode

use std::fmt;
use std::io;

/// Errors that can occur during persistence operations
#[derive(Debug)]
pub enum PersistenceError {
    /// Reading or writing the backing file failed
    Io(String),
    /// Serialization error (JSON encoding/decoding)
    SerializationError(String),
    /// A storage lock was poisoned by a panicking writer
    LockPoisoned,
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "Storage I/O failed: {}", msg),
            Self::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            Self::LockPoisoned => write!(f, "Storage lock poisoned"),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<io::Error> for PersistenceError {
    fn from(err: io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for PersistenceError {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        Self::LockPoisoned
    }
}

/// Result type for persistence operations
pub type PersistenceResult<T> = Result<T, PersistenceError>;
