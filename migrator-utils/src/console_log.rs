// DB Migrator Console Log
//
// Log entry types shared by the operation simulator and the console view.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// Severity of a console entry
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum LogLevel {
    Info,
    #[strum(to_string = "WARN", serialize = "WARNING")]
    Warn,
    Error,
}

impl LogLevel {
    /// Fallback ANSI color used when the configured color is not a hex value
    pub fn color_code(&self) -> &'static str {
        match self {
            LogLevel::Info => "\x1b[34m",  // Blue
            LogLevel::Warn => "\x1b[33m",  // Yellow
            LogLevel::Error => "\x1b[31m", // Red
        }
    }
}

/// One line of console output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleLog {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
}

impl ConsoleLog {
    /// Create an entry stamped with the current wall-clock time
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self::at(Utc::now(), level, message)
    }

    pub fn at(timestamp: DateTime<Utc>, level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            timestamp,
            level,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Info, message)
    }

    pub fn warn(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Warn, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Error, message)
    }

    /// ISO 8601 timestamp with millisecond precision and a `Z` suffix
    pub fn iso_timestamp(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}
