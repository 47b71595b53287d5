// DB Migrator Console Buffer
//
// Insertion-ordered log history. The history itself is never trimmed; the
// display cap is applied when a slice is taken for rendering.

use chrono::{Duration, Utc};
use migrator_utils::{ConsoleLog, LogLevel};

/// Which end of the history survives when the display cap is hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrimPolicy {
    /// Rolling window: show the most recent entries
    #[default]
    KeepNewest,
    /// Show the first entries and hide everything past the cap
    KeepOldest,
}

/// Append-only console history
#[derive(Debug, Clone, Default)]
pub struct LogBuffer {
    entries: Vec<ConsoleLog>,
}

impl LogBuffer {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Buffer seeded the way a freshly opened console looks
    pub fn with_startup_banner(project: &str) -> Self {
        let now = Utc::now();
        Self {
            entries: vec![
                ConsoleLog::at(now, LogLevel::Info, "DB Migrator initialized successfully"),
                ConsoleLog::at(
                    now - Duration::seconds(5),
                    LogLevel::Info,
                    format!("Connected to database: {}", project),
                ),
            ],
        }
    }

    /// Add one entry at the tail, stamped now
    pub fn append(&mut self, level: LogLevel, message: impl Into<String>) -> &ConsoleLog {
        self.push(ConsoleLog::new(level, message))
    }

    pub fn push(&mut self, log: ConsoleLog) -> &ConsoleLog {
        self.entries.push(log);
        &self.entries[self.entries.len() - 1]
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[ConsoleLog] {
        &self.entries
    }

    pub fn last(&self) -> Option<&ConsoleLog> {
        self.entries.last()
    }

    /// At most `max_lines` entries in oldest-first order.
    pub fn visible(&self, max_lines: usize, policy: TrimPolicy) -> &[ConsoleLog] {
        let len = self.entries.len();
        if len <= max_lines {
            return &self.entries;
        }
        match policy {
            TrimPolicy::KeepNewest => &self.entries[len - max_lines..],
            TrimPolicy::KeepOldest => &self.entries[..max_lines],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(n: usize) -> LogBuffer {
        let mut buffer = LogBuffer::new();
        for i in 0..n {
            buffer.append(LogLevel::Info, format!("line {}", i));
        }
        buffer
    }

    #[test]
    fn test_append_grows_by_one() {
        let mut buffer = LogBuffer::new();
        for expected in 1..=5 {
            buffer.append(LogLevel::Warn, "x");
            assert_eq!(buffer.len(), expected);
        }
        assert_eq!(buffer.last().unwrap().level, LogLevel::Warn);
    }

    #[test]
    fn test_clear_empties() {
        let mut buffer = filled(3);
        buffer.clear();
        assert!(buffer.is_empty());
        assert_eq!(buffer.len(), 0);
    }

    #[test]
    fn test_visible_cap_keep_newest() {
        let buffer = filled(150);
        let visible = buffer.visible(100, TrimPolicy::KeepNewest);
        assert_eq!(visible.len(), 100);
        assert_eq!(visible[0].message, "line 50");
        assert_eq!(visible[99].message, "line 149");
    }

    #[test]
    fn test_visible_cap_keep_oldest() {
        let buffer = filled(150);
        let visible = buffer.visible(100, TrimPolicy::KeepOldest);
        assert_eq!(visible.len(), 100);
        assert_eq!(visible[0].message, "line 0");
        assert_eq!(visible[99].message, "line 99");
    }

    #[test]
    fn test_visible_under_cap_is_everything() {
        let buffer = filled(3);
        assert_eq!(buffer.visible(100, TrimPolicy::KeepOldest).len(), 3);
        // history is never trimmed
        assert_eq!(filled(150).len(), 150);
    }

    #[test]
    fn test_startup_banner() {
        let buffer = LogBuffer::with_startup_banner("main-database");
        assert_eq!(buffer.len(), 2);
        assert_eq!(
            buffer.entries()[0].message,
            "DB Migrator initialized successfully"
        );
        assert_eq!(
            buffer.entries()[1].message,
            "Connected to database: main-database"
        );
        assert!(buffer.entries()[1].timestamp < buffer.entries()[0].timestamp);
    }
}
