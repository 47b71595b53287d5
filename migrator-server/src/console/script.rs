// DB Migrator Operation Scripts
//
// Canned narratives replayed by the simulator. Each step fires at a fixed
// offset from invocation; all lines of one step land together.

use migrator_utils::LogLevel;
use std::time::Duration;
use strum_macros::{Display, EnumIter, EnumString};

/// The four simulated console operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum OperationKind {
    Migrate,
    Rollback,
    DryRun,
    ShowSql,
}

/// Lines appended together at `delay` after invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptStep {
    pub delay: Duration,
    pub lines: Vec<(LogLevel, &'static str)>,
}

impl ScriptStep {
    fn info(delay_ms: u64, message: &'static str) -> Self {
        Self::lines(delay_ms, vec![(LogLevel::Info, message)])
    }

    fn lines(delay_ms: u64, lines: Vec<(LogLevel, &'static str)>) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
            lines,
        }
    }
}

impl OperationKind {
    /// Steps in delay order; the first step always has zero delay.
    pub fn script(&self) -> Vec<ScriptStep> {
        match self {
            OperationKind::Migrate => vec![
                ScriptStep::info(0, "Starting migration process..."),
                ScriptStep::info(500, "Validating migration scripts..."),
                ScriptStep::info(1000, "Applying migration v2.0.0..."),
                ScriptStep::info(1500, "Created table user_preferences"),
                ScriptStep::info(2000, "Created table settings"),
                ScriptStep::info(2500, "Migration completed successfully"),
            ],
            OperationKind::Rollback => vec![
                ScriptStep::info(0, "Starting rollback process..."),
                ScriptStep::info(500, "Validating rollback scripts..."),
                ScriptStep::info(1000, "Rolling back migration v1.3.0..."),
                ScriptStep::info(1500, "Dropped table order_items"),
                ScriptStep::info(2000, "Rollback completed successfully"),
            ],
            OperationKind::DryRun => vec![
                ScriptStep::info(0, "Starting dry run for pending migrations..."),
                ScriptStep::info(500, "Validating migration scripts..."),
                ScriptStep::info(1000, "Simulating migration v2.0.0..."),
                ScriptStep::info(1500, "Would create table user_preferences"),
                ScriptStep::info(2000, "Would create table settings"),
                ScriptStep::lines(
                    2500,
                    vec![(
                        LogLevel::Warn,
                        "Foreign key constraint would reference users table",
                    )],
                ),
                ScriptStep::info(3000, "Dry run completed successfully"),
            ],
            OperationKind::ShowSql => vec![
                ScriptStep::info(0, "Generating SQL for pending migrations..."),
                ScriptStep::info(500, "SQL for migration v2.0.0:"),
                ScriptStep::lines(
                    1000,
                    vec![
                        (LogLevel::Info, "CREATE TABLE user_preferences ("),
                        (
                            LogLevel::Info,
                            "  user_id INTEGER PRIMARY KEY REFERENCES users(id),",
                        ),
                        (LogLevel::Info, "  theme VARCHAR(20) DEFAULT 'light',"),
                        (LogLevel::Info, "  notifications_enabled BOOLEAN DEFAULT TRUE"),
                        (LogLevel::Info, ");"),
                    ],
                ),
                ScriptStep::lines(
                    2000,
                    vec![
                        (LogLevel::Info, "CREATE TABLE settings ("),
                        (LogLevel::Info, "  key VARCHAR(50) PRIMARY KEY,"),
                        (LogLevel::Info, "  value TEXT NOT NULL,"),
                        (LogLevel::Info, "  description TEXT"),
                        (LogLevel::Info, ");"),
                    ],
                ),
            ],
        }
    }

    /// Offset of the last step, i.e. when the operation's final line lands
    pub fn duration(&self) -> Duration {
        self.script()
            .last()
            .map(|step| step.delay)
            .unwrap_or_default()
    }
}
