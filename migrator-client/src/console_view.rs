// DB Migrator console view
//
// Renders console entries as terminal lines: `[timestamp] LEVEL message`.

use migrator_utils::settings::{ConsoleSettings, LogLevelColors};
use migrator_utils::{ConsoleLog, HexColor, LogLevel};

const RESET: &str = "\x1b[0m";

/// Presentation options for the console panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleView {
    pub show_timestamps: bool,
    /// Color the level column with ANSI escapes
    pub ansi: bool,
    /// Follow the tail when new lines arrive
    pub auto_scroll: bool,
    pub colors: LogLevelColors,
}

impl Default for ConsoleView {
    fn default() -> Self {
        Self::from_settings(&ConsoleSettings::default())
    }
}

impl ConsoleView {
    pub fn from_settings(settings: &ConsoleSettings) -> Self {
        Self {
            show_timestamps: settings.show_timestamps,
            ansi: true,
            auto_scroll: settings.auto_scroll_logs,
            colors: settings.log_level_colors.clone(),
        }
    }

    pub fn with_ansi(mut self, ansi: bool) -> Self {
        self.ansi = ansi;
        self
    }

    /// Escape for the configured level color. Colors that are not
    /// `#rrggbb` fall back to the basic palette.
    fn level_escape(&self, level: LogLevel) -> String {
        match self.colors.for_level(level).parse::<HexColor>() {
            Ok(color) => color.ansi_foreground(),
            Err(_) => level.color_code().to_string(),
        }
    }

    pub fn format_line(&self, log: &ConsoleLog) -> String {
        let level = if self.ansi {
            format!("{}{}{}", self.level_escape(log.level), log.level, RESET)
        } else {
            log.level.to_string()
        };

        if self.show_timestamps {
            format!(
                "[{}] {} {}",
                log.timestamp.format("%H:%M:%S"),
                level,
                log.message
            )
        } else {
            format!("{} {}", level, log.message)
        }
    }

    /// All lines, oldest first, newline separated
    pub fn render(&self, logs: &[ConsoleLog]) -> String {
        logs.iter()
            .map(|log| self.format_line(log))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
