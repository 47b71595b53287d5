// Shared helpers for unit tests in this crate

use migrator_utils::settings::{FontSize, ThemeMode};
use migrator_utils::{LogLevel, ThemeSink};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    Primary { hsl: String, rgb: String },
    FontSize(FontSize),
    LogColor(LogLevel, String),
    ThemeMode(ThemeMode),
}

/// ThemeSink that records every call in order
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub events: Vec<SinkEvent>,
}

impl RecordingSink {
    pub fn take(&mut self) -> Vec<SinkEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn theme_modes(&self) -> Vec<ThemeMode> {
        self.events
            .iter()
            .filter_map(|event| match event {
                SinkEvent::ThemeMode(mode) => Some(*mode),
                _ => None,
            })
            .collect()
    }
}

impl ThemeSink for RecordingSink {
    fn set_primary_color(&mut self, hsl: &str, rgb: &str) {
        self.events.push(SinkEvent::Primary {
            hsl: hsl.to_string(),
            rgb: rgb.to_string(),
        });
    }

    fn set_font_size(&mut self, size: FontSize) {
        self.events.push(SinkEvent::FontSize(size));
    }

    fn set_log_color(&mut self, level: LogLevel, color: &str) {
        self.events
            .push(SinkEvent::LogColor(level, color.to_string()));
    }

    fn set_theme_mode(&mut self, mode: ThemeMode) {
        self.events.push(SinkEvent::ThemeMode(mode));
    }
}
