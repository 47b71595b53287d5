// DB Migrator ThemeSink capability
//
// The settings store never touches a rendering environment directly; it
// writes through this trait. The dashboard's style root implements it, and
// tests substitute a recording sink.

use crate::console_log::LogLevel;
use crate::settings::{FontSize, LogLevelColors, Settings, ThemeMode};
use strum::IntoEnumIterator;

/// Style variable holding the primary color as an HSL triple
pub const PRIMARY_VAR: &str = "--primary";
/// Style variable holding the primary color as a decimal RGB triple
pub const PRIMARY_RGB_VAR: &str = "--primary-rgb";
pub const LOG_INFO_COLOR_VAR: &str = "--log-info-color";
pub const LOG_WARN_COLOR_VAR: &str = "--log-warn-color";
pub const LOG_ERROR_COLOR_VAR: &str = "--log-error-color";

/// Style variable a level's console color is written to
pub fn log_color_var(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Info => LOG_INFO_COLOR_VAR,
        LogLevel::Warn => LOG_WARN_COLOR_VAR,
        LogLevel::Error => LOG_ERROR_COLOR_VAR,
    }
}

/// Receiver of the visual side effects produced by settings changes
pub trait ThemeSink: Send {
    /// Primary color, already converted: `hsl` is `"<h> <s>% <l>%"`,
    /// `rgb` is `"<r>, <g>, <b>"`.
    fn set_primary_color(&mut self, hsl: &str, rgb: &str);

    /// Swap the active font-size marker class; the others are removed.
    fn set_font_size(&mut self, size: FontSize);

    fn set_log_color(&mut self, level: LogLevel, color: &str);

    fn set_log_colors(&mut self, colors: &LogLevelColors) {
        for level in LogLevel::iter() {
            self.set_log_color(level, colors.for_level(level));
        }
    }

    fn set_theme_mode(&mut self, mode: ThemeMode);

    /// Push every effect derived from `settings`. Theme mode is skipped when
    /// `skip_theme_mode` is set so a mode already resolved by the host is
    /// left alone.
    fn apply_all(&mut self, settings: &Settings, skip_theme_mode: bool) {
        if !skip_theme_mode {
            self.set_theme_mode(settings.theme.effective_mode());
        }

        let color = settings.theme.primary_color;
        self.set_primary_color(&color.to_hsl_string(), &color.to_rgb_string());
        self.set_font_size(settings.theme.font_size);
        self.set_log_colors(&settings.console.log_level_colors);
    }
}

impl<T: ThemeSink + ?Sized> ThemeSink for Box<T> {
    fn set_primary_color(&mut self, hsl: &str, rgb: &str) {
        (**self).set_primary_color(hsl, rgb)
    }

    fn set_font_size(&mut self, size: FontSize) {
        (**self).set_font_size(size)
    }

    fn set_log_color(&mut self, level: LogLevel, color: &str) {
        (**self).set_log_color(level, color)
    }

    fn set_theme_mode(&mut self, mode: ThemeMode) {
        (**self).set_theme_mode(mode)
    }
}
