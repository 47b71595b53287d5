// DB Migrator style root: ThemeSink backed by a variable map and class set
use log::debug;
use migrator_utils::settings::{FontSize, ThemeMode};
use migrator_utils::theme::{log_color_var, PRIMARY_RGB_VAR, PRIMARY_VAR};
use migrator_utils::{LogLevel, ThemeSink};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write;

/// One effect applied to the root since the last drain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StyleChange {
    Variable(String),
    Class(String),
    ThemeMode(ThemeMode),
}

/// In-memory document root: style variables, marker classes and the theme
/// mode. Changes are recorded so a renderer only redraws what moved.
#[derive(Debug, Default, Clone)]
pub struct StyleRoot {
    variables: BTreeMap<String, String>,
    classes: BTreeSet<String>,
    theme_mode: Option<ThemeMode>,
    changes: Vec<StyleChange>,
}

impl StyleRoot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn variable(&self, name: &str) -> Option<&str> {
        self.variables.get(name).map(String::as_str)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(String::as_str)
    }

    /// `None` until a theme mode was pushed
    pub fn theme_mode(&self) -> Option<ThemeMode> {
        self.theme_mode
    }

    /// Changes since the previous call, oldest first
    pub fn take_changes(&mut self) -> Vec<StyleChange> {
        std::mem::take(&mut self.changes)
    }

    fn set_variable(&mut self, name: &str, value: &str) {
        if self.variables.get(name).map(String::as_str) == Some(value) {
            return;
        }
        self.variables.insert(name.to_string(), value.to_string());
        self.changes.push(StyleChange::Variable(name.to_string()));
    }

    /// The root as a stylesheet block plus its class list
    pub fn render_css(&self) -> String {
        let mut css = String::from(":root {\n");
        for (name, value) in &self.variables {
            let _ = writeln!(css, "  {}: {};", name, value);
        }
        css.push('}');

        let classes: Vec<&str> = self.classes().collect();
        if !classes.is_empty() {
            let _ = write!(css, "\n/* class=\"{}\" */", classes.join(" "));
        }
        if let Some(mode) = self.theme_mode {
            let _ = write!(css, "\n/* theme: {} */", mode);
        }
        css
    }
}

impl ThemeSink for StyleRoot {
    fn set_primary_color(&mut self, hsl: &str, rgb: &str) {
        self.set_variable(PRIMARY_VAR, hsl);
        self.set_variable(PRIMARY_RGB_VAR, rgb);
    }

    fn set_font_size(&mut self, size: FontSize) {
        let class = size.css_class();
        for other in FontSize::ALL_CLASSES {
            if other != class {
                self.classes.remove(other);
            }
        }
        if self.classes.insert(class.to_string()) {
            debug!("Font size class is now {}", class);
            self.changes.push(StyleChange::Class(class.to_string()));
        }
    }

    fn set_log_color(&mut self, level: LogLevel, color: &str) {
        self.set_variable(log_color_var(level), color);
    }

    fn set_theme_mode(&mut self, mode: ThemeMode) {
        self.theme_mode = Some(mode);
        self.changes.push(StyleChange::ThemeMode(mode));
    }
}
