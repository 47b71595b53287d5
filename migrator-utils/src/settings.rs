// DB Migrator Settings Model
//
// Persisted as JSON under the `dbMigratorSettings` storage key. Every section
// carries `#[serde(default)]` so a blob written by an older build (or edited by
// hand) fills the missing fields from the defaults instead of failing.

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

use crate::color::HexColor;
use crate::console_log::LogLevel;

/// Allowed range for `console.maxLogLines`
pub const MAX_LOG_LINES_RANGE: RangeInclusive<u32> = 100..=5000;

/// Allowed range for `execution.operationTimeout` (seconds)
pub const OPERATION_TIMEOUT_RANGE: RangeInclusive<u32> = 5..=300;

/// Deployment target the dashboard is scoped to
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum Environment {
    #[default]
    Dev,
    Qa,
    Staging,
    Prod,
}

/// What happens when a version is picked on the timeline
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase", ascii_case_insensitive)]
pub enum DefaultAction {
    #[default]
    ShowDetails,
    Migrate,
    Rollback,
}

/// Light/dark mode handed to the theme sink
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ThemeMode {
    Light,
    Dark,
    #[default]
    System,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum FontSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl FontSize {
    /// Every marker class a font size can set; exactly one is active at a time.
    pub const ALL_CLASSES: [&'static str; 3] = ["text-sm", "text-base", "text-lg"];

    pub fn css_class(&self) -> &'static str {
        match self {
            FontSize::Small => "text-sm",
            FontSize::Medium => "text-base",
            FontSize::Large => "text-lg",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GeneralSettings {
    pub default_environment: Environment,
    pub default_project: String,
    pub auto_select_latest_migration: bool,
    pub auto_open_console: bool,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            default_environment: Environment::Dev,
            default_project: "main-database".to_string(),
            auto_select_latest_migration: true,
            auto_open_console: false,
        }
    }
}

/// Per-level console colors (any CSS color string)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogLevelColors {
    pub info: String,
    pub warn: String,
    pub error: String,
}

impl LogLevelColors {
    pub fn for_level(&self, level: LogLevel) -> &str {
        match level {
            LogLevel::Info => &self.info,
            LogLevel::Warn => &self.warn,
            LogLevel::Error => &self.error,
        }
    }

    pub fn set(&mut self, level: LogLevel, color: &str) {
        let slot = match level {
            LogLevel::Info => &mut self.info,
            LogLevel::Warn => &mut self.warn,
            LogLevel::Error => &mut self.error,
        };
        *slot = color.to_string();
    }
}

impl Default for LogLevelColors {
    fn default() -> Self {
        Self {
            info: "#3b82f6".to_string(),  // blue-500
            warn: "#f59e0b".to_string(),  // amber-500
            error: "#ef4444".to_string(), // red-500
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConsoleSettings {
    pub auto_scroll_logs: bool,
    pub show_timestamps: bool,
    pub log_level_colors: LogLevelColors,
    pub max_log_lines: u32,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            auto_scroll_logs: true,
            show_timestamps: true,
            log_level_colors: LogLevelColors::default(),
            max_log_lines: 1000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExecutionSettings {
    pub ask_confirmation_before_execution: bool,
    pub enable_dry_run_by_default: bool,
    pub default_action_on_selecting_version: DefaultAction,
    /// Seconds
    pub operation_timeout: u32,
}

impl Default for ExecutionSettings {
    fn default() -> Self {
        Self {
            ask_confirmation_before_execution: true,
            enable_dry_run_by_default: false,
            default_action_on_selecting_version: DefaultAction::ShowDetails,
            operation_timeout: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AdvancedSettings {
    pub enable_mock_data: bool,
    /// Placeholder; nothing dereferences it yet.
    pub base_api_url: String,
    /// Placeholder; never sent anywhere and redacted from output.
    pub auth_token: String,
    pub verbose_logs: bool,
}

impl Default for AdvancedSettings {
    fn default() -> Self {
        Self {
            enable_mock_data: true,
            base_api_url: "http://localhost:8080/api".to_string(),
            auth_token: String::new(),
            verbose_logs: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ThemeSettings {
    pub use_system_theme: bool,
    pub theme: ThemeMode,
    pub primary_color: HexColor,
    pub font_size: FontSize,
}

impl ThemeSettings {
    /// The mode that actually governs the visuals: the system preference wins
    /// whenever `use_system_theme` is set.
    pub fn effective_mode(&self) -> ThemeMode {
        if self.use_system_theme {
            ThemeMode::System
        } else {
            self.theme
        }
    }
}

impl Default for ThemeSettings {
    fn default() -> Self {
        Self {
            use_system_theme: true,
            theme: ThemeMode::System,
            primary_color: HexColor::from_rgb(0x3b, 0x82, 0xf6), // blue-500
            font_size: FontSize::Medium,
        }
    }
}

/// Complete dashboard configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub console: ConsoleSettings,
    pub execution: ExecutionSettings,
    pub advanced: AdvancedSettings,
    pub theme: ThemeSettings,
}

impl Settings {
    /// Clamp bounded numeric fields into their allowed ranges.
    pub fn normalized(mut self) -> Self {
        self.console.max_log_lines = clamp_to(self.console.max_log_lines, &MAX_LOG_LINES_RANGE);
        self.execution.operation_timeout =
            clamp_to(self.execution.operation_timeout, &OPERATION_TIMEOUT_RANGE);
        self
    }

    /// Copy with the auth token masked, for display
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if !copy.advanced.auth_token.is_empty() {
            copy.advanced.auth_token = "********".to_string();
        }
        copy
    }
}

fn clamp_to(value: u32, range: &RangeInclusive<u32>) -> u32 {
    value.clamp(*range.start(), *range.end())
}

// Partial updates, one type per section. `None` leaves a field untouched.

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct GeneralPatch {
    pub default_environment: Option<Environment>,
    pub default_project: Option<String>,
    pub auto_select_latest_migration: Option<bool>,
    pub auto_open_console: Option<bool>,
}

impl GeneralPatch {
    pub fn apply_to(&self, section: &mut GeneralSettings) {
        if let Some(env) = self.default_environment {
            section.default_environment = env;
        }
        if let Some(project) = &self.default_project {
            section.default_project = project.clone();
        }
        if let Some(flag) = self.auto_select_latest_migration {
            section.auto_select_latest_migration = flag;
        }
        if let Some(flag) = self.auto_open_console {
            section.auto_open_console = flag;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ConsolePatch {
    pub auto_scroll_logs: Option<bool>,
    pub show_timestamps: Option<bool>,
    pub log_level_colors: Option<LogLevelColorsPatch>,
    pub max_log_lines: Option<u32>,
}

/// Per-level color changes; levels left out keep their current color.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogLevelColorsPatch {
    pub info: Option<String>,
    pub warn: Option<String>,
    pub error: Option<String>,
}

impl LogLevelColorsPatch {
    pub fn for_level(&self, level: LogLevel) -> Option<&str> {
        match level {
            LogLevel::Info => self.info.as_deref(),
            LogLevel::Warn => self.warn.as_deref(),
            LogLevel::Error => self.error.as_deref(),
        }
    }

    /// Levels carried by the patch, in level order
    pub fn entries(&self) -> impl Iterator<Item = (LogLevel, &str)> + '_ {
        LogLevel::iter().filter_map(move |level| self.for_level(level).map(|color| (level, color)))
    }

    pub fn apply_to(&self, colors: &mut LogLevelColors) {
        for (level, color) in self.entries() {
            colors.set(level, color);
        }
    }
}

impl From<LogLevelColors> for LogLevelColorsPatch {
    fn from(colors: LogLevelColors) -> Self {
        Self {
            info: Some(colors.info),
            warn: Some(colors.warn),
            error: Some(colors.error),
        }
    }
}

impl ConsolePatch {
    pub fn apply_to(&self, section: &mut ConsoleSettings) {
        if let Some(flag) = self.auto_scroll_logs {
            section.auto_scroll_logs = flag;
        }
        if let Some(flag) = self.show_timestamps {
            section.show_timestamps = flag;
        }
        if let Some(colors) = &self.log_level_colors {
            colors.apply_to(&mut section.log_level_colors);
        }
        if let Some(lines) = self.max_log_lines {
            section.max_log_lines = clamp_to(lines, &MAX_LOG_LINES_RANGE);
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ExecutionPatch {
    pub ask_confirmation_before_execution: Option<bool>,
    pub enable_dry_run_by_default: Option<bool>,
    pub default_action_on_selecting_version: Option<DefaultAction>,
    pub operation_timeout: Option<u32>,
}

impl ExecutionPatch {
    pub fn apply_to(&self, section: &mut ExecutionSettings) {
        if let Some(flag) = self.ask_confirmation_before_execution {
            section.ask_confirmation_before_execution = flag;
        }
        if let Some(flag) = self.enable_dry_run_by_default {
            section.enable_dry_run_by_default = flag;
        }
        if let Some(action) = self.default_action_on_selecting_version {
            section.default_action_on_selecting_version = action;
        }
        if let Some(secs) = self.operation_timeout {
            section.operation_timeout = clamp_to(secs, &OPERATION_TIMEOUT_RANGE);
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct AdvancedPatch {
    pub enable_mock_data: Option<bool>,
    pub base_api_url: Option<String>,
    pub auth_token: Option<String>,
    pub verbose_logs: Option<bool>,
}

impl AdvancedPatch {
    pub fn apply_to(&self, section: &mut AdvancedSettings) {
        if let Some(flag) = self.enable_mock_data {
            section.enable_mock_data = flag;
        }
        if let Some(url) = &self.base_api_url {
            section.base_api_url = url.clone();
        }
        if let Some(token) = &self.auth_token {
            section.auth_token = token.clone();
        }
        if let Some(flag) = self.verbose_logs {
            section.verbose_logs = flag;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ThemePatch {
    pub use_system_theme: Option<bool>,
    pub theme: Option<ThemeMode>,
    pub primary_color: Option<HexColor>,
    pub font_size: Option<FontSize>,
}

impl ThemePatch {
    /// True when applying this patch would change which mode governs the
    /// visuals: `use_system_theme` or `theme` present with a new value.
    pub fn changes_mode(&self, current: &ThemeSettings) -> bool {
        self.use_system_theme
            .map_or(false, |flag| flag != current.use_system_theme)
            || self.theme.map_or(false, |mode| mode != current.theme)
    }

    pub fn apply_to(&self, section: &mut ThemeSettings) {
        if let Some(flag) = self.use_system_theme {
            section.use_system_theme = flag;
        }
        if let Some(mode) = self.theme {
            section.theme = mode;
        }
        if let Some(color) = self.primary_color {
            section.primary_color = color;
        }
        if let Some(size) = self.font_size {
            section.font_size = size;
        }
    }
}

/// A partial settings update: only the sections present are merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SettingsPatch {
    pub general: Option<GeneralPatch>,
    pub console: Option<ConsolePatch>,
    pub execution: Option<ExecutionPatch>,
    pub advanced: Option<AdvancedPatch>,
    pub theme: Option<ThemePatch>,
}

impl SettingsPatch {
    pub fn is_empty(&self) -> bool {
        self.general.is_none()
            && self.console.is_none()
            && self.execution.is_none()
            && self.advanced.is_none()
            && self.theme.is_none()
    }
}
