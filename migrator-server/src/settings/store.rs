// DB Migrator Settings Store
//
// Owns the live Settings value, merges per-section patches, persists to local
// storage and pushes visual effects through the injected ThemeSink.

use log::{debug, info, warn};
use migrator_utils::settings::{
    AdvancedPatch, ConsolePatch, ExecutionPatch, GeneralPatch, Settings, SettingsPatch, ThemePatch,
};
use migrator_utils::ThemeSink;
use std::sync::Arc;

use crate::persistence::{KeyValueStorage, PersistenceResult, SETTINGS_KEY};

/// Settings service with a single owner.
///
/// Every mutation marks the store as having unsaved changes; only
/// [`SettingsStore::save`] clears the flag (or a caller discarding changes via
/// [`SettingsStore::set_unsaved_changes`]).
pub struct SettingsStore<S: ThemeSink> {
    settings: Settings,
    unsaved: bool,
    storage: Arc<dyn KeyValueStorage>,
    sink: S,
}

impl<S: ThemeSink> SettingsStore<S> {
    /// Create a store holding the defaults. No storage read and no visual
    /// effects happen until [`SettingsStore::reload`].
    pub fn new(storage: Arc<dyn KeyValueStorage>, sink: S) -> Self {
        Self {
            settings: Settings::default(),
            unsaved: false,
            storage,
            sink,
        }
    }

    /// Create a store and immediately load the persisted settings.
    pub fn load(storage: Arc<dyn KeyValueStorage>, sink: S) -> Self {
        let mut store = Self::new(storage, sink);
        store.reload();
        store
    }

    /// Replace the in-memory settings with the persisted blob.
    ///
    /// A missing, unreadable or malformed blob falls back to the defaults.
    /// Either way every effect except theme mode is applied, leaving the mode
    /// the host already resolved for this session untouched.
    pub fn reload(&mut self) {
        self.settings = match self.storage.get_item(SETTINGS_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Settings>(&raw) {
                Ok(parsed) => {
                    info!("Loaded stored settings");
                    parsed.normalized()
                },
                Err(e) => {
                    warn!("Failed to parse stored settings, using defaults: {}", e);
                    Settings::default()
                },
            },
            Ok(None) => {
                debug!("No stored settings, using defaults");
                Settings::default()
            },
            Err(e) => {
                warn!("Failed to read stored settings, using defaults: {}", e);
                Settings::default()
            },
        };
        self.unsaved = false;
        self.sink.apply_all(&self.settings, true);
    }

    pub fn get(&self) -> &Settings {
        &self.settings
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.unsaved
    }

    pub fn set_unsaved_changes(&mut self, unsaved: bool) {
        self.unsaved = unsaved;
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Merge every section present in `patch`, in section order. Sections
    /// that are absent are untouched. An empty patch still marks the store
    /// unsaved.
    pub fn update(&mut self, patch: &SettingsPatch) {
        if let Some(general) = &patch.general {
            self.update_general(general);
        }
        if let Some(console) = &patch.console {
            self.update_console(console);
        }
        if let Some(execution) = &patch.execution {
            self.update_execution(execution);
        }
        if let Some(advanced) = &patch.advanced {
            self.update_advanced(advanced);
        }
        if let Some(theme) = &patch.theme {
            self.update_theme(theme);
        }
        self.unsaved = true;
    }

    pub fn update_general(&mut self, patch: &GeneralPatch) {
        patch.apply_to(&mut self.settings.general);
        self.unsaved = true;
        debug!("Updated general settings");
    }

    /// Only the log-level colors the patch carries are pushed to the sink.
    pub fn update_console(&mut self, patch: &ConsolePatch) {
        patch.apply_to(&mut self.settings.console);
        if let Some(colors) = &patch.log_level_colors {
            for (level, color) in colors.entries() {
                self.sink.set_log_color(level, color);
            }
        }
        self.unsaved = true;
        debug!("Updated console settings");
    }

    pub fn update_execution(&mut self, patch: &ExecutionPatch) {
        patch.apply_to(&mut self.settings.execution);
        self.unsaved = true;
        debug!("Updated execution settings");
    }

    pub fn update_advanced(&mut self, patch: &AdvancedPatch) {
        patch.apply_to(&mut self.settings.advanced);
        self.unsaved = true;
        debug!("Updated advanced settings");
    }

    /// Applies only the effects the patch touched. Theme mode is pushed only
    /// when `use_system_theme` or `theme` actually changed value; a primary
    /// color change alone never re-applies the mode.
    pub fn update_theme(&mut self, patch: &ThemePatch) {
        let mode_changed = patch.changes_mode(&self.settings.theme);
        patch.apply_to(&mut self.settings.theme);

        let theme = &self.settings.theme;
        if patch.primary_color.is_some() {
            self.sink.set_primary_color(
                &theme.primary_color.to_hsl_string(),
                &theme.primary_color.to_rgb_string(),
            );
        }
        if patch.font_size.is_some() {
            self.sink.set_font_size(theme.font_size);
        }
        if mode_changed {
            self.sink.set_theme_mode(theme.effective_mode());
        }

        self.unsaved = true;
        debug!("Updated theme settings");
    }

    /// Restore the defaults and apply every effect, theme mode included.
    /// The defaults are not persisted until [`SettingsStore::save`].
    pub fn reset(&mut self) {
        self.settings = Settings::default();
        self.sink.apply_all(&self.settings, false);
        self.unsaved = true;
        info!("Settings reset to defaults");
    }

    /// Persist the current settings, clear the unsaved flag and re-apply
    /// every effect including theme mode.
    ///
    /// On a storage failure nothing is applied and the unsaved flag stays set.
    pub fn save(&mut self) -> PersistenceResult<()> {
        let raw = serde_json::to_string(&self.settings)?;
        self.storage.set_item(SETTINGS_KEY, &raw)?;

        self.unsaved = false;
        self.sink.apply_all(&self.settings, false);
        info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{MemoryStorage, PersistenceError};
    use crate::test_support::{RecordingSink, SinkEvent};
    use migrator_utils::settings::{Environment, FontSize, LogLevelColors, ThemeMode};
    use migrator_utils::{HexColor, LogLevel};

    fn memory() -> Arc<dyn KeyValueStorage> {
        Arc::new(MemoryStorage::new())
    }

    fn store() -> SettingsStore<RecordingSink> {
        SettingsStore::new(memory(), RecordingSink::default())
    }

    struct FailingStorage;

    impl KeyValueStorage for FailingStorage {
        fn get_item(&self, _key: &str) -> PersistenceResult<Option<String>> {
            Err(PersistenceError::Io("unreadable".to_string()))
        }
        fn set_item(&self, _key: &str, _value: &str) -> PersistenceResult<()> {
            Err(PersistenceError::Io("quota exceeded".to_string()))
        }
        fn remove_item(&self, _key: &str) -> PersistenceResult<()> {
            Ok(())
        }
    }

    #[test]
    fn test_new_store_holds_defaults_without_effects() {
        let store = store();
        assert_eq!(store.get(), &Settings::default());
        assert!(!store.has_unsaved_changes());
        assert!(store.sink().events.is_empty());
    }

    #[test]
    fn test_disjoint_updates_compose() {
        let mut store = store();
        store.update(&SettingsPatch {
            general: Some(GeneralPatch {
                default_environment: Some(Environment::Prod),
                ..Default::default()
            }),
            ..Default::default()
        });
        store.update(&SettingsPatch {
            advanced: Some(AdvancedPatch {
                verbose_logs: Some(true),
                ..Default::default()
            }),
            ..Default::default()
        });

        let mut expected = Settings::default();
        expected.general.default_environment = Environment::Prod;
        expected.advanced.verbose_logs = true;
        assert_eq!(store.get(), &expected);
        assert!(store.has_unsaved_changes());
    }

    #[test]
    fn test_update_merges_within_section() {
        let mut store = store();
        store.update_console(&ConsolePatch {
            show_timestamps: Some(false),
            ..Default::default()
        });
        store.update_console(&ConsolePatch {
            max_log_lines: Some(250),
            ..Default::default()
        });

        let console = &store.get().console;
        assert!(!console.show_timestamps);
        assert_eq!(console.max_log_lines, 250);
        assert!(console.auto_scroll_logs);
    }

    #[test]
    fn test_primary_color_change_does_not_touch_theme_mode() {
        let mut store = store();
        store.update_theme(&ThemePatch {
            primary_color: Some(HexColor::from_rgb(0, 0, 0)),
            ..Default::default()
        });

        assert_eq!(
            store.sink().events,
            vec![SinkEvent::Primary {
                hsl: "0 0% 0%".to_string(),
                rgb: "0, 0, 0".to_string()
            }]
        );
    }

    #[test]
    fn test_theme_mode_applied_only_on_change() {
        let mut store = store();

        // same value as current: no mode effect
        store.update_theme(&ThemePatch {
            use_system_theme: Some(true),
            ..Default::default()
        });
        assert!(store.sink().theme_modes().is_empty());

        store.update_theme(&ThemePatch {
            use_system_theme: Some(false),
            ..Default::default()
        });
        // theme is still "system" even with the system flag off
        assert_eq!(store.sink().theme_modes(), vec![ThemeMode::System]);

        store.update_theme(&ThemePatch {
            theme: Some(ThemeMode::Dark),
            ..Default::default()
        });
        assert_eq!(
            store.sink().theme_modes(),
            vec![ThemeMode::System, ThemeMode::Dark]
        );
    }

    #[test]
    fn test_font_size_and_log_colors_effects() {
        let mut store = store();
        store.update_theme(&ThemePatch {
            font_size: Some(FontSize::Large),
            ..Default::default()
        });
        let colors = LogLevelColors {
            info: "#111111".to_string(),
            warn: "#222222".to_string(),
            error: "#333333".to_string(),
        };
        store.update_console(&ConsolePatch {
            log_level_colors: Some(colors.clone().into()),
            ..Default::default()
        });
        store.update_console(&ConsolePatch {
            auto_scroll_logs: Some(false),
            ..Default::default()
        });

        assert_eq!(
            store.sink_mut().take(),
            vec![
                SinkEvent::FontSize(FontSize::Large),
                SinkEvent::LogColor(LogLevel::Info, "#111111".to_string()),
                SinkEvent::LogColor(LogLevel::Warn, "#222222".to_string()),
                SinkEvent::LogColor(LogLevel::Error, "#333333".to_string()),
            ]
        );
        assert_eq!(store.get().console.log_level_colors, colors);
    }

    #[test]
    fn test_partial_log_colors_keep_custom_levels() {
        let mut store = store();
        let custom: SettingsPatch = serde_json::from_str(
            r##"{"console": {"logLevelColors": {"info": "#111111", "warn": "#222222", "error": "#333333"}}}"##,
        )
        .unwrap();
        store.update(&custom);
        store.sink_mut().take();

        let warn_only: SettingsPatch =
            serde_json::from_str(r##"{"console": {"logLevelColors": {"warn": "#000000"}}}"##)
                .unwrap();
        store.update(&warn_only);

        let colors = &store.get().console.log_level_colors;
        assert_eq!(colors.info, "#111111");
        assert_eq!(colors.warn, "#000000");
        assert_eq!(colors.error, "#333333");
        assert_eq!(
            store.sink().events,
            vec![SinkEvent::LogColor(LogLevel::Warn, "#000000".to_string())]
        );
    }

    #[test]
    fn test_non_visual_sections_have_no_effects() {
        let mut store = store();
        store.update(&SettingsPatch {
            execution: Some(ExecutionPatch {
                operation_timeout: Some(60),
                ..Default::default()
            }),
            general: Some(GeneralPatch {
                auto_open_console: Some(true),
                ..Default::default()
            }),
            ..Default::default()
        });
        assert!(store.sink().events.is_empty());
        assert_eq!(store.get().execution.operation_timeout, 60);
    }

    #[test]
    fn test_empty_patch_marks_unsaved() {
        let mut store = store();
        store.update(&SettingsPatch::default());
        assert!(store.has_unsaved_changes());
        assert_eq!(store.get(), &Settings::default());
    }

    #[test]
    fn test_reset_restores_defaults_and_applies_mode() {
        let mut store = store();
        store.update_theme(&ThemePatch {
            use_system_theme: Some(false),
            theme: Some(ThemeMode::Light),
            font_size: Some(FontSize::Small),
            ..Default::default()
        });
        store.sink_mut().take();

        store.reset();
        assert_eq!(store.get(), &Settings::default());
        assert!(store.has_unsaved_changes());
        assert_eq!(store.sink().theme_modes(), vec![ThemeMode::System]);
        assert!(store
            .sink()
            .events
            .contains(&SinkEvent::FontSize(FontSize::Medium)));
    }

    #[test]
    fn test_save_then_reload_roundtrip() {
        let storage = memory();
        let mut store = SettingsStore::new(storage.clone(), RecordingSink::default());
        store.update(&SettingsPatch {
            general: Some(GeneralPatch {
                default_project: Some("payment-service".to_string()),
                ..Default::default()
            }),
            theme: Some(ThemePatch {
                primary_color: Some("#10b981".parse().unwrap()),
                ..Default::default()
            }),
            ..Default::default()
        });
        store.save().unwrap();
        assert!(!store.has_unsaved_changes());
        assert_eq!(store.sink().theme_modes(), vec![ThemeMode::System]);

        let reloaded = SettingsStore::load(storage, RecordingSink::default());
        assert_eq!(reloaded.get(), store.get());
        assert!(!reloaded.has_unsaved_changes());
    }

    #[test]
    fn test_load_skips_theme_mode() {
        let storage = memory();
        let mut saved = Settings::default();
        saved.theme.use_system_theme = false;
        saved.theme.theme = ThemeMode::Dark;
        storage
            .set_item(SETTINGS_KEY, &serde_json::to_string(&saved).unwrap())
            .unwrap();

        let store = SettingsStore::load(storage, RecordingSink::default());
        assert_eq!(store.get(), &saved);
        assert!(store.sink().theme_modes().is_empty());
        assert_eq!(store.sink().events.len(), 5);
    }

    #[test]
    fn test_malformed_blob_falls_back_to_defaults() {
        let storage = memory();
        storage.set_item(SETTINGS_KEY, "{ not json").unwrap();

        let store = SettingsStore::load(storage, RecordingSink::default());
        assert_eq!(store.get(), &Settings::default());
        assert!(store.sink().theme_modes().is_empty());
        assert_eq!(store.sink().events.len(), 5);
    }

    #[test]
    fn test_missing_blob_applies_default_effects() {
        let store = SettingsStore::load(memory(), RecordingSink::default());
        assert_eq!(store.get(), &Settings::default());
        assert!(store.sink().events.contains(&SinkEvent::Primary {
            hsl: "217 91% 60%".to_string(),
            rgb: "59, 130, 246".to_string(),
        }));
    }

    #[test]
    fn test_stored_out_of_range_values_are_clamped() {
        let storage = memory();
        storage
            .set_item(SETTINGS_KEY, r#"{"console": {"maxLogLines": 5}}"#)
            .unwrap();

        let store = SettingsStore::load(storage, RecordingSink::default());
        assert_eq!(store.get().console.max_log_lines, 100);
    }

    #[test]
    fn test_unreadable_storage_falls_back_to_defaults() {
        let store = SettingsStore::load(Arc::new(FailingStorage), RecordingSink::default());
        assert_eq!(store.get(), &Settings::default());
    }

    #[test]
    fn test_failed_save_keeps_unsaved_flag() {
        let mut store = SettingsStore::new(Arc::new(FailingStorage), RecordingSink::default());
        store.update_advanced(&AdvancedPatch {
            auth_token: Some("token".to_string()),
            ..Default::default()
        });

        assert!(matches!(store.save(), Err(PersistenceError::Io(_))));
        assert!(store.has_unsaved_changes());
        assert!(store.sink().events.is_empty());
    }

    #[test]
    fn test_reset_then_get_is_default_after_arbitrary_state() {
        let mut store = store();
        store.update(&SettingsPatch {
            console: Some(ConsolePatch {
                max_log_lines: Some(4000),
                ..Default::default()
            }),
            advanced: Some(AdvancedPatch {
                base_api_url: Some("https://db.example.com".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        });
        store.save().unwrap();
        store.reset();
        assert_eq!(store.get(), &Settings::default());
    }
}
