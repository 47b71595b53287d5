// DB Migrator Dashboard
//
// Explicit owner of every service the dashboard needs. Built once through
// `DashboardBuilder`; a service that was never supplied is reported at build
// time instead of surfacing as a panic deep inside a view.

use log::{debug, info};
use migrator_utils::migration::latest_migration;
use migrator_utils::settings::{Environment, SettingsPatch};
use migrator_utils::{ConsoleLog, Migration, ThemeSink};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::console::{
    LogBuffer, OperationHandle, OperationKind, OperationSimulator, SimulatorConfig, TrimPolicy,
};
use crate::integrations::{MigrationSource, MigrationsState};
use crate::modal::{CloseOutcome, ModalState, SettingsModal};
use crate::mode::MigrationModeStore;
use crate::persistence::{KeyValueStorage, PersistenceResult};
use crate::settings::SettingsStore;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContextError {
    #[error("{0} must be provided before the dashboard is built")]
    MissingService(&'static str),
}

pub struct DashboardBuilder<S: ThemeSink> {
    storage: Option<Arc<dyn KeyValueStorage>>,
    sink: Option<S>,
    source: Option<Arc<dyn MigrationSource>>,
    simulator: SimulatorConfig,
    trim_policy: TrimPolicy,
}

impl<S: ThemeSink> Default for DashboardBuilder<S> {
    fn default() -> Self {
        Self {
            storage: None,
            sink: None,
            source: None,
            simulator: SimulatorConfig::default(),
            trim_policy: TrimPolicy::default(),
        }
    }
}

impl<S: ThemeSink> DashboardBuilder<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn storage(mut self, storage: Arc<dyn KeyValueStorage>) -> Self {
        self.storage = Some(storage);
        self
    }

    pub fn theme_sink(mut self, sink: S) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn migration_source(mut self, source: Arc<dyn MigrationSource>) -> Self {
        self.source = Some(source);
        self
    }

    pub fn simulator(mut self, config: SimulatorConfig) -> Self {
        self.simulator = config;
        self
    }

    pub fn trim_policy(mut self, policy: TrimPolicy) -> Self {
        self.trim_policy = policy;
        self
    }

    /// Load persisted settings and mode, seed the console and hand back the
    /// dashboard. Migrations are not fetched yet.
    pub fn build(self) -> Result<Dashboard<S>, ContextError> {
        let storage = self
            .storage
            .ok_or(ContextError::MissingService("storage"))?;
        let sink = self.sink.ok_or(ContextError::MissingService("theme sink"))?;
        let source = self
            .source
            .ok_or(ContextError::MissingService("migration source"))?;

        let settings = SettingsStore::load(storage.clone(), sink);
        let mode = MigrationModeStore::load(storage);
        let general = settings.get().general.clone();
        let console = OperationSimulator::with_buffer(
            LogBuffer::with_startup_banner(&general.default_project),
            self.simulator,
        );
        info!(
            "Dashboard ready for {} on {} ({} mode)",
            general.default_project,
            general.default_environment,
            mode.mode()
        );

        Ok(Dashboard {
            settings,
            console,
            mode,
            source,
            trim_policy: self.trim_policy,
            migrations: MigrationsState::default(),
            environment: general.default_environment,
            project: general.default_project,
            selected: None,
            panel_open: false,
            console_open: general.auto_open_console,
            help: ModalState::default(),
            settings_modal: SettingsModal::default(),
        })
    }
}

pub struct Dashboard<S: ThemeSink> {
    settings: SettingsStore<S>,
    console: OperationSimulator,
    mode: MigrationModeStore,
    source: Arc<dyn MigrationSource>,
    trim_policy: TrimPolicy,
    migrations: MigrationsState,
    environment: Environment,
    project: String,
    selected: Option<String>,
    panel_open: bool,
    console_open: bool,
    help: ModalState,
    settings_modal: SettingsModal,
}

impl<S: ThemeSink> Dashboard<S> {
    pub fn builder() -> DashboardBuilder<S> {
        DashboardBuilder::new()
    }

    pub fn settings(&self) -> &SettingsStore<S> {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut SettingsStore<S> {
        &mut self.settings
    }

    pub fn console(&self) -> &OperationSimulator {
        &self.console
    }

    pub fn mode(&self) -> &MigrationModeStore {
        &self.mode
    }

    pub fn mode_mut(&mut self) -> &mut MigrationModeStore {
        &mut self.mode
    }

    // Migrations

    /// Fetch the timeline, then re-run the general defaults against it.
    pub async fn load_migrations(&mut self) {
        let timeout = Duration::from_secs(u64::from(
            self.settings.get().execution.operation_timeout,
        ));
        self.migrations = MigrationsState::load(self.source.as_ref(), timeout).await;
        self.apply_general_defaults();
    }

    pub fn migrations(&self) -> &MigrationsState {
        &self.migrations
    }

    /// Timeline entries for the current mode
    pub fn visible_migrations(&self) -> Vec<&Migration> {
        self.mode.filter(&self.migrations.migrations)
    }

    /// Reset environment and project to the configured defaults and, when
    /// enabled, select the most recent migration and open its panel.
    pub fn apply_general_defaults(&mut self) {
        let general = &self.settings.get().general;
        self.environment = general.default_environment;
        self.project = general.default_project.clone();

        if general.auto_select_latest_migration {
            if let Some(latest) = latest_migration(&self.migrations.migrations) {
                debug!("Auto-selecting latest migration {}", latest.version);
                self.selected = Some(latest.id.clone());
                self.panel_open = true;
            }
        }
    }

    /// Select a migration by id and open its detail panel.
    pub fn select_version(&mut self, id: &str) -> Option<&Migration> {
        let position = self
            .migrations
            .migrations
            .iter()
            .position(|m| m.id == id)?;
        self.selected = Some(id.to_string());
        self.panel_open = true;
        self.migrations.migrations.get(position)
    }

    pub fn selected_migration(&self) -> Option<&Migration> {
        let id = self.selected.as_deref()?;
        self.migrations.migrations.iter().find(|m| m.id == id)
    }

    /// Hide the panel; the selection is kept.
    pub fn close_panel(&mut self) {
        self.panel_open = false;
    }

    pub fn is_panel_open(&self) -> bool {
        self.panel_open && self.selected.is_some()
    }

    // Sidebar

    pub fn environment(&self) -> Environment {
        self.environment
    }

    pub fn set_environment(&mut self, environment: Environment) {
        self.environment = environment;
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn set_project(&mut self, project: impl Into<String>) {
        self.project = project.into();
    }

    // Settings

    /// Merge a patch; a general-section change re-applies the general
    /// defaults to the sidebar and selection. Turning `autoOpenConsole` on
    /// expands the console.
    pub fn update_settings(&mut self, patch: &SettingsPatch) {
        let auto_open_before = self.settings.get().general.auto_open_console;
        self.settings.update(patch);
        if patch.general.is_some() {
            self.apply_general_defaults();
            if self.settings.get().general.auto_open_console && !auto_open_before {
                debug!("Auto-opening console");
                self.console_open = true;
            }
        }
    }

    // Console

    pub fn is_console_open(&self) -> bool {
        self.console_open
    }

    pub fn toggle_console(&mut self) {
        self.console_open = !self.console_open;
    }

    /// Entries the console panel shows under the current `maxLogLines`
    pub fn visible_logs(&self) -> Vec<ConsoleLog> {
        let max_lines = self.settings.get().console.max_log_lines as usize;
        self.console.visible_logs(max_lines, self.trim_policy)
    }

    pub fn trigger(&self, kind: OperationKind) -> OperationHandle {
        self.console.trigger(kind)
    }

    // Modals

    pub fn help_modal(&self) -> &ModalState {
        &self.help
    }

    pub fn open_help(&mut self) {
        self.help.open();
    }

    pub fn close_help(&mut self) {
        self.help.close();
    }

    pub fn settings_modal(&self) -> &SettingsModal {
        &self.settings_modal
    }

    pub fn settings_modal_mut(&mut self) -> &mut SettingsModal {
        &mut self.settings_modal
    }

    pub fn open_settings(&mut self) {
        self.settings_modal.open();
    }

    pub fn request_close_settings(&mut self) -> CloseOutcome {
        self.settings_modal.request_close(&self.settings)
    }

    pub fn save_and_close_settings(&mut self) -> PersistenceResult<()> {
        self.settings_modal.save_and_close(&mut self.settings)
    }

    pub fn discard_settings(&mut self) {
        self.settings_modal.discard(&mut self.settings);
    }

    pub fn cancel_settings_warning(&mut self) {
        self.settings_modal.cancel_warning();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integrations::{IntegrationError, MockMigrationSource, FETCH_ERROR_MESSAGE};
    use crate::persistence::{MemoryStorage, SETTINGS_KEY};
    use crate::test_support::RecordingSink;
    use migrator_utils::settings::GeneralPatch;
    use migrator_utils::{LogLevel, MigrationType, Settings};

    fn build_with(
        storage: Arc<dyn KeyValueStorage>,
        source: MockMigrationSource,
    ) -> Dashboard<RecordingSink> {
        Dashboard::builder()
            .storage(storage)
            .theme_sink(RecordingSink::default())
            .migration_source(Arc::new(source))
            .build()
            .unwrap()
    }

    fn dashboard() -> Dashboard<RecordingSink> {
        build_with(Arc::new(MemoryStorage::new()), MockMigrationSource::instant())
    }

    #[test]
    fn test_missing_services_fail_fast() {
        let result = DashboardBuilder::<RecordingSink>::new()
            .storage(Arc::new(MemoryStorage::new()))
            .migration_source(Arc::new(MockMigrationSource::instant()))
            .build();
        assert_eq!(
            result.err(),
            Some(ContextError::MissingService("theme sink"))
        );

        let result = DashboardBuilder::new()
            .theme_sink(RecordingSink::default())
            .build();
        let err = result.err().unwrap();
        assert_eq!(err, ContextError::MissingService("storage"));
        assert!(err.to_string().contains("storage must be provided"));
    }

    #[tokio::test]
    async fn test_initial_state() {
        let dashboard = dashboard();
        assert_eq!(dashboard.environment(), Environment::Dev);
        assert_eq!(dashboard.project(), "main-database");
        assert!(dashboard.migrations().loading);
        assert!(!dashboard.is_panel_open());
        assert!(!dashboard.is_console_open());

        let logs = dashboard.visible_logs();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[1].message, "Connected to database: main-database");
    }

    #[tokio::test]
    async fn test_load_auto_selects_latest() {
        let mut dashboard = dashboard();
        dashboard.load_migrations().await;

        assert!(!dashboard.migrations().loading);
        assert_eq!(dashboard.selected_migration().unwrap().version, "v3.2.0");
        assert!(dashboard.is_panel_open());
    }

    #[tokio::test]
    async fn test_load_without_auto_select() {
        let storage: Arc<dyn KeyValueStorage> = Arc::new(MemoryStorage::new());
        let mut settings = Settings::default();
        settings.general.auto_select_latest_migration = false;
        storage
            .set_item(SETTINGS_KEY, &serde_json::to_string(&settings).unwrap())
            .unwrap();

        let mut dashboard = build_with(storage, MockMigrationSource::instant());
        dashboard.load_migrations().await;

        assert!(dashboard.selected_migration().is_none());
        assert!(!dashboard.is_panel_open());
    }

    #[tokio::test]
    async fn test_load_failure_shows_error() {
        let source = MockMigrationSource::instant();
        source.set_failure(Some(IntegrationError::FetchFailed("down".to_string())));

        let mut dashboard = build_with(Arc::new(MemoryStorage::new()), source);
        dashboard.load_migrations().await;

        assert_eq!(
            dashboard.migrations().error.as_deref(),
            Some(FETCH_ERROR_MESSAGE)
        );
        assert!(dashboard.visible_migrations().is_empty());
        assert!(!dashboard.is_panel_open());
    }

    #[tokio::test]
    async fn test_mode_filter_and_selection() {
        let mut dashboard = dashboard();
        dashboard.load_migrations().await;
        assert_eq!(dashboard.visible_migrations().len(), 6);

        dashboard.mode_mut().set_mode(MigrationType::Sql).unwrap();
        assert_eq!(dashboard.visible_migrations().len(), 3);

        let picked = dashboard.select_version("7").unwrap();
        assert_eq!(picked.version, "v3.0.0");
        dashboard.close_panel();
        assert!(!dashboard.is_panel_open());
        assert_eq!(dashboard.selected_migration().unwrap().id, "7");

        assert!(dashboard.select_version("missing").is_none());
        assert!(!dashboard.is_panel_open());
    }

    #[tokio::test]
    async fn test_general_update_reapplies_defaults() {
        let mut dashboard = dashboard();
        dashboard.set_environment(Environment::Prod);
        dashboard.set_project("auth-service");

        dashboard.update_settings(&SettingsPatch {
            general: Some(GeneralPatch {
                default_project: Some("user-service".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        });

        assert_eq!(dashboard.environment(), Environment::Dev);
        assert_eq!(dashboard.project(), "user-service");
        assert!(dashboard.settings().has_unsaved_changes());
    }

    #[tokio::test]
    async fn test_settings_modal_flow() {
        let mut dashboard = dashboard();
        dashboard.open_settings();
        dashboard.update_settings(&SettingsPatch {
            general: Some(GeneralPatch {
                auto_open_console: Some(true),
                ..Default::default()
            }),
            ..Default::default()
        });

        assert_eq!(dashboard.request_close_settings(), CloseOutcome::UnsavedWarning);
        dashboard.cancel_settings_warning();
        assert!(dashboard.settings_modal().is_open());

        dashboard.save_and_close_settings().unwrap();
        assert!(!dashboard.settings_modal().is_open());
        assert!(!dashboard.settings().has_unsaved_changes());
    }

    #[tokio::test]
    async fn test_help_modal() {
        let mut dashboard = dashboard();
        dashboard.open_help();
        assert!(dashboard.help_modal().is_open());
        dashboard.close_help();
        assert!(!dashboard.help_modal().is_open());
    }

    #[tokio::test(start_paused = true)]
    async fn test_trigger_appends_to_console() {
        let mut dashboard = dashboard();
        dashboard.toggle_console();
        assert!(dashboard.is_console_open());

        let handle = dashboard.trigger(OperationKind::DryRun);
        handle.wait().await;

        let logs = dashboard.visible_logs();
        assert_eq!(logs.len(), 2 + 7);
        assert!(logs.iter().any(|log| log.level == LogLevel::Warn));
    }

    #[tokio::test]
    async fn test_enabling_auto_open_expands_console() {
        let mut dashboard = dashboard();
        assert!(!dashboard.is_console_open());

        dashboard.update_settings(&SettingsPatch {
            general: Some(GeneralPatch {
                auto_open_console: Some(true),
                ..Default::default()
            }),
            ..Default::default()
        });
        assert!(dashboard.is_console_open());

        // already on: a later general change leaves a collapsed console alone
        dashboard.toggle_console();
        dashboard.update_settings(&SettingsPatch {
            general: Some(GeneralPatch {
                default_project: Some("auth-service".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        });
        assert!(!dashboard.is_console_open());
    }
}
