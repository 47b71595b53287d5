use anyhow::{anyhow, bail, Context, Result};
use log::{debug, error, warn};
use migrator_client::{timeline, ConsoleView, StyleRoot};
use migrator_server::integrations::{IntegrationError, SourceConfig};
use migrator_server::persistence::SETTINGS_KEY;
use migrator_server::{
    Dashboard, FileStorage, KeyValueStorage, MigrationSource, MockMigrationSource,
    OperationKind, OperationOutcome,
};
use migrator_utils::{MigrationType, Settings, SettingsPatch};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;

use crate::cli::SettingsAction;

pub const STORAGE_FILE: &str = "local_storage.json";

/// `--data-dir`, else the platform config directory
pub fn data_dir(explicit: Option<PathBuf>) -> Result<PathBuf> {
    match explicit {
        Some(dir) => Ok(dir),
        None => dirs::config_dir()
            .map(|dir| dir.join("db-migrator"))
            .ok_or_else(|| anyhow!("No config directory on this platform; pass --data-dir")),
    }
}

pub fn open_storage(dir: &Path) -> Arc<dyn KeyValueStorage> {
    Arc::new(FileStorage::open(dir.join(STORAGE_FILE)))
}

/// Stored settings without side effects, for decisions made before the
/// dashboard exists. Falls back to the defaults like the store does.
pub fn peek_settings(storage: &dyn KeyValueStorage) -> Settings {
    storage
        .get_item(SETTINGS_KEY)
        .ok()
        .flatten()
        .and_then(|raw| serde_json::from_str::<Settings>(&raw).ok())
        .map(Settings::normalized)
        .unwrap_or_default()
}

/// The mock source, or one that always fails when mock data is disabled
/// (no real backend client exists).
pub fn migration_source(settings: &Settings) -> Arc<dyn MigrationSource> {
    let source = MockMigrationSource::new(SourceConfig::default());
    if !settings.advanced.enable_mock_data {
        debug!(
            "Mock data disabled and {} is not contacted",
            settings.advanced.base_api_url
        );
        source.set_failure(Some(IntegrationError::Unavailable(
            "mock data disabled".to_string(),
        )));
    }
    Arc::new(source)
}

pub fn build_dashboard(
    storage: Arc<dyn KeyValueStorage>,
    source: Arc<dyn MigrationSource>,
) -> Result<Dashboard<StyleRoot>> {
    Ok(Dashboard::builder()
        .storage(storage)
        .theme_sink(StyleRoot::new())
        .migration_source(source)
        .build()?)
}

pub fn settings<W: Write>(
    dashboard: &mut Dashboard<StyleRoot>,
    action: SettingsAction,
    out: &mut W,
) -> Result<()> {
    match action {
        SettingsAction::Show => {},
        SettingsAction::Update { patch } => {
            let patch: SettingsPatch =
                serde_json::from_str(&patch).context("Invalid settings patch")?;
            if patch.is_empty() {
                warn!("Settings patch has no sections; nothing changes");
            }
            dashboard.update_settings(&patch);
            dashboard.settings_mut().save()?;
        },
        SettingsAction::Reset => {
            dashboard.settings_mut().reset();
            dashboard.settings_mut().save()?;
        },
    }
    let shown = dashboard.settings().get().redacted();
    writeln!(out, "{}", serde_json::to_string_pretty(&shown)?)?;
    Ok(())
}

pub fn mode<W: Write>(
    dashboard: &mut Dashboard<StyleRoot>,
    mode: Option<MigrationType>,
    out: &mut W,
) -> Result<()> {
    if let Some(mode) = mode {
        dashboard.mode_mut().set_mode(mode)?;
    }
    writeln!(out, "Migration mode: {}", dashboard.mode().mode())?;
    Ok(())
}

pub async fn migrations<W: Write>(
    dashboard: &mut Dashboard<StyleRoot>,
    select: Option<String>,
    out: &mut W,
) -> Result<()> {
    dashboard.load_migrations().await;
    if let Some(message) = &dashboard.migrations().error {
        bail!("{}", message);
    }
    if let Some(id) = select {
        if dashboard.select_version(&id).is_none() {
            bail!("No migration with id '{}'", id);
        }
    }

    writeln!(
        out,
        "{} / {} ({} mode)",
        dashboard.environment(),
        dashboard.project(),
        dashboard.mode().mode()
    )?;
    let selected = dashboard.selected_migration().map(|m| m.id.clone());
    let visible = dashboard.visible_migrations();
    if visible.is_empty() {
        writeln!(out, "No migrations")?;
    } else {
        writeln!(out, "{}", timeline::render_timeline(&visible, selected.as_deref()))?;
    }

    if dashboard.is_panel_open() {
        if let Some(migration) = dashboard.selected_migration() {
            writeln!(out, "\n{}", timeline::format_detail(migration))?;
        }
    }
    Ok(())
}

/// Trigger `kind` and print console lines as they land, until the script
/// finishes, the operation timeout passes or Ctrl-C cancels it.
pub async fn run_operation<W: Write>(
    dashboard: &Dashboard<StyleRoot>,
    kind: OperationKind,
    out: &mut W,
) -> Result<OperationOutcome> {
    let settings = dashboard.settings().get();
    let view = ConsoleView::from_settings(&settings.console);
    let timeout = Duration::from_secs(u64::from(settings.execution.operation_timeout));

    let mut rx = dashboard.console().subscribe();
    let handle = dashboard.trigger(kind);
    let deadline = tokio::time::sleep(timeout);
    tokio::pin!(deadline);
    let mut timed_out = false;

    let outcome = loop {
        tokio::select! {
            received = rx.recv() => match received {
                Ok(log) => writeln!(out, "{}", view.format_line(&log))?,
                Err(RecvError::Lagged(skipped)) => warn!("Console output skipped {} lines", skipped),
                Err(RecvError::Closed) => break handle.wait().await,
            },
            outcome = handle.wait() => break outcome,
            _ = &mut deadline, if !timed_out => {
                error!("{} did not finish within {}s, cancelling", kind, timeout.as_secs());
                timed_out = true;
                handle.cancel();
            },
            _ = tokio::signal::ctrl_c() => {
                warn!("Interrupted, cancelling {}", kind);
                handle.cancel();
            },
        }
    };
    while let Ok(log) = rx.try_recv() {
        writeln!(out, "{}", view.format_line(&log))?;
    }

    if outcome == OperationOutcome::Cancelled {
        writeln!(out, "{} cancelled", kind)?;
    }
    Ok(outcome)
}

pub fn theme<W: Write>(dashboard: &Dashboard<StyleRoot>, out: &mut W) -> Result<()> {
    writeln!(out, "{}", dashboard.settings().sink().render_css())?;
    Ok(())
}
