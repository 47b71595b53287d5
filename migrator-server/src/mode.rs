// DB Migrator View Mode
//
// JAVA/SQL toggle for the timeline, persisted on every change.

use log::{debug, warn};
use migrator_utils::{Migration, MigrationType};
use std::sync::Arc;

use crate::persistence::{KeyValueStorage, PersistenceResult, MODE_KEY};

pub struct MigrationModeStore {
    mode: MigrationType,
    storage: Arc<dyn KeyValueStorage>,
}

impl MigrationModeStore {
    /// Read the stored mode. Anything other than exactly `JAVA` or `SQL`
    /// (or a storage error) yields JAVA.
    pub fn load(storage: Arc<dyn KeyValueStorage>) -> Self {
        let mode = match storage.get_item(MODE_KEY) {
            Ok(Some(raw)) => raw.parse().unwrap_or_else(|e| {
                warn!("Ignoring stored migration mode: {}", e);
                MigrationType::default()
            }),
            Ok(None) => MigrationType::default(),
            Err(e) => {
                warn!("Could not read migration mode: {}", e);
                MigrationType::default()
            },
        };
        debug!("Migration mode is {}", mode);
        Self { mode, storage }
    }

    pub fn mode(&self) -> MigrationType {
        self.mode
    }

    /// Switch modes and persist. The in-memory mode changes even when the
    /// write fails.
    pub fn set_mode(&mut self, mode: MigrationType) -> PersistenceResult<()> {
        self.mode = mode;
        self.storage.set_item(MODE_KEY, &mode.to_string())
    }

    pub fn toggle(&mut self) -> PersistenceResult<MigrationType> {
        let next = match self.mode {
            MigrationType::Java => MigrationType::Sql,
            MigrationType::Sql => MigrationType::Java,
        };
        self.set_mode(next)?;
        Ok(next)
    }

    /// Migrations the timeline shows in the current mode, in list order
    pub fn filter<'a>(&self, migrations: &'a [Migration]) -> Vec<&'a Migration> {
        migrations.iter().filter(|m| self.mode.shows(m)).collect()
    }
}
