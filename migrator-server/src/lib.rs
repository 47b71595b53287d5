// DB Migrator server-side services
//
// Stateful units behind the dashboard: the settings store, the operation log
// simulator, the migration source and the view-model that owns them all.

pub mod console;
pub mod dashboard;
pub mod integrations;
pub mod modal;
pub mod mode;
pub mod persistence;
pub mod settings;

#[cfg(test)]
mod test_support;

pub use console::{
    LogBuffer, OperationHandle, OperationKind, OperationOutcome, OperationSimulator,
    OverlapPolicy, SimulatorConfig, TrimPolicy,
};
pub use dashboard::{ContextError, Dashboard, DashboardBuilder};
pub use integrations::{MigrationSource, MigrationsState, MockMigrationSource};
pub use modal::{CloseOutcome, ModalState, SettingsModal, SettingsTab};
pub use mode::MigrationModeStore;
pub use persistence::{FileStorage, KeyValueStorage, MemoryStorage, PersistenceError};
pub use settings::SettingsStore;
