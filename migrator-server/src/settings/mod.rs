// DB Migrator Settings Service
//
// Persistence-backed settings with selective application of visual effects.

mod store;

pub use store::SettingsStore;
