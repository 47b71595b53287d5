// DB Migrator Integration Layer
//
// Where migration records come from. The dashboard only sees the
// `MigrationSource` trait and the loader state built on top of it.
//
// ```text
// Dashboard
//     │
//     ▼
// MigrationsState::load ──► MigrationSource ──► MockMigrationSource (fixtures)
// ```

mod error;
mod loader;
mod mock;
mod source;

pub use error::{IntegrationError, IntegrationResult};
pub use loader::{MigrationsState, FETCH_ERROR_MESSAGE};
pub use mock::{fixture_migrations, MockMigrationSource};
pub use source::{MigrationSource, SourceConfig};
