// DB Migrator Persistence Layer
//
// Local key/value storage for the two values the dashboard keeps between
// runs. Storage failures degrade to in-memory behaviour; they never abort the
// dashboard.

mod error;
mod storage;

pub use error::{PersistenceError, PersistenceResult};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};

/// Storage key for the serialized settings blob
pub const SETTINGS_KEY: &str = "dbMigratorSettings";

/// Storage key for the JAVA/SQL view mode
pub const MODE_KEY: &str = "dbMigratorMode";
