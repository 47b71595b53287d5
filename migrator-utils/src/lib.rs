// DB Migrator shared types
//
// Everything both the server-side stores and the client-side views need to
// agree on: the settings model, console log entries, migration records and
// the ThemeSink capability.

pub mod color;
pub mod console_log;
pub mod migration;
pub mod settings;
pub mod theme;

pub use color::{ColorError, HexColor};
pub use console_log::{ConsoleLog, LogLevel};
pub use migration::{Migration, MigrationStatus, MigrationType, SqlFile, SqlFileStatus};
pub use settings::{Settings, SettingsPatch};
pub use theme::ThemeSink;
