use clap::{Parser, Subcommand, ValueEnum};
use migrator_server::OperationKind;
use migrator_utils::MigrationType;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[clap(name = "db-migrator", version, author)]
#[clap(about = "Inspect migrations and drive the simulated migration console")]
pub struct Cli {
    /// Directory holding local_storage.json
    #[clap(long, global = true, env = "DB_MIGRATOR_DATA_DIR", value_parser)]
    pub data_dir: Option<PathBuf>,

    /// Debug logging regardless of the verboseLogs setting
    #[clap(short, long, global = true)]
    pub verbose: bool,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show, change or reset the stored settings
    Settings {
        #[clap(subcommand)]
        action: SettingsAction,
    },

    /// Show or switch the JAVA/SQL timeline mode
    Mode {
        #[clap(value_enum)]
        mode: Option<ModeArg>,
    },

    /// Fetch and print the migration timeline for the current mode
    Migrations {
        /// Open the detail panel for this migration id
        #[clap(long, value_parser)]
        select: Option<String>,
    },

    /// Run a simulated operation and stream its console output
    Run {
        /// migrate, rollback, dry-run or show-sql
        #[clap(value_parser)]
        operation: OperationKind,
    },

    /// Print the style variables derived from the theme settings
    Theme,
}

#[derive(Debug, Subcommand)]
pub enum SettingsAction {
    /// Print the settings as JSON (auth token masked)
    Show,

    /// Merge a JSON patch such as '{"theme":{"fontSize":"large"}}' and save
    Update {
        #[clap(value_parser)]
        patch: String,
    },

    /// Restore and save the defaults
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Java,
    Sql,
}

impl From<ModeArg> for MigrationType {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Java => MigrationType::Java,
            ModeArg::Sql => MigrationType::Sql,
        }
    }
}
