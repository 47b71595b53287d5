use anyhow::Result;
use clap::Parser;
use log::{debug, info};
use std::io;

mod cli;
mod commands;
mod logging;

use cli::{Cli, Command};
use migrator_server::OperationOutcome;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init_logging();
    logging::set_verbose(cli.verbose);

    let dir = commands::data_dir(cli.data_dir.clone())?;
    let storage = commands::open_storage(&dir);
    let stored = commands::peek_settings(storage.as_ref());
    logging::set_verbose(cli.verbose || stored.advanced.verbose_logs);
    debug!("Using storage in {}", dir.display());

    let source = commands::migration_source(&stored);
    let mut dashboard = commands::build_dashboard(storage, source)?;
    let mut out = io::stdout().lock();

    match cli.command {
        Command::Settings { action } => commands::settings(&mut dashboard, action, &mut out)?,
        Command::Mode { mode } => commands::mode(&mut dashboard, mode.map(Into::into), &mut out)?,
        Command::Migrations { select } => {
            commands::migrations(&mut dashboard, select, &mut out).await?
        },
        Command::Run { operation } => {
            let outcome = commands::run_operation(&dashboard, operation, &mut out).await?;
            info!("{} finished: {:?}", operation, outcome);
            if outcome == OperationOutcome::Cancelled {
                std::process::exit(130);
            }
        },
        Command::Theme => commands::theme(&dashboard, &mut out)?,
    }
    Ok(())
}
