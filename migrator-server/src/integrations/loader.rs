// DB Migrator Integration Layer - Loader State
//
// Loading/error state around a single fetch from a MigrationSource.

use log::{error, info};
use migrator_utils::Migration;
use std::time::Duration;

use super::error::IntegrationError;
use super::source::MigrationSource;

/// Message shown in place of the timeline when a fetch fails
pub const FETCH_ERROR_MESSAGE: &str = "Failed to fetch migrations. Please try again.";

/// What the timeline renders: a list, a spinner, or an error
#[derive(Debug, Clone, PartialEq)]
pub struct MigrationsState {
    pub migrations: Vec<Migration>,
    pub loading: bool,
    pub error: Option<String>,
}

impl Default for MigrationsState {
    fn default() -> Self {
        Self {
            migrations: Vec::new(),
            loading: true,
            error: None,
        }
    }
}

impl MigrationsState {
    /// Fetch once from `source`, bounded by `timeout`.
    ///
    /// Never fails: any error leaves the list empty and sets the error text.
    pub async fn load(source: &dyn MigrationSource, timeout: Duration) -> Self {
        let result = match tokio::time::timeout(timeout, source.fetch_migrations()).await {
            Ok(result) => result,
            Err(_) => Err(IntegrationError::Timeout {
                duration_secs: timeout.as_secs(),
            }),
        };

        match result {
            Ok(migrations) => {
                info!(
                    "Loaded {} migrations from {} source",
                    migrations.len(),
                    source.name()
                );
                Self {
                    migrations,
                    loading: false,
                    error: None,
                }
            },
            Err(e) => {
                error!("Fetching migrations from {} failed: {}", source.name(), e);
                Self {
                    migrations: Vec::new(),
                    loading: false,
                    error: Some(FETCH_ERROR_MESSAGE.to_string()),
                }
            },
        }
    }
}
