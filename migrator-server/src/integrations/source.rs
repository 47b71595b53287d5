// DB Migrator Integration Layer - Migration Source Trait
//
// Seam between the dashboard and whatever supplies migration records. Only a
// mock implementation exists; a backend-backed one would sit behind the same
// trait.

use async_trait::async_trait;
use migrator_utils::Migration;
use std::time::Duration;

use super::error::IntegrationResult;

/// Supplier of the migration timeline.
///
/// Implementations must not panic; failures come back as
/// `IntegrationError` and the dashboard shows an error message instead of
/// the timeline.
#[async_trait]
pub trait MigrationSource: Send + Sync {
    /// Fetch the full migration list, in display order.
    async fn fetch_migrations(&self) -> IntegrationResult<Vec<Migration>>;

    /// Human-readable name for logs
    fn name(&self) -> &str;
}

/// Configuration for source behavior
#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// Simulated network latency before the list is returned
    pub latency: Duration,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            latency: Duration::from_millis(1000),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_config_defaults() {
        let config = SourceConfig::default();
        assert_eq!(config.latency, Duration::from_millis(1000));
    }
}
