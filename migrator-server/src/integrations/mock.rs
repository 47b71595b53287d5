// DB Migrator Integration Layer - Mock Source
//
// Canned migration timeline returned after a fixed delay. Tests can swap the
// payload, inject failures and count fetches.

use async_trait::async_trait;
use log::debug;
use migrator_utils::Migration;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::error::{IntegrationError, IntegrationResult};
use super::source::{MigrationSource, SourceConfig};

const FIXTURE: &str = include_str!("fixtures/migrations.json");

/// The nine demonstration migrations (six JAVA, three SQL)
pub fn fixture_migrations() -> IntegrationResult<Vec<Migration>> {
    Ok(serde_json::from_str(FIXTURE)?)
}

/// Mock source standing in for the migrations API.
///
/// ```ignore
/// let mock = MockMigrationSource::new(SourceConfig::default());
/// mock.set_failure(Some(IntegrationError::FetchFailed("boom".into())));
/// assert!(mock.fetch_migrations().await.is_err());
/// assert_eq!(mock.fetch_count(), 1);
/// ```
#[derive(Clone)]
pub struct MockMigrationSource {
    config: SourceConfig,

    /// Replaces the fixture when set
    response: Arc<Mutex<Option<Vec<Migration>>>>,

    /// Returned instead of any payload when set
    failure: Arc<Mutex<Option<IntegrationError>>>,

    /// Count of `fetch_migrations()` invocations
    fetch_count: Arc<AtomicUsize>,
}

impl MockMigrationSource {
    pub fn new(config: SourceConfig) -> Self {
        Self {
            config,
            response: Arc::new(Mutex::new(None)),
            failure: Arc::new(Mutex::new(None)),
            fetch_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Mock without latency, for synchronous-feeling callers
    pub fn instant() -> Self {
        Self::new(SourceConfig {
            latency: Duration::ZERO,
        })
    }

    /// Serve `migrations` instead of the fixture
    pub fn set_response(&self, migrations: Vec<Migration>) {
        *self.response.lock().unwrap_or_else(|e| e.into_inner()) = Some(migrations);
    }

    /// Make every following fetch fail with `failure` (or succeed again with `None`)
    pub fn set_failure(&self, failure: Option<IntegrationError>) {
        *self.failure.lock().unwrap_or_else(|e| e.into_inner()) = failure;
    }

    pub fn fetch_count(&self) -> usize {
        self.fetch_count.load(Ordering::Relaxed)
    }
}

impl Default for MockMigrationSource {
    fn default() -> Self {
        Self::new(SourceConfig::default())
    }
}

#[async_trait]
impl MigrationSource for MockMigrationSource {
    async fn fetch_migrations(&self) -> IntegrationResult<Vec<Migration>> {
        self.fetch_count.fetch_add(1, Ordering::Relaxed);
        debug!("Mock source fetching migrations ({:?} latency)", self.config.latency);

        if !self.config.latency.is_zero() {
            tokio::time::sleep(self.config.latency).await;
        }

        if let Some(err) = self
            .failure
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
        {
            return Err(err);
        }

        let response = self
            .response
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        match response {
            Some(migrations) => Ok(migrations),
            None => fixture_migrations(),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
