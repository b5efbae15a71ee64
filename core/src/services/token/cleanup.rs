//! Token cleanup service for periodic removal of expired refresh records
//!
//! Expired refresh tokens already fail verification, so this only keeps the
//! store small. Nothing in the lifecycle depends on it running.

use std::sync::Arc;
use tracing::{error, info, warn};

use crate::errors::DomainError;
use crate::repositories::RefreshTokenRepository;

/// Configuration for token cleanup service
#[derive(Debug, Clone)]
pub struct TokenCleanupConfig {
    /// How often to run cleanup (in seconds)
    pub interval_seconds: u64,
    /// Whether to enable automatic cleanup
    pub enabled: bool,
}

impl Default for TokenCleanupConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 3600, // Run every hour
            enabled: true,
        }
    }
}

impl TokenCleanupConfig {
    /// Build from an interval in seconds; zero disables cleanup
    pub fn with_interval(interval_seconds: u64) -> Self {
        Self {
            interval_seconds,
            enabled: interval_seconds > 0,
        }
    }
}

/// Service for cleaning up expired refresh records
pub struct TokenCleanupService<R: RefreshTokenRepository + 'static> {
    repository: Arc<R>,
    config: TokenCleanupConfig,
}

impl<R: RefreshTokenRepository> TokenCleanupService<R> {
    /// Create a new token cleanup service
    pub fn new(repository: Arc<R>, config: TokenCleanupConfig) -> Self {
        Self { repository, config }
    }

    /// Run a single cleanup cycle
    ///
    /// # Returns
    /// * `Ok(CleanupResult)` - Summary of the cycle; store failures are
    ///   collected in `errors` rather than returned
    /// * `Err(DomainError)` - Reserved for failures outside the store
    pub async fn run_cleanup(&self) -> Result<CleanupResult, DomainError> {
        if !self.config.enabled {
            return Ok(CleanupResult::default());
        }

        info!("Starting token cleanup cycle");

        let mut result = CleanupResult::default();

        match self.repository.delete_expired().await {
            Ok(count) => {
                result.expired_records_deleted = count;
                info!("Deleted {} expired refresh records", count);
            }
            Err(e) => {
                error!("Failed to cleanup expired refresh records: {}", e);
                result.errors.push(format!("Refresh record cleanup error: {}", e));
            }
        }

        Ok(result)
    }

    /// Start the cleanup service as a background task
    ///
    /// This spawns a tokio task that runs cleanup at regular intervals
    pub fn start_background_task(self: Arc<Self>) {
        if !self.config.enabled {
            warn!("Token cleanup service is disabled");
            return;
        }

        let interval = std::time::Duration::from_secs(self.config.interval_seconds);

        tokio::spawn(async move {
            info!(
                "Token cleanup service started - will run every {} seconds",
                self.config.interval_seconds
            );

            let mut interval_timer = tokio::time::interval(interval);

            loop {
                interval_timer.tick().await;

                match self.run_cleanup().await {
                    Ok(result) => {
                        if !result.errors.is_empty() {
                            warn!("Cleanup completed with errors: {:?}", result.errors);
                        }
                    }
                    Err(e) => {
                        error!("Token cleanup cycle failed: {}", e);
                    }
                }
            }
        });
    }
}

/// Result of a cleanup operation
#[derive(Debug, Default)]
pub struct CleanupResult {
    /// Number of expired refresh records deleted
    pub expired_records_deleted: usize,
    /// Any errors encountered during cleanup
    pub errors: Vec<String>,
}

impl CleanupResult {
    /// Check if the cleanup was successful (no errors)
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}
