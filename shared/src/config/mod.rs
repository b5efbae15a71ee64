//! Configuration module with business-specific sub-modules
//!
//! - `auth` - token signing secrets, lifetimes and cleanup scheduling
//! - `database` - database connection and pool configuration
//! - `environment` - environment detection and logging configuration
//! - `server` - HTTP server bind configuration

pub mod auth;
pub mod database;
pub mod environment;
pub mod server;

use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub use auth::{AuthConfig, JwtConfig};
pub use database::DatabaseConfig;
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use server::ServerConfig;

/// Configuration source keyed by variable name; the process environment at runtime
pub(crate) type Lookup<'a> = &'a dyn Fn(&str) -> Option<String>;

/// Parsed value of `key`, or `None` when unset or unparsable
pub(crate) fn parsed<T: FromStr>(lookup: Lookup<'_>, key: &str) -> Option<T> {
    lookup(key).and_then(|value| value.trim().parse().ok())
}

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Authentication configuration
    pub auth: AuthConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            auth: AuthConfig::default(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Callers are expected to have loaded any `.env` file beforehand.
    pub fn from_env() -> Self {
        Self::from_lookup(&|key: &str| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: Lookup<'_>) -> Self {
        let environment = Environment::from_lookup(lookup);

        Self {
            environment,
            server: ServerConfig::from_lookup(lookup),
            database: DatabaseConfig::from_lookup(lookup),
            auth: AuthConfig::from_lookup(lookup),
            logging: LoggingConfig::from_lookup(environment, lookup),
        }
    }

    /// Check the configuration for settings that must not reach production
    ///
    /// # Returns
    /// A list of human readable problems; empty when the configuration is usable
    pub fn problems(&self) -> Vec<String> {
        let mut problems = self.database.problems();

        if self.auth.jwt.access_secret.is_empty() || self.auth.jwt.refresh_secret.is_empty() {
            problems.push("token signing secrets must not be empty".to_string());
        }
        if self.auth.jwt.access_secret == self.auth.jwt.refresh_secret {
            problems.push("access and refresh signing secrets must differ".to_string());
        }
        if self.environment.is_production() && self.auth.jwt.is_using_default_secrets() {
            problems.push("default signing secrets are not allowed in production".to_string());
        }

        problems
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Lookup over a fixed set of variables
    pub(crate) fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_from_lookup_wires_every_section() {
        let config = AppConfig::from_lookup(&vars(&[
            ("ENVIRONMENT", "production"),
            ("SERVER_PORT", "9090"),
            ("DATABASE_MAX_CONNECTIONS", "4"),
            ("JWT_ACCESS_SECRET", "prod-access"),
            ("JWT_REFRESH_SECRET", "prod-refresh"),
            ("LOG_FORMAT", "compact"),
        ]));

        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.database.max_connections, 4);
        assert_eq!(config.logging.format, LogFormat::Compact);
        assert!(config.problems().is_empty());
    }

    #[test]
    fn test_production_without_secrets_is_refused() {
        let config = AppConfig::from_lookup(&vars(&[("ENVIRONMENT", "prod")]));

        let problems = config.problems();
        assert_eq!(problems.len(), 1);
        assert!(problems[0].contains("production"));
    }

    #[test]
    fn test_database_problems_are_included() {
        let config = AppConfig::from_lookup(&vars(&[("DATABASE_URL", "sqlite::memory:")]));
        assert!(config.problems().iter().any(|p| p.contains("mysql://")));
    }

    #[test]
    fn test_default_config_has_no_problems_outside_production() {
        let config = AppConfig::default();
        assert!(config.problems().is_empty());
    }

    #[test]
    fn test_equal_secrets_are_reported() {
        let mut config = AppConfig::default();
        config.auth.jwt = JwtConfig::new("same-secret", "same-secret");

        assert!(config
            .problems()
            .iter()
            .any(|p| p.contains("must differ")));
    }
}
