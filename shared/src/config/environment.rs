//! Deployment environment and log output settings

use serde::{Deserialize, Serialize};

use super::{parsed, Lookup};

/// Where the server runs; decides logging defaults and how strict startup is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Test,
    /// Default signing secrets are refused
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Test => "test",
            Environment::Production => "production",
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }

    /// Reads `ENVIRONMENT`; unknown values fall back to development
    pub fn from_env() -> Self {
        Self::from_lookup(&|key: &str| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: Lookup<'_>) -> Self {
        parsed(lookup, "ENVIRONMENT").unwrap_or_default()
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "development" | "dev" | "local" => Ok(Environment::Development),
            "test" | "testing" | "ci" => Ok(Environment::Test),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(format!("Unknown environment: {}", other)),
        }
    }
}

/// Output settings for the tracing subscriber
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive
    pub filter: String,

    #[serde(default)]
    pub format: LogFormat,

    /// Attach file and line to every event
    #[serde(default)]
    pub source_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::for_environment(Environment::default())
    }
}

impl LoggingConfig {
    pub fn for_environment(env: Environment) -> Self {
        match env {
            Environment::Development => Self {
                filter: String::from("info,ts_api=debug,ts_core=debug,ts_infra=debug"),
                format: LogFormat::Pretty,
                source_location: true,
            },
            Environment::Test => Self {
                filter: String::from("warn"),
                format: LogFormat::Compact,
                source_location: false,
            },
            Environment::Production => Self {
                filter: String::from("info,sqlx=warn"),
                format: LogFormat::Json,
                source_location: false,
            },
        }
    }

    /// Environment defaults, overridden by `RUST_LOG` and `LOG_FORMAT`
    pub(crate) fn from_lookup(env: Environment, lookup: Lookup<'_>) -> Self {
        let mut config = Self::for_environment(env);

        if let Some(filter) = lookup("RUST_LOG").filter(|v| !v.trim().is_empty()) {
            config.filter = filter;
        }
        if let Some(format) = parsed(lookup, "LOG_FORMAT") {
            config.format = format;
        }

        config
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
    Compact,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            "compact" => Ok(LogFormat::Compact),
            other => Err(format!("Unknown log format: {}", other)),
        }
    }
}
