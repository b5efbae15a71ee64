//! Tracing subscriber setup

use tracing_subscriber::{fmt, EnvFilter};
use ts_shared::config::{LogFormat, LoggingConfig};

/// Install the global tracing subscriber
///
/// An unparsable level falls back to `info`. Records emitted through the
/// `log` facade (actix-web, sqlx) are forwarded as well.
pub fn init(config: &LoggingConfig) {
    let filter = EnvFilter::try_new(&config.filter).unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = fmt()
        .with_env_filter(filter)
        .with_file(config.source_location)
        .with_line_number(config.source_location);

    match config.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.pretty().init(),
        LogFormat::Compact => builder.compact().init(),
    }
}
