//! Tracing initialization.

use crate::config::LoggingConfig;

/// Install the global tracing subscriber according to `config`.
///
/// Later calls keep the first subscriber, so tests can call this freely.
pub fn init_logging(config: &LoggingConfig) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let builder = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false);

    if config.json {
        tracing::subscriber::set_global_default(builder.json().finish()).ok();
    } else {
        tracing::subscriber::set_global_default(builder.finish()).ok();
    }
}

/// Initialize logging with defaults (tests and one-off scripts).
pub fn init_default_logging() {
    init_logging(&LoggingConfig::default());
}
