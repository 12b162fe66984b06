//! Logging setup.
//!
//! Library code only emits `tracing` events; binaries decide where they
//! go. [`init_logging`] installs a `tracing-subscriber` formatter that
//! writes to stderr, so a CLI's stdout stays clean for rendered results.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::TokengateError;

/// Output format of the log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Compact,
    Pretty,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Base level (trace, debug, info, warn, error) used when `RUST_LOG`
    /// is not set.
    pub level: String,
    pub format: LogFormat,
    /// Extra filter directives, e.g. `tokengate_session=debug`.
    pub directives: Vec<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Compact,
            directives: vec!["tokengate=info".to_string()],
        }
    }
}

impl LoggingConfig {
    /// Debug output for every tokengate crate.
    pub fn verbose() -> Self {
        Self {
            directives: vec![
                "tokengate=debug".to_string(),
                "tokengate_session=debug".to_string(),
                "tokengate_transport=debug".to_string(),
            ],
            ..Self::default()
        }
    }

    fn filter(&self) -> Result<EnvFilter, TokengateError> {
        if let Ok(filter) = EnvFilter::try_from_default_env() {
            return Ok(filter);
        }
        let mut filter = EnvFilter::new(&self.level);
        for directive in &self.directives {
            let directive = directive
                .parse()
                .map_err(|e| TokengateError::Logging(format!("{directive}: {e}")))?;
            filter = filter.add_directive(directive);
        }
        Ok(filter)
    }
}

/// Installs the global subscriber.
///
/// # Errors
/// [`TokengateError::Logging`] if a directive does not parse or a
/// subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<(), TokengateError> {
    let registry = tracing_subscriber::registry().with(config.filter()?);
    let result = match config.format {
        LogFormat::Compact => registry
            .with(fmt::layer().compact().with_target(false).with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().pretty().with_writer(std::io::stderr))
            .try_init(),
    };
    result.map_err(|e| TokengateError::Logging(e.to_string()))
}
