//! Tracing subscriber bootstrap for applications embedding the container.

use anyhow::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Installs a stderr fmt subscriber. `RUST_LOG` wins over `logging.level`.
///
/// Calling this when a global subscriber already exists is not an error.
pub fn init_logging(logging: &LoggingConfig) -> anyhow::Result<()> {
    if !logging.enabled {
        return Ok(());
    }

    let filter = match std::env::var("RUST_LOG") {
        Ok(v) if !v.trim().is_empty() => EnvFilter::from_default_env(),
        _ => EnvFilter::try_new(&logging.level)
            .with_context(|| format!("Invalid log filter: {}", logging.level))?,
    };

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(atty::is(atty::Stream::Stderr));

    if tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .try_init()
        .is_err()
    {
        tracing::debug!("global tracing subscriber already installed");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_is_a_no_op() {
        let logging = LoggingConfig {
            enabled: false,
            level: "not a [valid filter".to_string(),
        };
        assert!(init_logging(&logging).is_ok());
    }

    #[test]
    fn second_init_is_tolerated() {
        let logging = LoggingConfig::default();
        init_logging(&logging).unwrap();
        init_logging(&logging).unwrap();
    }
}
