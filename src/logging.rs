//! Logging setup
//!
//! Installs the global `tracing` subscriber. `RUST_LOG` wins over the
//! configured level when set. Output goes to stderr so the terminal
//! dashboard can own stdout.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

/// Install the global subscriber for a binary.
///
/// `default_directives` is used when neither `RUST_LOG` nor a level is
/// configured, e.g. `"coinboard=info,tower_http=debug"`.
pub fn init(config: &LoggingConfig, default_directives: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(config, default_directives)));

    let registry = tracing_subscriber::registry().with(filter);

    if config.format == "json" {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

/// Filter directives used when `RUST_LOG` is unset
pub fn filter_directives(config: &LoggingConfig, default_directives: &str) -> String {
    match config.level.as_deref().map(str::trim) {
        Some(level) if !level.is_empty() => format!("coinboard={}", level),
        _ => default_directives.to_string(),
    }
}
