//! Tracing subscriber setup.
//!
//! Logs always go to stderr so command output on stdout stays valid JSON.

use brandmark_core::config::LoggingConfig;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// HTTP client internals are only interesting at trace level.
const QUIET_TARGETS: &[&str] = &["hyper_util=warn", "reqwest=warn", "rustls=warn"];

/// Build the filter: `RUST_LOG` wins, then `--verbose`, then `[logging] level`.
fn build_filter(level: &str, verbose: bool) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }

    let level = if verbose { "debug" } else { level };
    let mut filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));
    for directive in QUIET_TARGETS {
        if let Ok(directive) = directive.parse() {
            filter = filter.add_directive(directive);
        }
    }
    filter
}

/// Install the global subscriber.
///
/// `verbose` forces debug level and `json_logs` forces JSON output,
/// regardless of what the config file says.
pub fn init_from_config(config: &brandmark_core::Config, verbose: bool, json_logs: bool) {
    let LoggingConfig { level, format } = &config.logging;
    let filter = build_filter(level, verbose);

    if json_logs || format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(verbose)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}
