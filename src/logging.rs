//! Tracing setup for the RPC binary and embedding hosts.
//!
//! Logs go to stderr: stdout carries the RPC protocol.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Env var holding a filter directive, e.g. `travelgo=debug`.
pub const LOG_ENV: &str = "TRAVELGO_LOG";

/// Builds the filter: `TRAVELGO_LOG` when set and valid, else `default`,
/// else `info`.
pub fn build_filter(default: &str) -> EnvFilter {
    std::env::var(LOG_ENV)
        .ok()
        .and_then(|directive| EnvFilter::try_new(directive).ok())
        .or_else(|| EnvFilter::try_new(default).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

/// Installs the global subscriber. Returns false when one was already set.
pub fn init(default: &str) -> bool {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(build_filter(default))
        .try_init()
        .is_ok()
}
