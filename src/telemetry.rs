use tracing::Level;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn use_json() -> bool {
    std::env::var("RUST_LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false)
}

fn filter() -> EnvFilter {
    EnvFilter::from_default_env().add_directive(Level::INFO.into())
}

/// Installs a subscriber for the crate's own diagnostics.
/// JSON output when `RUST_LOG_FORMAT=json`, human-readable otherwise.
/// Panics if a global subscriber is already set.
pub fn init_tracing() {
    if use_json() {
        tracing_subscriber::registry()
            .with(fmt::layer().json().flatten_event(true).with_current_span(true))
            .with(filter())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer())
            .with(filter())
            .init();
    }
}

/// Like [`init_tracing`], but reports an already-installed subscriber as an error.
pub fn try_init_tracing() -> Result<(), TryInitError> {
    if use_json() {
        tracing_subscriber::registry()
            .with(fmt::layer().json().flatten_event(true).with_current_span(true))
            .with(filter())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer())
            .with(filter())
            .try_init()
    }
}
