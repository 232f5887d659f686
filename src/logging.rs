//! Tracing subscriber setup for the host binary.

use tracing_subscriber::EnvFilter;

/// Installs a stderr `fmt` subscriber.
///
/// `RUST_LOG` wins over `default_filter`. Output goes to stderr because stdout
/// carries the host protocol. Calling this twice is harmless.
pub fn init_logging(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
