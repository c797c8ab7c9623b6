//! Shared pieces of the backgammon command-line tools.

pub mod config;

/// Install the fmt subscriber on stderr, filtered by `RUST_LOG`
/// (default `info`). Stdout is left for exported data.
pub fn init_logger() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
