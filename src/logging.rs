//! Tracing subscriber setup for the binary
use tracing_subscriber::EnvFilter;

/// Install a fmt subscriber filtered by `filter`, falling back to `info` when
/// the directive does not parse. Later calls are no-ops.
pub fn init(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
