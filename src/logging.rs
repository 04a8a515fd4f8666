// Tracing setup shared by both binaries

use tracing_subscriber::EnvFilter;

/// Used when `RUST_LOG` is unset or invalid
pub const DEFAULT_FILTER: &str = "swift_registry=info,swift_server=info,tower_http=info";

/// Install the global fmt subscriber (stderr, so CLI output stays clean)
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
