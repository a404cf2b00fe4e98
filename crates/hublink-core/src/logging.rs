// Tracing setup.

use tracing_subscriber::EnvFilter;

/// Initialize the `tracing` subscriber.
///
/// Honors `RUST_LOG` when set; defaults to info-level output for the
/// hublink crates. Call once at process start.
pub fn init_logger() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("hublink=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}
