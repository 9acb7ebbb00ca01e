//! Subscriber setup for the `textcls` binary.

use tracing_subscriber::EnvFilter;

/// Filter applied when neither `RUST_LOG` nor a level is configured.
pub const DEFAULT_FILTER: &str = "info";

/// Install a stderr `fmt` subscriber.
///
/// `RUST_LOG` wins when set; otherwise `level` (or [`DEFAULT_FILTER`]) is
/// used. Installing twice is a no-op, which keeps tests that share a process
/// from panicking.
pub fn init(level: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.unwrap_or(DEFAULT_FILTER)));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
