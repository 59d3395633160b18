//! Console logging setup.

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Install a global `fmt` subscriber writing to stderr.
///
/// The filter comes from `RUST_LOG` and defaults to `info`. Stdout is left
/// for reports.
pub fn init_logging() -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_thread_names(true)
                .with_target(false),
        )
        .try_init()
}
