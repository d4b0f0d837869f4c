//! Diagnostic tracing for debugging a run.
//!
//! User-facing messages are printed by [`crate::output::OutputFormatter`].
//! Tracing is for developers: it goes to stderr and is filtered by `RUST_LOG`.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the global tracing subscriber.
///
/// Reads `RUST_LOG`; when it is unset the level is `warn`, or `debug` with
/// `verbose`. Calling this more than once is harmless.
///
/// ```bash
/// RUST_LOG=tidyup=debug tidyup ~/Downloads
/// ```
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .try_init();
}
