//! Diagnostic logging to stderr, controlled by `RUST_LOG`.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_FILTER: &str = "warn";

fn env_filter(verbose: bool) -> EnvFilter {
    if verbose {
        return EnvFilter::new("info,devurls=debug");
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber. User-facing output stays on stdout; this
/// only carries diagnostics.
///
/// Calling it twice is harmless: the second install is ignored.
pub fn init_logging(verbose: bool) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
