//! Console logging.

use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str =
    "relpub=info,relpub_registry=info,relpub_build=info,relpub_targets=info";
const VERBOSE_LOG_FILTER: &str =
    "relpub=debug,relpub_registry=debug,relpub_build=debug,relpub_targets=debug";

/// Initialize tracing to stderr. `RUST_LOG` wins over `verbose`.
pub fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose {
            VERBOSE_LOG_FILTER
        } else {
            DEFAULT_LOG_FILTER
        })
    });

    // A subscriber may already be installed when called from tests.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .try_init();
}
