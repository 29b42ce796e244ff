//! Tracing setup for the CLI.

use std::sync::Once;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding a tracing filter, e.g. `CMDLINT_LOG=cmdlint=debug`.
pub const LOG_ENV: &str = "CMDLINT_LOG";

static INIT: Once = Once::new();

/// Install the stderr subscriber. Safe to call more than once.
///
/// Falls back to `cmdlint=warn` (or `cmdlint=debug` when `verbose`) if
/// `CMDLINT_LOG` is unset or invalid.
pub fn init(verbose: bool) {
    INIT.call_once(|| {
        let default = if verbose { "cmdlint=debug" } else { "cmdlint=warn" };
        let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .without_time(),
            )
            .with(filter)
            .init();
    });
}
