//! Log subscriber setup for the `carpool` binary.
//!
//! Library crates log through the `log` facade; the subscriber installed here
//! forwards those records to stderr so stdout stays reserved for command
//! output.

use std::io;

use tracing_subscriber::EnvFilter;

use crate::CliError;

/// Filter applied when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_FILTER: &str = "info";

/// Install the global stderr subscriber.
///
/// # Errors
/// Returns [`CliError::Logging`] when a global subscriber is already set.
pub fn init() -> Result<(), CliError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .try_init()
        .map_err(|err| CliError::Logging {
            message: err.to_string(),
        })
}
