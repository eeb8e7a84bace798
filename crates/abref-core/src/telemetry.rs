//! Log setup for the `abref` binary.
//!
//! stdout is reserved: the runner scans it for `::error::` workflow commands
//! and `abref classify` prints its verdict JSON there. All log lines therefore
//! go to stderr, which the runner copies into the job log unchanged.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber.
///
/// `RUST_LOG` wins over `level` when set. With `json` each event is one
/// JSON object per line, carrying the `event` field from [`crate::obs`].
/// Plain text drops timestamps and targets since the Actions log already
/// prefixes every line with a timestamp.
///
/// Later calls are ignored, so tests may call this freely.
pub fn init_tracing(json: bool, level: Level) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));
    let registry = tracing_subscriber::registry().with(filter);

    let installed = if json {
        registry
            .with(fmt::layer().with_writer(std::io::stderr).json())
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .without_time(),
            )
            .try_init()
    };
    // Err only means a subscriber is already installed.
    installed.ok();
}
