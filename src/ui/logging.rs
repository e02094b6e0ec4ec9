//! ui::logging
//!
//! Logging initialization.
//!
//! Diagnostics flow through `tracing` to stderr; the level is keyed off
//! the CLI flags. User-facing output stays on stdout via [`crate::ui::output`].

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Initialize the tracing subscriber based on CLI flags.
///
/// `--debug` enables debug-level diagnostics; `--quiet` drops everything
/// below errors. Safe to call once per process.
pub fn init(quiet: bool, debug: bool) {
    let level = if debug {
        Level::DEBUG
    } else if quiet {
        Level::ERROR
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .finish();

    // Ignore the error if a subscriber is already installed (tests).
    let _ = tracing::subscriber::set_global_default(subscriber);
}
