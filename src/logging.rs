// src/logging.rs
// =============================================================================
// Diagnostic logging setup.
//
// Progress lines and summaries a user reads go through console.rs (stdout,
// or stderr under --json). This is the *other* channel: tracing events
// (navigation failures, files we couldn't read, pool lifecycle) always
// written to stderr.
//
// Level control:
//   RUST_LOG=docs_link_check=debug   (takes precedence when set)
//   -v / --verbose                   (debug for this crate)
//   default                          (warnings only)
// =============================================================================

use tracing_subscriber::EnvFilter;

pub fn init_logging(verbose: bool) {
    let default_directive = if verbose {
        "docs_link_check=debug"
    } else {
        "docs_link_check=warn"
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    // try_init: a second call (e.g. from tests) just keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}
