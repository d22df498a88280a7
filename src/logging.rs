//! Logging setup on `tracing-subscriber`.
//!
//! `RUST_LOG` overrides the default `info` filter, e.g.
//! `RUST_LOG=u_timetable=debug` to see every tier-2 fallback.

use tracing_subscriber::{fmt, EnvFilter};

/// Installs the global subscriber. Output goes to stderr so `--json`
/// output on stdout stays parseable.
///
/// ```no_run
/// u_timetable::logging::init();
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .init();
}

/// Debug-level subscriber for tests; safe to call more than once.
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
