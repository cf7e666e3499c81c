//! `tracing` subscriber setup. Events go to stderr so report output on stdout
//! stays clean.

use tracing_subscriber::EnvFilter;

pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Install the global subscriber.
///
/// With `quiet_by_default` (the TUI) nothing is installed unless a filter was
/// configured explicitly. An unparsable filter falls back to the default.
pub fn init(filter: Option<&str>, quiet_by_default: bool) {
    if filter.is_none() && quiet_by_default {
        return;
    }
    let directive = filter.unwrap_or(DEFAULT_LOG_FILTER);
    let env_filter =
        EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    // A subscriber may already be installed (tests); keep the existing one.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
