use tracing_subscriber::EnvFilter;

/// Log filter for a `-v` count. `RUST_LOG` wins when it is set.
pub fn filter_for(verbosity: u8) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    EnvFilter::new(level)
}

/// Structured logs go to stderr so stdout stays clean for reports.
pub fn init_logging(verbosity: u8) {
    // A second init (e.g. from tests) is harmless
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter_for(verbosity))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
