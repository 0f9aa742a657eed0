/// Initialize tracing/logging for the application.
///
/// This uses a simple `with_max_level` configuration based on `default_level`.
pub fn init(default_level: &str) {
    let lvl = parse_level(default_level);

    // try_init: tests and the binary may both call this
    let _ = tracing_subscriber::fmt()
        .with_max_level(lvl)
        .with_target(false)
        .try_init();
}

/// Map a textual level to a `tracing::Level`, falling back to INFO.
pub fn parse_level(level: &str) -> tracing::Level {
    match level.trim().to_lowercase().as_str() {
        "error" => tracing::Level::ERROR,
        "warn" | "warning" => tracing::Level::WARN,
        "debug" => tracing::Level::DEBUG,
        "trace" => tracing::Level::TRACE,
        _ => tracing::Level::INFO,
    }
}
