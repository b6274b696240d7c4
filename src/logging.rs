//! Subscriber setup. Logs go to stderr so they never mix with the wrapped
//! program's stdout.

use tracing::level_filters::LevelFilter;
use tracing::warn;

pub const DEFAULT_LEVEL: LevelFilter = LevelFilter::INFO;

/// Map a level name to a filter. Case-insensitive; `None` for unknown names.
pub fn parse_level(name: &str) -> Option<LevelFilter> {
    match name.trim().to_lowercase().as_str() {
        "trace" => Some(LevelFilter::TRACE),
        "debug" => Some(LevelFilter::DEBUG),
        "info" => Some(LevelFilter::INFO),
        "warn" | "warning" => Some(LevelFilter::WARN),
        "error" | "fatal" | "panic" => Some(LevelFilter::ERROR),
        "disabled" | "off" => Some(LevelFilter::OFF),
        _ => None,
    }
}

/// Install the global subscriber. An unknown level keeps the default and is
/// reported once the subscriber is running. Calling this twice is harmless.
pub fn init_logging(level: Option<&str>) {
    let parsed = level.map(|name| (name, parse_level(name)));
    let max_level = match parsed {
        Some((_, Some(filter))) => filter,
        _ => DEFAULT_LEVEL,
    };

    let installed = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_max_level(max_level)
        .try_init()
        .is_ok();

    if let (true, Some((name, None))) = (installed, parsed) {
        warn!(
            level = name,
            "Unknown UDL_LOGGING_LEVEL, expected one of trace, debug, info, warn, error, fatal, disabled"
        );
    }
}
