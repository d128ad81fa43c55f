//! Tracing setup.
//!
//! Logs go to stderr without ANSI colors; stdout carries the MCP transport.

use tracing_subscriber::EnvFilter;

use crate::error::{Result, ServerError};

/// Environment variable that turns on debug logging.
pub const DEBUG_ENV: &str = "JUST_MCP_DEBUG";

/// Whether a `JUST_MCP_DEBUG` value asks for debug logging.
pub fn debug_requested(value: Option<&str>) -> bool {
    match value.map(str::trim) {
        None | Some("" | "0") => false,
        Some(v) => !v.eq_ignore_ascii_case("false"),
    }
}

/// Filter directive used when `RUST_LOG` is not set.
pub fn default_directive(debug: bool) -> &'static str {
    if debug { "debug" } else { "warn" }
}

/// Install the global subscriber.
pub fn init() -> Result<()> {
    let debug = debug_requested(std::env::var(DEBUG_ENV).ok().as_deref());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(debug)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| ServerError::Logging(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_debug_values() {
        assert!(!debug_requested(None));
        assert!(!debug_requested(Some("")));
        assert!(!debug_requested(Some("0")));
        assert!(!debug_requested(Some("False")));
        assert!(debug_requested(Some("1")));
        assert!(debug_requested(Some("true")));
        assert!(debug_requested(Some("yes")));
    }

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive(false), "warn");
        assert_eq!(default_directive(true), "debug");
    }
}
