//! Error types for the server crate.

use just_mcp_recipes::RecipeError;
use thiserror::Error;

/// Result type alias for server operations.
pub type Result<T> = std::result::Result<T, ServerError>;

/// Errors that end the server process.
///
/// Per-call failures never show up here; they are reported inside tool
/// results.
#[derive(Error, Debug)]
pub enum ServerError {
    /// Validation, listing or registration failed at startup.
    #[error(transparent)]
    Startup(#[from] RecipeError),

    /// The MCP handshake over stdio failed.
    #[error("failed to start MCP service: {0}")]
    Initialize(String),

    /// The MCP service task ended abnormally.
    #[error("MCP service failed: {0}")]
    Service(String),

    /// A signal handler could not be installed.
    #[error("failed to install signal handler: {0}")]
    Signal(#[source] std::io::Error),

    /// The tracing subscriber could not be installed.
    #[error("failed to initialize logging: {0}")]
    Logging(String),

    /// Writing the tool list failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
