//! Error types for recipe listing and invocation.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Result type alias for recipe operations.
pub type Result<T> = std::result::Result<T, RecipeError>;

/// Errors that can occur while listing, registering or invoking recipes.
///
/// A recipe that runs and exits non-zero is *not* an error: its exit code is
/// reported inside an otherwise successful tool response.
#[derive(Error, Debug)]
pub enum RecipeError {
    /// The OS refused to create the child process.
    #[error("failed to spawn `{program}`: {source}")]
    ProcessSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The child process outlived the session timeout and was killed.
    #[error("command timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// `just --list` exited non-zero.
    #[error("cannot list just recipes: {0}")]
    ListFailed(String),

    /// No tool with this name is registered.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Two recipes map to the same tool name under the active naming convention.
    #[error("tool name `{tool}` is produced by more than one recipe (second: `{recipe}`)")]
    DuplicateTool { tool: String, recipe: String },

    /// Neither the configured binary nor the fallback answered `--version`.
    #[error("just binary not found: {tried} (also tried {fallback})")]
    BinaryNotFound { tried: String, fallback: String },

    /// The configured justfile does not exist.
    #[error("justfile not found: {}", .0.display())]
    JustfileNotFound(PathBuf),

    /// The binary reference could not be split into program and arguments.
    #[error("invalid just binary reference: {0:?}")]
    InvalidBinary(String),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
