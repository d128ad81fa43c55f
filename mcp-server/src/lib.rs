//! # just-mcp server
//!
//! Serves the recipes of one justfile as MCP tools over stdio.
//!
//! ```text
//! Cli ──► bootstrap::run ──► Session::start (validate, list, register)
//!                                 │
//!                                 ▼
//!          supervisor::serve_stdio(JustMcpHandler) ◄── SIGINT / SIGTERM
//! ```

pub mod bootstrap;
pub mod cli;
pub mod error;
pub mod handler;
pub mod logging;
pub mod supervisor;

pub use cli::Cli;
pub use error::{Result, ServerError};
pub use handler::JustMcpHandler;
