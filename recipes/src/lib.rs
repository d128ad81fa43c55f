//! # just-mcp recipes
//!
//! Turns the recipes of a justfile into tools and runs them.
//!
//! - **List**: run `just --list` and parse the listing into [`Recipe`]s
//! - **Translate**: describe each recipe as a [`ToolDescriptor`] with a JSON
//!   input schema
//! - **Invoke**: map a tool call back onto a just command line, run it with a
//!   timeout and shape the output into a [`ToolResponse`]
//!
//! This crate knows nothing about the protocol that carries tool calls.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                        just-mcp recipes                       │
//! ├───────────────────────────────────────────────────────────────┤
//! │  validate_environment ──► RecipeLister ──► parse_listing      │
//! │                                │                              │
//! │                                ▼                              │
//! │  ToolDescriptor ◄──────── ToolRegistry                        │
//! │                                │                              │
//! │                                ▼                              │
//! │  InvocationMapper ──► ProcessRunner (ProcessExecutor)         │
//! │         ▲                                                     │
//! │      Session                                                  │
//! └───────────────────────────────────────────────────────────────┘
//! ```

pub mod binary;
pub mod config;
pub mod error;
pub mod executor;
pub mod invocation;
pub mod parser;
pub mod recipe;
pub mod registry;
pub mod session;
pub mod tool;
pub mod validation;

pub use binary::JustBinary;
pub use config::SessionConfig;
pub use error::{RecipeError, Result};
pub use executor::{CommandLine, ExecutionContext, ExecutionResult, ProcessExecutor, ProcessRunner};
pub use invocation::{Arguments, InvocationMapper, MissingArgumentPolicy, ToolResponse};
pub use parser::{RecipeLister, parse_listing};
pub use recipe::{Parameter, Recipe, Variadic};
pub use registry::{RegisteredTool, ToolRegistry};
pub use session::Session;
pub use tool::{ToolDescriptor, ToolNaming};
pub use validation::validate_environment;
