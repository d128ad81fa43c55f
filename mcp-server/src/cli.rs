//! Command-line interface.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use just_mcp_recipes::binary::DEFAULT_BINARY;
use just_mcp_recipes::{SessionConfig, ToolNaming};

/// Expose the recipes of a justfile as MCP tools over stdio.
#[derive(Debug, Clone, Parser)]
#[command(name = "just-mcp", version, about)]
pub struct Cli {
    /// Path to the justfile (default: justfile, Justfile or .justfile in the
    /// current directory).
    #[arg(long, env = "JUST_MCP_JUSTFILE", value_name = "PATH")]
    pub justfile: Option<PathBuf>,

    /// just binary, or a launcher such as `npx just`.
    #[arg(long, env = "JUST_MCP_BINARY", value_name = "BIN", default_value = DEFAULT_BINARY)]
    pub just_binary: String,

    /// Per-invocation timeout in milliseconds.
    #[arg(
        long = "timeout",
        env = "JUST_MCP_TIMEOUT_MS",
        value_name = "MS",
        default_value_t = 30_000,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout_ms: u64,

    /// How tool names are built from recipe names.
    #[arg(long, env = "JUST_MCP_TOOL_NAMING", value_enum, default_value_t = NamingArg::Underscore)]
    pub tool_naming: NamingArg,

    /// Validate, print the tools and exit instead of serving.
    #[arg(long)]
    pub list_tools: bool,
}

/// `--tool-naming` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum NamingArg {
    /// `just_<recipe>`
    Underscore,
    /// `just <recipe>`
    Space,
}

impl From<NamingArg> for ToolNaming {
    fn from(arg: NamingArg) -> Self {
        match arg {
            NamingArg::Underscore => ToolNaming::Underscore,
            NamingArg::Space => ToolNaming::Space,
        }
    }
}

impl Cli {
    /// Session configuration described by the arguments.
    pub fn session_config(&self) -> SessionConfig {
        let config = SessionConfig::new()
            .with_binary(self.just_binary.clone())
            .with_timeout(Duration::from_millis(self.timeout_ms))
            .with_naming(self.tool_naming.into());

        match &self.justfile {
            Some(path) => config.with_justfile(path.clone()),
            None => config,
        }
    }
}
