//! Server startup.
//!
//! Validation, listing and registration all finish before the transport is
//! opened, so a broken environment never reaches a client.

use std::io::Write;

use just_mcp_recipes::Session;
use tracing::info;

use crate::cli::Cli;
use crate::error::Result;
use crate::handler::JustMcpHandler;
use crate::supervisor::{self, Shutdown};

/// Run the server described by `cli`.
pub async fn run(cli: Cli) -> Result<()> {
    let config = cli.session_config();
    info!(
        justfile = %config.justfile.display(),
        binary = %config.binary,
        timeout_ms = config.timeout.as_millis() as u64,
        "starting just-mcp"
    );

    let session = Session::start(config).await?;

    if cli.list_tools {
        write_tool_list(&session, &mut std::io::stdout().lock())?;
        return Ok(());
    }

    match supervisor::serve_stdio(JustMcpHandler::new(session)).await? {
        Shutdown::ClientClosed => info!("session ended"),
        Shutdown::Signal(signal) => info!("session ended by {signal}"),
    }
    Ok(())
}

/// Print `<tool name>: <description>` per tool.
pub fn write_tool_list(session: &Session, out: &mut impl Write) -> std::io::Result<()> {
    for tool in session.tools() {
        writeln!(out, "{}: {}", tool.name, tool.description)?;
    }
    out.flush()
}
