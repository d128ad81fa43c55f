//! Process supervision: panic logging, signals and service shutdown.

use rmcp::ServiceExt;
use rmcp::transport::stdio;
use tracing::{error, info};

use crate::error::{Result, ServerError};
use crate::handler::JustMcpHandler;

/// Why the server stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shutdown {
    /// The client closed the transport.
    ClientClosed,

    /// A termination signal arrived.
    Signal(&'static str),
}

/// Log panics through tracing before the default hook prints them.
pub fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        error!("fatal: {info}");
        default_hook(info);
    }));
}

/// Serve over stdio until the client disconnects or a signal arrives.
pub async fn serve_stdio(handler: JustMcpHandler) -> Result<Shutdown> {
    let service = handler
        .serve(stdio())
        .await
        .map_err(|e| ServerError::Initialize(e.to_string()))?;
    info!("serving MCP over stdio");

    let cancel = service.cancellation_token();
    tokio::select! {
        result = service.waiting() => {
            result.map_err(|e| ServerError::Service(e.to_string()))?;
            info!("client disconnected");
            Ok(Shutdown::ClientClosed)
        }
        signal = shutdown_signal() => {
            let signal = signal?;
            info!("received {signal}, shutting down");
            cancel.cancel();
            Ok(Shutdown::Signal(signal))
        }
    }
}

/// Resolve with the name of the first termination signal received.
#[cfg(unix)]
pub async fn shutdown_signal() -> Result<&'static str> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut interrupt = signal(SignalKind::interrupt()).map_err(ServerError::Signal)?;
    let mut terminate = signal(SignalKind::terminate()).map_err(ServerError::Signal)?;

    tokio::select! {
        _ = interrupt.recv() => Ok("SIGINT"),
        _ = terminate.recv() => Ok("SIGTERM"),
    }
}

/// Resolve when Ctrl-C is pressed.
#[cfg(not(unix))]
pub async fn shutdown_signal() -> Result<&'static str> {
    tokio::signal::ctrl_c().await.map_err(ServerError::Signal)?;
    Ok("Ctrl-C")
}
