use std::time::Duration;

use clap::Parser;
use just_mcp_server::{Cli, bootstrap, logging, supervisor};
use tracing::error;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init()?;
    supervisor::install_panic_hook();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(bootstrap::run(cli));
    // The stdin reader blocks in a pool thread; do not wait for it.
    runtime.shutdown_timeout(Duration::from_millis(100));

    if let Err(e) = &result {
        error!("{e}");
    }
    result.map_err(Into::into)
}
