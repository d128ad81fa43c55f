//! Startup validation.
//!
//! Checks, in order, that a just binary answers `--version` (falling back to
//! `npx just`), that the justfile exists and that `just --list` succeeds on
//! it. Any failure aborts the session before tools are registered.

use std::path::Path;

use tracing::{debug, info, warn};

use crate::binary::{FALLBACK_BINARY, JustBinary};
use crate::config::SessionConfig;
use crate::error::{RecipeError, Result};
use crate::executor::ProcessRunner;

/// Validate the environment and return the binary to use for the session.
pub async fn validate_environment(config: &SessionConfig, runner: &dyn ProcessRunner) -> Result<JustBinary> {
    let binary = resolve_binary(&config.binary, runner).await?;

    if !config.justfile.is_file() {
        return Err(RecipeError::JustfileNotFound(config.justfile.clone()));
    }

    check_listing(&binary, &config.justfile, runner).await?;
    info!(binary = %binary, justfile = %config.justfile.display(), "environment validated");

    Ok(binary)
}

/// The configured binary if it answers `--version`, else `npx just`.
pub async fn resolve_binary(reference: &str, runner: &dyn ProcessRunner) -> Result<JustBinary> {
    match JustBinary::parse(reference) {
        Ok(binary) if answers_version(&binary, runner).await => return Ok(binary),
        Ok(_) => {}
        Err(e) => warn!("{e}"),
    }

    let fallback = JustBinary::fallback();
    if answers_version(&fallback, runner).await {
        info!("`{reference}` unavailable, using {fallback}");
        return Ok(fallback);
    }

    Err(RecipeError::BinaryNotFound {
        tried: reference.to_string(),
        fallback: FALLBACK_BINARY.to_string(),
    })
}

async fn answers_version(binary: &JustBinary, runner: &dyn ProcessRunner) -> bool {
    match runner.run(&binary.version_command()).await {
        Ok(result) if result.success() => {
            debug!(binary = %binary, version = %result.stdout, "found just");
            true
        }
        Ok(result) => {
            debug!(binary = %binary, exit_code = result.exit_code, "`--version` failed");
            false
        }
        Err(e) => {
            debug!(binary = %binary, "`--version` failed: {e}");
            false
        }
    }
}

async fn check_listing(binary: &JustBinary, justfile: &Path, runner: &dyn ProcessRunner) -> Result<()> {
    let command = binary.list_command(justfile);
    let result = runner.run(&command).await?;
    if result.success() {
        return Ok(());
    }
    if result.stderr.is_empty() {
        return Err(RecipeError::ListFailed(format!(
            "`{command}` exited with status {}",
            result.exit_code
        )));
    }
    Err(RecipeError::ListFailed(result.stderr))
}
