//! Tool invocation.
//!
//! The [`InvocationMapper`] turns a tool call into a just command line, runs it
//! through a [`ProcessRunner`] and shapes the outcome into a [`ToolResponse`].
//! Per-call failures never escape as errors; they become error responses so
//! the session keeps serving.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::binary::JustBinary;
use crate::error::{RecipeError, Result};
use crate::executor::{CommandLine, ExecutionResult, ProcessRunner};
use crate::recipe::{Parameter, Recipe};
use crate::registry::ToolRegistry;

/// Tool call arguments, keyed by parameter name.
pub type Arguments = Map<String, Value>;

/// What to do when a parameter has neither a supplied value nor a default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingArgumentPolicy {
    /// Omit the argument and let just report the arity error, which then
    /// surfaces as a non-zero exit code in the response.
    #[default]
    DeferToJust,
}

/// Protocol-independent result of one tool call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResponse {
    /// Text payload.
    pub text: String,

    /// True when the tool could not be run at all.
    pub is_error: bool,
}

impl ToolResponse {
    /// A response from a process that ran to completion.
    ///
    /// Stdout comes first, then a `[stderr]` section when stderr is not
    /// empty, then `[exit code: N]` when the exit status is not zero.
    pub fn from_execution(result: &ExecutionResult) -> Self {
        let mut text = result.stdout.clone();
        if !result.stderr.is_empty() {
            text.push_str("\n[stderr]\n");
            text.push_str(&result.stderr);
        }
        if !result.success() {
            text.push_str(&format!("\n[exit code: {}]", result.exit_code));
        }
        Self {
            text,
            is_error: false,
        }
    }

    /// An error response.
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }

    fn from_error(err: &RecipeError) -> Self {
        match err {
            RecipeError::UnknownTool(_) => Self::error(err.to_string()),
            RecipeError::Timeout(duration) => Self::error(format!(
                "Tool execution timed out after {} ms",
                duration.as_millis()
            )),
            other => Self::error(format!("Tool execution error: {other}")),
        }
    }
}

/// Maps tool calls onto just invocations.
pub struct InvocationMapper {
    registry: Arc<ToolRegistry>,
    binary: JustBinary,
    justfile: PathBuf,
    runner: Arc<dyn ProcessRunner>,
    missing: MissingArgumentPolicy,
}

impl InvocationMapper {
    /// Create a mapper for one session.
    pub fn new(
        registry: Arc<ToolRegistry>,
        binary: JustBinary,
        justfile: impl Into<PathBuf>,
        runner: Arc<dyn ProcessRunner>,
    ) -> Self {
        Self {
            registry,
            binary,
            justfile: justfile.into(),
            runner,
            missing: MissingArgumentPolicy::default(),
        }
    }

    /// The registry calls are resolved against.
    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// The justfile passed to every call.
    pub fn justfile(&self) -> &Path {
        &self.justfile
    }

    /// Run a tool. Never fails; every failure is an error response.
    pub async fn invoke(&self, tool: &str, arguments: Option<&Arguments>) -> ToolResponse {
        match self.try_invoke(tool, arguments).await {
            Ok(result) => ToolResponse::from_execution(&result),
            Err(err) => {
                warn!(tool, "tool call failed: {err}");
                ToolResponse::from_error(&err)
            }
        }
    }

    async fn try_invoke(&self, tool: &str, arguments: Option<&Arguments>) -> Result<ExecutionResult> {
        let registered = self
            .registry
            .get_by_name(tool)
            .ok_or_else(|| RecipeError::UnknownTool(tool.to_string()))?;

        let empty = Arguments::new();
        let command = self.build_command(&registered.recipe, arguments.unwrap_or(&empty));

        info!(tool, recipe = %registered.recipe.name, "invoking recipe");
        let result = self.runner.run(&command).await?;
        debug!(tool, exit_code = result.exit_code, duration_ms = result.duration_ms, "recipe finished");

        Ok(result)
    }

    /// Build `<binary> --justfile <path> <recipe> <args...>`.
    ///
    /// Arguments follow parameter order: the supplied value, else the
    /// default, else whatever the missing-argument policy says. Arguments
    /// naming no parameter are ignored.
    pub fn build_command(&self, recipe: &Recipe, arguments: &Arguments) -> CommandLine {
        let mut command = self.binary.recipe_command(&self.justfile, &recipe.name);

        for param in &recipe.parameters {
            match supplied_value(arguments, &param.name) {
                Some(value) => command = command.args(positional_values(param, value)),
                None => match (&param.default, self.missing) {
                    (Some(default), _) => command = command.arg(default.as_str()),
                    (None, MissingArgumentPolicy::DeferToJust) => {
                        debug!(recipe = %recipe.name, parameter = %param.name, "no value supplied");
                    }
                },
            }
        }

        command
    }
}

/// Stringified argument value; `null` counts as absent.
fn supplied_value(arguments: &Arguments, name: &str) -> Option<String> {
    match arguments.get(name)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

/// Variadic values are split shell-style; anything else is one argument.
fn positional_values(param: &Parameter, value: String) -> Vec<String> {
    if !param.is_variadic() {
        return vec![value];
    }
    match shlex::split(&value) {
        Some(words) => words,
        None => vec![value],
    }
}
