//! One validated session: binary resolved, recipes listed, tools registered.

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::config::SessionConfig;
use crate::error::Result;
use crate::executor::{ExecutionContext, ProcessExecutor, ProcessRunner};
use crate::invocation::{Arguments, InvocationMapper, ToolResponse};
use crate::parser::RecipeLister;
use crate::registry::ToolRegistry;
use crate::tool::ToolDescriptor;
use crate::validation::validate_environment;

/// Everything a server needs to list and call tools.
pub struct Session {
    mapper: InvocationMapper,
}

impl Session {
    /// Validate the environment and build the registry, running processes
    /// with a [`ProcessExecutor`] bounded by the configured timeout.
    pub async fn start(config: SessionConfig) -> Result<Self> {
        let executor = ProcessExecutor::with_context(ExecutionContext::new().with_timeout(config.timeout));
        Self::start_with_runner(config, Arc::new(executor)).await
    }

    /// Like [`Session::start`] with an explicit runner.
    pub async fn start_with_runner(config: SessionConfig, runner: Arc<dyn ProcessRunner>) -> Result<Self> {
        let binary = validate_environment(&config, runner.as_ref()).await?;
        let justfile = config.absolute_justfile();

        let recipes = RecipeLister::new(binary.clone(), &justfile, Arc::clone(&runner))
            .list()
            .await?;
        let registry = ToolRegistry::build(recipes, config.naming)?;
        info!("Session ready: {} tools from {}", registry.len(), justfile.display());

        let mapper = InvocationMapper::new(Arc::new(registry), binary, justfile, runner);

        Ok(Self { mapper })
    }

    /// Absolute justfile path.
    pub fn justfile(&self) -> &Path {
        self.mapper.justfile()
    }

    /// The session's registry.
    pub fn registry(&self) -> &ToolRegistry {
        self.mapper.registry()
    }

    /// Tool descriptors in listing order.
    pub fn tools(&self) -> impl Iterator<Item = &ToolDescriptor> {
        self.registry().descriptors()
    }

    /// Call a tool.
    pub async fn call(&self, tool: &str, arguments: Option<&Arguments>) -> ToolResponse {
        self.mapper.invoke(tool, arguments).await
    }
}
