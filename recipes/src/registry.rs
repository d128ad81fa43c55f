//! Tool registry for one session.
//!
//! The `ToolRegistry` pairs every recipe with its tool descriptor and is
//! built once at startup. It is never mutated afterwards, so it can be shared
//! behind an `Arc` without locks.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::error::{RecipeError, Result};
use crate::recipe::Recipe;
use crate::tool::{ToolDescriptor, ToolNaming};

/// A registered recipe and its descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct RegisteredTool {
    /// The recipe the tool runs.
    pub recipe: Recipe,

    /// The descriptor advertised to clients.
    pub descriptor: ToolDescriptor,
}

/// Immutable index of the session's tools.
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    /// Tools in listing order.
    tools: Vec<RegisteredTool>,

    /// Index of tools by name.
    name_index: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Build a registry, rejecting recipes whose tool names collide.
    pub fn build(recipes: impl IntoIterator<Item = Recipe>, naming: ToolNaming) -> Result<Self> {
        let mut tools = Vec::new();
        let mut name_index = HashMap::new();

        for recipe in recipes {
            let descriptor = ToolDescriptor::from_recipe(&recipe, naming);
            if name_index.contains_key(&descriptor.name) {
                return Err(RecipeError::DuplicateTool {
                    tool: descriptor.name,
                    recipe: recipe.name,
                });
            }

            debug!(tool = %descriptor.name, "registered tool");
            name_index.insert(descriptor.name.clone(), tools.len());
            tools.push(RegisteredTool { recipe, descriptor });
        }

        info!("Registered {} tools", tools.len());

        Ok(Self { tools, name_index })
    }

    /// Get a tool by name.
    pub fn get_by_name(&self, name: &str) -> Option<&RegisteredTool> {
        self.name_index.get(name).map(|&i| &self.tools[i])
    }

    /// All descriptors in listing order.
    pub fn descriptors(&self) -> impl Iterator<Item = &ToolDescriptor> {
        self.tools.iter().map(|t| &t.descriptor)
    }

    /// Number of tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether the registry holds no tools.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
