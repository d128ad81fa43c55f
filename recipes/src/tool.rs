//! Recipe to tool translation.
//!
//! Pure and total: every [`Recipe`] maps to exactly one [`ToolDescriptor`]
//! whose input schema lists every parameter as a string property.

use serde::{Deserialize, Serialize};

use crate::recipe::{Parameter, Recipe};

/// How tool names are derived from recipe names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolNaming {
    /// `just_<recipe>`
    #[default]
    Underscore,

    /// `just <recipe>`
    Space,
}

impl ToolNaming {
    /// Tool name for a recipe name.
    pub fn tool_name(self, recipe: &str) -> String {
        match self {
            Self::Underscore => format!("just_{recipe}"),
            Self::Space => format!("just {recipe}"),
        }
    }
}

/// Protocol-facing description of one recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    /// Tool name, unique within a session.
    pub name: String,

    /// Recipe description.
    pub description: String,

    /// JSON Schema object for the arguments.
    pub input_schema: serde_json::Value,
}

impl ToolDescriptor {
    /// Translate a recipe.
    pub fn from_recipe(recipe: &Recipe, naming: ToolNaming) -> Self {
        let mut properties = serde_json::Map::new();
        let mut required = Vec::new();

        for param in &recipe.parameters {
            properties.insert(
                param.name.clone(),
                serde_json::json!({
                    "type": "string",
                    "description": parameter_description(param),
                }),
            );
            if param.required {
                required.push(serde_json::Value::String(param.name.clone()));
            }
        }

        Self {
            name: naming.tool_name(&recipe.name),
            description: recipe.description.clone(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": properties,
                "required": required,
            }),
        }
    }

    /// Names listed in the schema's `required` array.
    pub fn required_parameters(&self) -> Vec<&str> {
        self.input_schema["required"]
            .as_array()
            .map(|names| names.iter().filter_map(serde_json::Value::as_str).collect())
            .unwrap_or_default()
    }

    /// The schema as a JSON object map.
    pub fn schema_object(&self) -> serde_json::Map<String, serde_json::Value> {
        self.input_schema.as_object().cloned().unwrap_or_default()
    }
}

fn parameter_description(param: &Parameter) -> String {
    match (&param.default, param.required) {
        (_, true) => "Required parameter".to_string(),
        (Some(default), false) => format!("Optional parameter (default: {default})"),
        (None, false) => "Optional parameter".to_string(),
    }
}
