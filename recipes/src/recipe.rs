//! Structured recipe model.
//!
//! A [`Recipe`] is built once from a listing and never mutated afterwards.

use serde::{Deserialize, Serialize};

/// A named, invocable just recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    /// Recipe name as accepted by `just <name>`.
    pub name: String,

    /// Formal parameters in positional call order.
    pub parameters: Vec<Parameter>,

    /// Doc comment from the listing, or a generated fallback.
    pub description: String,
}

impl Recipe {
    /// Create a recipe without parameters and with the generated description.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            description: Self::fallback_description(&name),
            name,
            parameters: Vec::new(),
        }
    }

    /// Add a parameter.
    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Description used when the listing carries no comment.
    pub fn fallback_description(name: &str) -> String {
        format!("Execute the {name} recipe")
    }
}

/// Variadic marker carried by just's `+name` / `*name` syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variadic {
    /// `+name`: one or more values.
    OneOrMore,

    /// `*name`: zero or more values.
    ZeroOrMore,
}

/// One formal argument of a recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name, sigils stripped.
    pub name: String,

    /// True when the listing shows no default value.
    pub required: bool,

    /// Default value; only set when `required` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,

    /// Set for variadic parameters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variadic: Option<Variadic>,
}

impl Parameter {
    /// A parameter the caller must supply.
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: true,
            default: None,
            variadic: None,
        }
    }

    /// A parameter with a default value.
    pub fn with_default(name: impl Into<String>, default: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: false,
            default: Some(default.into()),
            variadic: None,
        }
    }

    /// A `*name` parameter: optional, no default, zero or more values.
    pub fn zero_or_more(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: false,
            default: None,
            variadic: Some(Variadic::ZeroOrMore),
        }
    }

    /// Mark the parameter variadic.
    pub fn variadic(mut self, variadic: Variadic) -> Self {
        self.variadic = Some(variadic);
        self
    }

    /// Whether the parameter collects several positional values.
    pub fn is_variadic(&self) -> bool {
        self.variadic.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_recipe_fallback_description() {
        let recipe = Recipe::new("build");
        assert_eq!(recipe.description, "Execute the build recipe");
    }

    #[test]
    fn test_parameter_constructors_keep_invariant() {
        let required = Parameter::required("target");
        assert!(required.required);
        assert_eq!(required.default, None);

        let defaulted = Parameter::with_default("port", "3000");
        assert!(!defaulted.required);
        assert_eq!(defaulted.default.as_deref(), Some("3000"));
    }
}
