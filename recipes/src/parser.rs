//! Recipe listing and parsing.
//!
//! [`parse_listing`] turns the text printed by `just --list` into [`Recipe`]s.
//! It is the only format-aware code in the crate. Rules, applied per line:
//!
//! 1. Blank lines, the `Available recipes:` header and `[group]` headers are
//!    skipped.
//! 2. The line is split on the first `#`; the right side is the description.
//! 3. The signature is split on whitespace. The first token is the recipe
//!    name; a line without one is skipped.
//! 4. Every further token is a parameter: `name=value`, `name="value"` or
//!    `name='value'` carries a default (possibly empty), a bare token is
//!    required. Leading `$` (exported) is dropped; `+` / `*` mark variadics.
//!
//! Known limitations: a default containing `#` is cut at that `#`, and a
//! quoted default containing whitespace is split into several tokens. Both
//! follow from the line format and are left as-is.

use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};

use regex_lite::Regex;
use tracing::{debug, info, warn};

use crate::binary::JustBinary;
use crate::error::{RecipeError, Result};
use crate::executor::ProcessRunner;
use crate::recipe::{Parameter, Recipe, Variadic};

const LISTING_HEADER: &str = "Available recipes:";

#[allow(clippy::unwrap_used)]
static DEFAULT_PARAM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^([\w-]+)=(?:"([^"]*)"|'([^']*)'|(.*))$"#).unwrap()
});

/// Parse `just --list` output into recipes, in listing order.
pub fn parse_listing(listing: &str) -> Vec<Recipe> {
    listing.lines().filter_map(parse_line).collect()
}

fn parse_line(line: &str) -> Option<Recipe> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with(LISTING_HEADER) || is_group_header(trimmed) {
        return None;
    }

    let (signature, comment) = match trimmed.split_once('#') {
        Some((signature, comment)) => (signature, Some(comment)),
        None => (trimmed, None),
    };

    let mut tokens = signature.split_whitespace();
    let name = tokens.next()?;

    let parameters = tokens.map(parse_parameter).collect();
    let description = comment
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map_or_else(|| Recipe::fallback_description(name), str::to_string);

    Some(Recipe {
        name: name.to_string(),
        parameters,
        description,
    })
}

fn is_group_header(line: &str) -> bool {
    line.starts_with('[') && line.ends_with(']') && !line.contains(char::is_whitespace)
}

fn parse_parameter(token: &str) -> Parameter {
    let (variadic, token) = strip_sigils(token);

    let parameter = match DEFAULT_PARAM.captures(token) {
        Some(caps) => {
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map_or("", |m| m.as_str());
            Parameter::with_default(&caps[1], value)
        }
        None => match variadic {
            Some(Variadic::ZeroOrMore) => Parameter::zero_or_more(token),
            _ => Parameter::required(token),
        },
    };

    match variadic {
        Some(kind) => parameter.variadic(kind),
        None => parameter,
    }
}

/// Strip just's `+`, `*` and `$` prefixes, reporting the variadic kind.
fn strip_sigils(mut token: &str) -> (Option<Variadic>, &str) {
    let mut variadic = None;
    loop {
        if let Some(rest) = token.strip_prefix('+') {
            variadic = Some(Variadic::OneOrMore);
            token = rest;
        } else if let Some(rest) = token.strip_prefix('*') {
            variadic = Some(Variadic::ZeroOrMore);
            token = rest;
        } else if let Some(rest) = token.strip_prefix('$') {
            token = rest;
        } else {
            return (variadic, token);
        }
    }
}

/// Lists the recipes of one justfile through a [`ProcessRunner`].
pub struct RecipeLister {
    binary: JustBinary,
    justfile: PathBuf,
    runner: Arc<dyn ProcessRunner>,
}

impl RecipeLister {
    /// Create a lister.
    pub fn new(binary: JustBinary, justfile: impl Into<PathBuf>, runner: Arc<dyn ProcessRunner>) -> Self {
        Self {
            binary,
            justfile: justfile.into(),
            runner,
        }
    }

    /// The justfile being listed.
    pub fn justfile(&self) -> &Path {
        &self.justfile
    }

    /// Run `just --list` and parse its output.
    pub async fn list(&self) -> Result<Vec<Recipe>> {
        let command = self.binary.list_command(&self.justfile);
        let result = self.runner.run(&command).await?;

        if !result.success() {
            warn!(
                exit_code = result.exit_code,
                "listing {} failed",
                self.justfile.display()
            );
            let message = if result.stderr.is_empty() {
                format!("`{command}` exited with status {}", result.exit_code)
            } else {
                result.stderr
            };
            return Err(RecipeError::ListFailed(message));
        }

        let recipes = parse_listing(&result.stdout);
        for recipe in &recipes {
            debug!(recipe = %recipe.name, parameters = recipe.parameters.len(), "parsed recipe");
        }
        info!("Found {} recipes in {}", recipes.len(), self.justfile.display());

        Ok(recipes)
    }
}
