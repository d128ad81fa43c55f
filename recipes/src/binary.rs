//! Reference to the just executable.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{RecipeError, Result};
use crate::executor::CommandLine;

/// Binary name resolved through `PATH` when nothing else is configured.
pub const DEFAULT_BINARY: &str = "just";

/// Launcher tried when the configured binary does not answer `--version`.
pub const FALLBACK_BINARY: &str = "npx just";

/// How to start just: a program plus any leading arguments (`npx just`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JustBinary {
    program: String,
    prefix: Vec<String>,
}

impl JustBinary {
    /// Parse a binary reference.
    ///
    /// An existing file path is taken verbatim, spaces included; anything else
    /// is split shell-style so launchers like `npx just` work.
    pub fn parse(reference: &str) -> Result<Self> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Err(RecipeError::InvalidBinary(reference.to_string()));
        }

        if Path::new(reference).is_file() {
            return Ok(Self {
                program: reference.to_string(),
                prefix: Vec::new(),
            });
        }

        let mut words = shlex::split(reference)
            .ok_or_else(|| RecipeError::InvalidBinary(reference.to_string()))?
            .into_iter();
        let program = words
            .next()
            .ok_or_else(|| RecipeError::InvalidBinary(reference.to_string()))?;

        Ok(Self {
            program,
            prefix: words.collect(),
        })
    }

    /// The `npx just` launcher.
    pub fn fallback() -> Self {
        Self {
            program: "npx".to_string(),
            prefix: vec!["just".to_string()],
        }
    }

    /// Program name or path.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Start a command line: program plus leading arguments.
    pub fn command(&self) -> CommandLine {
        CommandLine::new(&self.program).args(self.prefix.iter().cloned())
    }

    /// `<binary> --version`
    pub fn version_command(&self) -> CommandLine {
        self.command().arg("--version")
    }

    /// `<binary> --list --justfile <path>`
    pub fn list_command(&self, justfile: &Path) -> CommandLine {
        self.command()
            .arg("--list")
            .arg("--justfile")
            .arg(justfile.to_string_lossy())
    }

    /// `<binary> --justfile <path> <recipe>`; the caller appends arguments.
    pub fn recipe_command(&self, justfile: &Path, recipe: &str) -> CommandLine {
        self.command()
            .arg("--justfile")
            .arg(justfile.to_string_lossy())
            .arg(recipe)
    }
}

impl Default for JustBinary {
    fn default() -> Self {
        Self {
            program: DEFAULT_BINARY.to_string(),
            prefix: Vec::new(),
        }
    }
}

impl fmt::Display for JustBinary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.command(), f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_plain_name() {
        let binary = JustBinary::parse("just").unwrap();
        assert_eq!(binary, JustBinary::default());
    }

    #[test]
    fn test_parse_launcher_with_arguments() {
        let binary = JustBinary::parse(FALLBACK_BINARY).unwrap();
        assert_eq!(binary, JustBinary::fallback());
        assert_eq!(binary.to_string(), "npx just");
    }

    #[test]
    fn test_parse_existing_path_with_spaces() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("my just");
        std::fs::write(&path, "").unwrap();

        let binary = JustBinary::parse(&path.to_string_lossy()).unwrap();
        assert_eq!(binary.program(), path.to_string_lossy());
        assert_eq!(binary.version_command().arguments(), ["--version"]);
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert!(matches!(
            JustBinary::parse("   "),
            Err(RecipeError::InvalidBinary(_))
        ));
    }

    #[test]
    fn test_command_shapes() {
        let binary = JustBinary::fallback();
        let list = binary.list_command(Path::new("/work/justfile"));
        assert_eq!(list.program(), "npx");
        assert_eq!(list.arguments(), ["just", "--list", "--justfile", "/work/justfile"]);

        let run = binary.recipe_command(Path::new("/work/justfile"), "build");
        assert_eq!(run.arguments(), ["just", "--justfile", "/work/justfile", "build"]);
    }
}
