//! Session configuration.
//!
//! Fixed when the session starts; nothing reads it after the registry is
//! built except the invocation mapper's copies of the binary and justfile.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::binary::DEFAULT_BINARY;
use crate::executor::DEFAULT_TIMEOUT;
use crate::tool::ToolNaming;

/// Justfile names looked for in the working directory, in order.
pub const JUSTFILE_NAMES: [&str; 3] = ["justfile", "Justfile", ".justfile"];

/// Configuration for one server session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Path to the justfile.
    pub justfile: PathBuf,

    /// Binary reference, e.g. `just`, `/opt/bin/just` or `npx just`.
    pub binary: String,

    /// Per-invocation timeout.
    #[serde(with = "duration_ms")]
    pub timeout: Duration,

    /// Tool naming convention.
    pub naming: ToolNaming,
}

impl SessionConfig {
    /// Configuration with every default, discovering the justfile in the
    /// current directory.
    pub fn new() -> Self {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            justfile: discover_justfile(&cwd),
            binary: DEFAULT_BINARY.to_string(),
            timeout: DEFAULT_TIMEOUT,
            naming: ToolNaming::default(),
        }
    }

    /// Set the justfile path.
    pub fn with_justfile(mut self, justfile: impl Into<PathBuf>) -> Self {
        self.justfile = justfile.into();
        self
    }

    /// Set the binary reference.
    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Set the timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the naming convention.
    pub fn with_naming(mut self, naming: ToolNaming) -> Self {
        self.naming = naming;
        self
    }

    /// The justfile as an absolute path, resolved against the current
    /// directory when relative.
    pub fn absolute_justfile(&self) -> PathBuf {
        if self.justfile.is_absolute() {
            return self.justfile.clone();
        }
        std::env::current_dir()
            .map(|cwd| cwd.join(&self.justfile))
            .unwrap_or_else(|_| self.justfile.clone())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// First existing entry of [`JUSTFILE_NAMES`] in `dir`, else `justfile`.
pub fn discover_justfile(dir: &Path) -> PathBuf {
    JUSTFILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
        .unwrap_or_else(|| dir.join(JUSTFILE_NAMES[0]))
}

mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::new();
        assert_eq!(config.binary, "just");
        assert_eq!(config.timeout, Duration::from_millis(30_000));
        assert_eq!(config.naming, ToolNaming::Underscore);
    }

    #[test]
    fn test_builder() {
        let config = SessionConfig::new()
            .with_justfile("/work/justfile")
            .with_binary("npx just")
            .with_timeout(Duration::from_millis(500))
            .with_naming(ToolNaming::Space);

        assert_eq!(config.justfile, PathBuf::from("/work/justfile"));
        assert_eq!(config.absolute_justfile(), PathBuf::from("/work/justfile"));
        assert_eq!(config.binary, "npx just");
        assert_eq!(config.timeout, Duration::from_millis(500));
        assert_eq!(config.naming, ToolNaming::Space);
    }

    #[test]
    fn test_discovery_order() {
        let dir = tempfile::TempDir::new().unwrap();
        assert_eq!(discover_justfile(dir.path()), dir.path().join("justfile"));

        std::fs::write(dir.path().join(".justfile"), "").unwrap();
        assert_eq!(discover_justfile(dir.path()), dir.path().join(".justfile"));

        std::fs::write(dir.path().join("Justfile"), "").unwrap();
        let found = discover_justfile(dir.path());
        // Case-insensitive filesystems report `justfile` for `Justfile`.
        assert!(found == dir.path().join("Justfile") || found == dir.path().join("justfile"));
    }

    #[test]
    fn test_serializes_timeout_as_millis() {
        let config = SessionConfig::new()
            .with_justfile("justfile")
            .with_timeout(Duration::from_millis(1500));
        let json = serde_json::to_value(&config).unwrap();

        assert_eq!(json["timeout"], 1500);
        assert_eq!(json["naming"], "underscore");
        let back: SessionConfig = serde_json::from_value(json).unwrap();
        assert_eq!(back, config);
    }
}
