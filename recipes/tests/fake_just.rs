//! Session tests against a scripted stand-in for the just binary.
//!
//! The script is run through `sh`, so the suite needs no just installation.

#![cfg(unix)]

use std::time::Duration;

use just_mcp_recipes::{RecipeError, Session, SessionConfig, ToolNaming};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

const LISTING: &str = r#"Available recipes:
    [build]
    build target # Build for a target
    deploy env version="1.2.3"
    fail
    slow # Never finishes in time
"#;

const SCRIPT: &str = r#"
case "$1" in
  --version) echo "just 1.36.0" ;;
  --list) cat "$(dirname "$0")/listing.txt" ;;
  --justfile)
    shift 2
    recipe="$1"
    shift
    case "$recipe" in
      fail) echo "partial"; echo "boom" >&2; exit 1 ;;
      slow) sleep 30 ;;
      *) echo "$recipe:$*" ;;
    esac
    ;;
  *) exit 2 ;;
esac
"#;

/// A directory holding a justfile, the fake binary and its listing.
struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("justfile"), "").unwrap();
        std::fs::write(dir.path().join("listing.txt"), LISTING).unwrap();
        std::fs::write(dir.path().join("fake-just"), SCRIPT).unwrap();
        Self { dir }
    }

    fn config(&self) -> SessionConfig {
        let script = self.dir.path().join("fake-just");
        let quoted = shlex::try_quote(script.to_str().unwrap()).unwrap().into_owned();
        SessionConfig::new()
            .with_justfile(self.dir.path().join("justfile"))
            .with_binary(format!("sh {quoted}"))
    }
}

fn args(value: serde_json::Value) -> serde_json::Map<String, serde_json::Value> {
    value.as_object().unwrap().clone()
}

#[tokio::test]
async fn test_session_lists_tools_in_order() {
    let fixture = Fixture::new();
    let session = Session::start(fixture.config()).await.unwrap();

    let names: Vec<_> = session.tools().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["just_build", "just_deploy", "just_fail", "just_slow"]);

    let deploy = session.registry().get_by_name("just_deploy").unwrap();
    assert_eq!(deploy.descriptor.required_parameters(), vec!["env"]);
    assert_eq!(deploy.descriptor.description, "Execute the deploy recipe");
}

#[tokio::test]
async fn test_space_naming() {
    let fixture = Fixture::new();
    let session = Session::start(fixture.config().with_naming(ToolNaming::Space))
        .await
        .unwrap();

    assert!(session.registry().get_by_name("just build").is_some());
}

#[tokio::test]
async fn test_call_passes_arguments_and_defaults() {
    let fixture = Fixture::new();
    let session = Session::start(fixture.config()).await.unwrap();

    let response = session
        .call("just_deploy", Some(&args(serde_json::json!({"env": "prod"}))))
        .await;

    assert!(!response.is_error);
    assert_eq!(response.text, "deploy:prod 1.2.3");
}

#[tokio::test]
async fn test_non_zero_exit_is_reported_in_text() {
    let fixture = Fixture::new();
    let session = Session::start(fixture.config()).await.unwrap();

    let response = session.call("just_fail", None).await;

    assert!(!response.is_error);
    assert_eq!(response.text, "partial\n[stderr]\nboom\n[exit code: 1]");
}

#[tokio::test]
async fn test_timeout_is_reported_and_session_continues() {
    let fixture = Fixture::new();
    let config = fixture.config().with_timeout(Duration::from_millis(1000));
    let session = Session::start(config).await.unwrap();

    let response = session.call("just_slow", None).await;
    assert!(response.is_error);
    assert_eq!(response.text, "Tool execution timed out after 1000 ms");

    let response = session
        .call("just_build", Some(&args(serde_json::json!({"target": "x86"}))))
        .await;
    assert_eq!(response.text, "build:x86");
}

#[tokio::test]
async fn test_unknown_tool() {
    let fixture = Fixture::new();
    let session = Session::start(fixture.config()).await.unwrap();

    let response = session.call("just_missing", None).await;
    assert!(response.is_error);
    assert!(response.text.contains("Unknown tool"));
}

#[tokio::test]
async fn test_missing_justfile_aborts_startup() {
    let fixture = Fixture::new();
    let config = fixture.config().with_justfile(fixture.dir.path().join("nope"));

    let err = Session::start(config).await.err().unwrap();
    assert!(matches!(err, RecipeError::JustfileNotFound(_)));
}
