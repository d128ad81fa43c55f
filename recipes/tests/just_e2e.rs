//! End-to-end tests against a real `just` binary.
//!
//! Every test returns early when `just` is not on `PATH`.

use std::time::Duration;

use just_mcp_recipes::{Session, SessionConfig};
use tempfile::TempDir;

const JUSTFILE: &str = r#"
# Build the project for a target
build target:
    @echo "Building for {{target}}"

deploy env version="1.2.3":
    @echo "Deploying {{version}} to {{env}}"

fail:
    @echo "about to fail"
    @exit 1

slow:
    @sleep 30
"#;

fn just_available() -> bool {
    if which::which("just").is_ok() {
        return true;
    }
    eprintln!("skipping: `just` not found on PATH");
    false
}

async fn session(dir: &TempDir, timeout: Duration) -> Session {
    let justfile = dir.path().join("justfile");
    std::fs::write(&justfile, JUSTFILE).unwrap();
    Session::start(SessionConfig::new().with_justfile(justfile).with_timeout(timeout))
        .await
        .unwrap()
}

fn args(value: serde_json::Value) -> serde_json::Map<String, serde_json::Value> {
    value.as_object().unwrap().clone()
}

#[tokio::test]
async fn test_lists_recipes_from_real_just() {
    if !just_available() {
        return;
    }
    let dir = TempDir::new().unwrap();
    let session = session(&dir, Duration::from_secs(30)).await;

    let build = session.registry().get_by_name("just_build").unwrap();
    assert_eq!(build.descriptor.description, "Build the project for a target");
    assert_eq!(build.descriptor.required_parameters(), vec!["target"]);

    let deploy = session.registry().get_by_name("just_deploy").unwrap();
    assert_eq!(deploy.recipe.parameters[1].default.as_deref(), Some("1.2.3"));
}

#[tokio::test]
async fn test_build_with_argument() {
    if !just_available() {
        return;
    }
    let dir = TempDir::new().unwrap();
    let session = session(&dir, Duration::from_secs(30)).await;

    let response = session
        .call("just_build", Some(&args(serde_json::json!({"target": "foo"}))))
        .await;

    assert!(!response.is_error, "{}", response.text);
    assert!(response.text.contains("Building for foo"), "{}", response.text);
}

#[tokio::test]
async fn test_deploy_default_and_override() {
    if !just_available() {
        return;
    }
    let dir = TempDir::new().unwrap();
    let session = session(&dir, Duration::from_secs(30)).await;

    let response = session
        .call("just_deploy", Some(&args(serde_json::json!({"env": "prod"}))))
        .await;
    assert!(response.text.contains("Deploying 1.2.3 to prod"), "{}", response.text);

    let response = session
        .call(
            "just_deploy",
            Some(&args(serde_json::json!({"env": "prod", "version": "2.0.0"}))),
        )
        .await;
    assert!(response.text.contains("Deploying 2.0.0 to prod"), "{}", response.text);
}

#[tokio::test]
async fn test_failing_recipe_reports_exit_code() {
    if !just_available() {
        return;
    }
    let dir = TempDir::new().unwrap();
    let session = session(&dir, Duration::from_secs(30)).await;

    let response = session.call("just_fail", None).await;

    assert!(!response.is_error);
    assert!(response.text.starts_with("about to fail"), "{}", response.text);
    assert!(response.text.contains("[exit code: 1]"), "{}", response.text);
}

#[tokio::test]
async fn test_missing_required_argument_is_reported_by_just() {
    if !just_available() {
        return;
    }
    let dir = TempDir::new().unwrap();
    let session = session(&dir, Duration::from_secs(30)).await;

    let response = session.call("just_build", None).await;

    assert!(!response.is_error);
    assert!(response.text.contains("[exit code:"), "{}", response.text);
}

#[tokio::test]
async fn test_slow_recipe_times_out() {
    if !just_available() {
        return;
    }
    let dir = TempDir::new().unwrap();
    let session = session(&dir, Duration::from_secs(2)).await;

    let response = session.call("just_slow", None).await;

    assert!(response.is_error);
    assert!(response.text.contains("timed out"), "{}", response.text);
}
