//! CLI error reporting specs

use crate::prelude::*;

#[test]
fn missing_key_is_reported() {
    let project = Project::new();
    project
        .falctl()
        .env("FAL_KEY", "")
        .args(&["list"])
        .fails()
        .code(1)
        .stderr_has("Error: no fal API key: pass --key or set FAL_KEY");
    assert!(project.log().is_empty());
}

#[test]
fn key_flag_overrides_environment() {
    let project = Project::new();
    let apps = project.file("apps.json", "[]\n");
    project
        .falctl()
        .env("FALCTL_SPEC_APPS", apps)
        .global(&["--key", "from-flag"])
        .args(&["list"])
        .passes();
    assert!(project
        .log()
        .iter()
        .any(|line| line.starts_with("uv run fal apps list") && line.ends_with("[FAL_KEY=from-flag]")));
}

#[test]
fn unknown_strategy_is_a_usage_error() {
    cli()
        .args(&[
            "deploy",
            "--repo",
            "https://github.com/acme/hello.git",
            "--entrypoint",
            "app.py",
            "--strategy",
            "canary",
        ])
        .fails()
        .code(2)
        .stderr_has("canary");
}
