//! `falctl show` specs

use crate::prelude::*;

#[test]
fn show_prints_app_details() {
    let project = Project::new();
    let apps = project.file("apps.json", APPS_JSON);
    project
        .falctl()
        .env("FALCTL_SPEC_APPS", apps)
        .args(&["show", "hello"])
        .passes()
        .stdout_has("alias:")
        .stdout_has("rev-42")
        .stdout_has("private")
        .stdout_has("GPU-A100")
        .stdout_has("us-east")
        .stdout_has("300s");
}

#[test]
fn show_json_lowercases_auth_mode() {
    let project = Project::new();
    let apps = project.file("apps.json", APPS_JSON);
    let run = project
        .falctl()
        .env("FALCTL_SPEC_APPS", apps)
        .global(&["-o", "json"])
        .args(&["show", "world"])
        .passes();
    let json: serde_json::Value = serde_json::from_str(&run.stdout()).unwrap();
    assert_eq!(json["alias"], "world");
    assert_eq!(json["auth_mode"], "public");
}

#[test]
fn show_unknown_app_fails() {
    let project = Project::new();
    let apps = project.file("apps.json", APPS_JSON);
    project
        .falctl()
        .env("FALCTL_SPEC_APPS", apps)
        .args(&["show", "nope"])
        .fails()
        .code(1)
        .stderr_has("app 'nope' not found");
}
