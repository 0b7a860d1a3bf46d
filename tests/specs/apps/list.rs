//! `falctl list` specs

use crate::prelude::*;

#[test]
fn list_renders_a_table() {
    let project = Project::new();
    let apps = project.file("apps.json", APPS_JSON);
    project
        .falctl()
        .env("FALCTL_SPEC_APPS", apps)
        .args(&["list"])
        .passes()
        .stdout_eq(
            "ALIAS  REVISION  RUNNERS  AUTH\n\
             hello  rev-42          1  private\n\
             world  rev-7           0  public\n",
        );

    let log = project.log();
    assert!(log[0].starts_with("uv init --no-workspace --bare"), "{log:?}");
    assert!(log[1].starts_with("uv add fal"), "{log:?}");
    assert_eq!(log[2], "uv run fal apps list --output json [FAL_KEY=spec-key]");
}

#[test]
fn list_reuses_an_initialized_workdir() {
    let project = Project::new();
    let apps = project.file("apps.json", APPS_JSON);
    for _ in 0..2 {
        project
            .falctl()
            .env("FALCTL_SPEC_APPS", &apps)
            .args(&["list"])
            .passes();
    }
    let inits = project
        .log()
        .iter()
        .filter(|line| line.starts_with("uv init"))
        .count();
    assert_eq!(inits, 1);
}

#[test]
fn empty_list_says_so() {
    let project = Project::new();
    let apps = project.file("apps.json", "[]\n");
    project
        .falctl()
        .env("FALCTL_SPEC_APPS", apps)
        .args(&["list"])
        .passes()
        .stdout_eq("No apps found\n");
}

#[test]
fn list_json_passes_apps_through() {
    let project = Project::new();
    let apps = project.file("apps.json", APPS_JSON);
    let run = project
        .falctl()
        .env("FALCTL_SPEC_APPS", apps)
        .global(&["-o", "json"])
        .args(&["list"])
        .passes();
    let json: serde_json::Value = serde_json::from_str(&run.stdout()).unwrap();
    let aliases: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|app| app["alias"].as_str().unwrap())
        .collect();
    assert_eq!(aliases, vec!["hello", "world"]);
}

#[test]
fn garbage_app_list_fails() {
    let project = Project::new();
    let apps = project.file("apps.json", "[not json\n");
    project
        .falctl()
        .env("FALCTL_SPEC_APPS", apps)
        .args(&["list"])
        .fails()
        .code(1);
}
