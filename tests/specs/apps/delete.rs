//! `falctl delete` specs

use crate::prelude::*;

#[test]
fn delete_confirms() {
    let project = Project::new();
    project
        .falctl()
        .args(&["delete", "hello"])
        .passes()
        .stdout_eq("Deleted app hello\n");
    assert!(project
        .log()
        .iter()
        .any(|line| line == "uv run fal apps delete hello [FAL_KEY=spec-key]"));
}

#[test]
fn delete_json() {
    let project = Project::new();
    let run = project
        .falctl()
        .global(&["-o", "json"])
        .args(&["delete", "hello"])
        .passes();
    let json: serde_json::Value = serde_json::from_str(&run.stdout()).unwrap();
    assert_eq!(json["deleted"], "hello");
}

#[test]
fn failed_delete_reports_the_step() {
    let project = Project::new();
    project
        .falctl()
        .env("FALCTL_SPEC_DELETE_EXIT", "1")
        .args(&["delete", "hello"])
        .fails()
        .stderr_has("fal apps delete failed with exit code 1");
}
