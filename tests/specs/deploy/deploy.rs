//! `falctl deploy` specs

use crate::prelude::*;

const REPO: &str = "https://github.com/acme/hello.git";

#[test]
fn deploy_prints_function_and_revision() {
    let project = Project::new();
    let out = project.file("deploy.out", DEPLOY_OK);
    project
        .falctl()
        .env("FALCTL_SPEC_DEPLOY_OUT", out)
        .args(&["deploy", "--repo", REPO, "--entrypoint", "app.py::Hello"])
        .passes()
        .stdout_eq("function: hello\nrevision: rev-42\n");

    let log = project.log();
    let clone = format!(
        "git clone --depth 1 {} {}",
        REPO,
        project.workdir().join("hello").display()
    );
    assert_eq!(log[0], clone);
    assert!(log[1].starts_with("uv sync"), "{log:?}");
    assert_eq!(
        log[2],
        "uv run fal deploy --strategy=rolling --auth=private app.py::Hello [FAL_KEY=spec-key]"
    );
}

#[test]
fn deploy_json_output() {
    let project = Project::new();
    let out = project.file("deploy.out", DEPLOY_OK);
    let run = project
        .falctl()
        .env("FALCTL_SPEC_DEPLOY_OUT", out)
        .global(&["-o", "json"])
        .args(&[
            "deploy",
            "--repo",
            REPO,
            "--entrypoint",
            "app.py",
            "--strategy",
            "recreate",
            "--auth",
            "public",
            "--branch",
            "main",
        ])
        .passes();
    let json: serde_json::Value = serde_json::from_str(&run.stdout()).unwrap();
    assert_eq!(json["function_name"], "hello");
    assert_eq!(json["revision"], "rev-42");
    assert!(json.get("output").is_none());

    let log = project.log();
    assert!(log[0].starts_with("git clone --depth 1 --branch main "), "{log:?}");
    assert!(log[2].starts_with("uv run fal deploy --strategy=recreate --auth=public app.py"));
}

#[test]
fn deploy_without_revision_fails_with_transcript() {
    let project = Project::new();
    let out = project.file("deploy.out", "Error: entrypoint not found\n");
    project
        .falctl()
        .env("FALCTL_SPEC_DEPLOY_OUT", out)
        .env("FALCTL_SPEC_DEPLOY_EXIT", "1")
        .args(&["deploy", "--repo", REPO, "--entrypoint", "missing.py"])
        .fails()
        .code(1)
        .stderr_has("deployment failed")
        .stderr_has("entrypoint not found");
}

#[test]
fn failed_clone_stops_the_deploy() {
    let project = Project::new();
    project
        .falctl()
        .env("FALCTL_SPEC_GIT_EXIT", "128")
        .args(&["deploy", "--repo", REPO, "--entrypoint", "app.py"])
        .fails()
        .stderr_has("git clone failed with exit code 128");
    assert!(project.log().iter().all(|line| !line.starts_with("uv")));
}

#[test]
fn unsupported_scheme_is_rejected_before_cloning() {
    let project = Project::new();
    project
        .falctl()
        .args(&["deploy", "--repo", "ftp://example.com/acme/hello", "--entrypoint", "app.py"])
        .fails()
        .stderr_has("not supported");
    assert!(project.log().is_empty());
}

#[test]
fn http_password_is_not_logged_or_put_in_arguments() {
    let project = Project::new();
    let out = project.file("deploy.out", DEPLOY_OK);
    project
        .falctl()
        .env("FALCTL_SPEC_DEPLOY_OUT", out)
        .env("FALCTL_LOG", "debug")
        .args(&[
            "deploy",
            "--repo",
            REPO,
            "--entrypoint",
            "app.py",
            "--git-username",
            "me",
            "--git-password",
            "hunter2",
        ])
        .passes()
        .stderr_lacks("hunter2");
    assert!(project.log().iter().all(|line| !line.contains("hunter2")));
}
