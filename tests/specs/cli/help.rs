//! CLI help output specs

use crate::prelude::*;

#[test]
fn falctl_no_args_shows_usage_and_exits_zero() {
    cli().passes().stdout_has("Usage:");
}

#[test]
fn falctl_help_lists_subcommands() {
    cli()
        .args(&["--help"])
        .passes()
        .stdout_has("deploy")
        .stdout_has("list")
        .stdout_has("show")
        .stdout_has("delete");
}

#[test]
fn falctl_deploy_help_shows_flags() {
    cli()
        .args(&["deploy", "--help"])
        .passes()
        .stdout_has("--repo")
        .stdout_has("--entrypoint")
        .stdout_has("--strategy");
}

#[test]
fn falctl_version_shows_version() {
    cli().args(&["--version"]).passes().stdout_has("0.1");
}
