//! Test helpers for behavioral specifications.
//!
//! Provides a high-level DSL for testing falctl against fake `git` and `uv`
//! executables.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::Output;
use std::time::Duration;

use assert_cmd::Command;

/// Generous upper bound for one falctl run against the fakes.
const RUN_TIMEOUT: Duration = Duration::from_secs(60);

/// Fake `git`: `clone` creates the destination directory.
const FAKE_GIT: &str = r#"#!/bin/sh
echo "git $*" >> "$FALCTL_SPEC_LOG"
if [ "$1" = "clone" ]; then
    for last; do :; done
    mkdir -p "$last"
    echo "Cloning into '$last'..." >&2
    exit "${FALCTL_SPEC_GIT_EXIT:-0}"
fi
exit 0
"#;

/// Fake `uv`: canned `fal` output comes from files named by env vars.
const FAKE_UV: &str = r#"#!/bin/sh
echo "uv $* [FAL_KEY=$FAL_KEY]" >> "$FALCTL_SPEC_LOG"
case "$*" in
    "init"*)
        touch pyproject.toml
        ;;
    "run fal deploy"*)
        [ -n "$FALCTL_SPEC_DEPLOY_OUT" ] && cat "$FALCTL_SPEC_DEPLOY_OUT"
        exit "${FALCTL_SPEC_DEPLOY_EXIT:-0}"
        ;;
    "run fal apps list"*)
        echo "Resolved 12 packages" >&2
        [ -n "$FALCTL_SPEC_APPS" ] && cat "$FALCTL_SPEC_APPS"
        ;;
    "run fal apps delete"*)
        exit "${FALCTL_SPEC_DELETE_EXIT:-0}"
        ;;
esac
exit 0
"#;

/// Isolated environment: a workdir, a bin dir with fakes and a command log.
pub struct Project {
    dir: tempfile::TempDir,
    bin: tempfile::TempDir,
}

impl Project {
    pub fn new() -> Self {
        let project = Self {
            dir: tempfile::tempdir().unwrap(),
            bin: tempfile::tempdir().unwrap(),
        };
        project.tool("git", FAKE_GIT);
        project.tool("uv", FAKE_UV);
        project
    }

    fn tool(&self, name: &str, script: &str) {
        let path = self.bin.path().join(name);
        std::fs::write(&path, script).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn workdir(&self) -> PathBuf {
        self.path().join("work")
    }

    /// Write a fixture file and return its path.
    pub fn file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    /// Commands the fakes saw, one per line.
    pub fn log(&self) -> Vec<String> {
        std::fs::read_to_string(self.path().join("commands.log"))
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// falctl with the fakes first on PATH, a key and a fixed workdir.
    pub fn falctl(&self) -> CliBuilder {
        let path = match std::env::var_os("PATH") {
            Some(existing) => {
                let mut dirs = vec![self.bin.path().to_path_buf()];
                dirs.extend(std::env::split_paths(&existing));
                std::env::join_paths(dirs).unwrap()
            }
            None => self.bin.path().as_os_str().to_owned(),
        };
        cli()
            .env("PATH", PathBuf::from(path))
            .env("FAL_KEY", "spec-key")
            .env("FALCTL_SPEC_LOG", self.path().join("commands.log"))
            .global(&["--workdir", self.workdir().to_str().unwrap()])
    }
}

/// Create a CLI builder for falctl commands
pub fn cli() -> CliBuilder {
    CliBuilder::new()
}

/// High-level CLI builder for fluent test assertions
pub struct CliBuilder {
    global: Vec<String>,
    args: Vec<String>,
    envs: Vec<(String, String)>,
}

impl CliBuilder {
    fn new() -> Self {
        Self {
            global: Vec::new(),
            args: Vec::new(),
            envs: Vec::new(),
        }
    }

    /// Add CLI arguments
    pub fn args(mut self, args: &[&str]) -> Self {
        self.args.extend(args.iter().map(|s| s.to_string()));
        self
    }

    /// Arguments placed before the subcommand
    pub fn global(mut self, args: &[&str]) -> Self {
        self.global.extend(args.iter().map(|s| s.to_string()));
        self
    }

    /// Set environment variable
    pub fn env(mut self, key: &str, value: impl AsRef<Path>) -> Self {
        self.envs.push((
            key.to_string(),
            value.as_ref().to_string_lossy().to_string(),
        ));
        self
    }

    /// Build the command without running it
    pub fn command(self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_falctl"));
        cmd.timeout(RUN_TIMEOUT);
        cmd.args(&self.global).args(&self.args);

        // Keep the caller's credentials and log settings out of specs.
        cmd.env_remove("FAL_KEY")
            .env_remove("FALCTL_LOG")
            .env_remove("FALCTL_LOG_FILE")
            .env_remove("FALCTL_SSH_PASSPHRASE");

        for (key, value) in self.envs {
            cmd.env(key, value);
        }
        cmd
    }

    fn output(self) -> Output {
        self.command().output().expect("command should run")
    }

    /// Run and expect success (exit code 0)
    pub fn passes(self) -> RunAssert {
        let output = self.output();
        assert!(
            output.status.success(),
            "expected command to pass, got exit code {:?}\nstdout: {}\nstderr: {}",
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        RunAssert { output }
    }

    /// Run and expect failure (non-zero exit code)
    pub fn fails(self) -> RunAssert {
        let output = self.output();
        assert!(
            !output.status.success(),
            "expected command to fail, but it passed\nstdout: {}\nstderr: {}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        RunAssert { output }
    }
}

/// Result of a CLI run for chaining assertions
pub struct RunAssert {
    output: Output,
}

impl RunAssert {
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }

    pub fn code(self, expected: i32) -> Self {
        assert_eq!(self.output.status.code(), Some(expected));
        self
    }

    /// Assert stdout equals expected exactly (with diff on failure).
    /// **Prefer this for format specs** - catches format regressions.
    pub fn stdout_eq(self, expected: &str) -> Self {
        let stdout = self.stdout();
        similar_asserts::assert_eq!(stdout, expected);
        self
    }

    /// Assert stdout contains substring.
    pub fn stdout_has(self, expected: &str) -> Self {
        let stdout = self.stdout();
        assert!(
            stdout.contains(expected),
            "stdout does not contain '{}'\nstdout: {}",
            expected,
            stdout
        );
        self
    }

    /// Assert stderr contains substring.
    pub fn stderr_has(self, expected: &str) -> Self {
        let stderr = self.stderr();
        assert!(
            stderr.contains(expected),
            "stderr does not contain '{}'\nstderr: {}",
            expected,
            stderr
        );
        self
    }

    /// Assert stderr does not contain substring.
    pub fn stderr_lacks(self, unexpected: &str) -> Self {
        let stderr = self.stderr();
        assert!(
            !stderr.contains(unexpected),
            "stderr should not contain '{}'\nstderr: {}",
            unexpected,
            stderr
        );
        self
    }
}

/// Two-line success output of `fal deploy`
pub const DEPLOY_OK: &str = "\
Deploying app...
Registered a new revision for function 'hello' (revision='rev-42').
revision='rev-42'
https://fal.run/acme/hello
";

/// `fal apps list --output json` payload with two apps
pub const APPS_JSON: &str = concat!(
    r#"[{"alias": "hello", "revision": "rev-42", "auth_mode": "PRIVATE", "active_runners": 1, "#,
    r#""keep_alive": 300, "machine_types": ["GPU-A100"], "valid_regions": ["us-east"]}, "#,
    r#"{"alias": "world", "revision": "rev-7", "auth_mode": "PUBLIC", "active_runners": 0, "#,
    r#""keep_alive": 10, "machine_types": [], "valid_regions": []}]"#,
    "\n"
);
