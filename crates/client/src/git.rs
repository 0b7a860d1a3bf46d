// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shallow clones through the `git` CLI.
//!
//! Credentials never appear on the command line. HTTP basic auth travels as
//! an `Authorization` header and TLS settings as `GIT_CONFIG_*` environment
//! entries; SSH keys and CA bundles are written to private temp files that
//! live only for the duration of the clone.

use crate::error::ClientError;
use crate::step::run_step;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use fal_exec::{ExecCommand, Executor};
use std::fmt;
use std::io::{self, Write};
use std::path::Path;
use tempfile::{NamedTempFile, TempPath};
use tokio_util::sync::CancellationToken;
use url::Url;

const GIT: &str = "git";

/// Carries an SSH key passphrase to the askpass helper.
const PASSPHRASE_ENV: &str = "FAL_GIT_SSH_PASSPHRASE";

/// Credentials and TLS settings for `http`/`https` remotes.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct HttpAuth {
    pub username: String,
    pub password: String,
    /// Skip TLS certificate verification.
    pub allow_insecure: bool,
    /// PEM bundle trusted in addition to the system roots (https only).
    pub certificate_authority: Option<String>,
}

impl fmt::Debug for HttpAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpAuth")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("allow_insecure", &self.allow_insecure)
            .field("certificate_authority", &self.certificate_authority.is_some())
            .finish()
    }
}

/// Key-based credentials for `ssh` remotes.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SshAuth {
    pub username: String,
    pub private_key: String,
    pub passphrase: Option<String>,
}

impl fmt::Debug for SshAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SshAuth")
            .field("username", &self.username)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// Where to fetch an app's source from.
#[derive(Debug, Clone, Default)]
pub struct GitSource {
    pub url: String,
    pub branch: Option<String>,
    pub http: Option<HttpAuth>,
    pub ssh: Option<SshAuth>,
}

impl GitSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    pub fn http(mut self, auth: HttpAuth) -> Self {
        self.http = Some(auth);
        self
    }

    pub fn ssh(mut self, auth: SshAuth) -> Self {
        self.ssh = Some(auth);
        self
    }

    fn parsed_url(&self) -> Result<Url, ClientError> {
        Url::parse(&self.url).map_err(|_| ClientError::InvalidRepositoryUrl {
            url: self.url.clone(),
        })
    }

    /// Check that the URL scheme is supported and has matching credentials.
    pub fn validate(&self) -> Result<(), ClientError> {
        let url = self.parsed_url()?;
        match url.scheme() {
            "http" | "https" => {
                if self.http.is_none() {
                    return Err(ClientError::MissingGitAuth {
                        scheme: url.scheme().to_string(),
                    });
                }
                Ok(())
            }
            "ssh" => {
                let ssh = match &self.ssh {
                    Some(ssh) if !ssh.private_key.is_empty() => ssh,
                    _ => {
                        return Err(ClientError::MissingGitAuth {
                            scheme: "ssh".to_string(),
                        })
                    }
                };
                if !ssh.private_key.contains("PRIVATE KEY") {
                    return Err(ClientError::SshKey("no private key block found".to_string()));
                }
                Ok(())
            }
            other => Err(ClientError::UnsupportedScheme(other.to_string())),
        }
    }

    /// The URL handed to `git clone`.
    ///
    /// HTTP credentials are stripped from the URL; SSH remotes get the
    /// configured username unless the URL already names a user and the
    /// configured one is the default `git`.
    pub fn repository_url(&self) -> Result<Url, ClientError> {
        let mut url = self.parsed_url()?;
        let invalid = || ClientError::InvalidRepositoryUrl {
            url: self.url.clone(),
        };
        if self.http.is_some() {
            url.set_username("").map_err(|_| invalid())?;
            url.set_password(None).map_err(|_| invalid())?;
        }
        if let Some(ssh) = &self.ssh {
            if url.username().is_empty() || ssh.username != "git" {
                url.set_username(&ssh.username).map_err(|_| invalid())?;
            }
        }
        Ok(url)
    }
}

/// Runs `git clone` through an [`Executor`].
#[derive(Debug, Clone)]
pub struct GitClient<E> {
    executor: E,
    cancel: Option<CancellationToken>,
}

impl<E: Executor> GitClient<E> {
    pub fn new(executor: E) -> Self {
        Self {
            executor,
            cancel: None,
        }
    }

    pub fn with_cancel(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Shallow-clone `source` into `path`, which must not exist yet.
    pub async fn clone_repo(&self, source: &GitSource, path: &Path) -> Result<(), ClientError> {
        source.validate()?;
        let url = source.repository_url()?;

        let mut command = ExecCommand::new(GIT).args(["clone", "--depth", "1"]);
        if let Some(branch) = &source.branch {
            command = command.arg("--branch").arg(branch);
        }
        command = command
            .arg(url.as_str())
            .arg(path.to_string_lossy())
            .env("GIT_TERMINAL_PROMPT", "0");

        // Temp files must outlive the clone.
        let mut secrets = Vec::new();
        let mut config = Vec::new();

        if let Some(http) = &source.http {
            if !http.username.is_empty() || !http.password.is_empty() {
                let token = STANDARD.encode(format!("{}:{}", http.username, http.password));
                config.push(("http.extraHeader", format!("Authorization: Basic {}", token)));
            }
            if http.allow_insecure {
                config.push(("http.sslVerify", "false".to_string()));
            }
            let bundle = http.certificate_authority.as_deref().filter(|ca| !ca.is_empty());
            if let (Some(bundle), "https") = (bundle, url.scheme()) {
                let file = write_secret(bundle)?;
                config.push(("http.sslCAInfo", file.path().display().to_string()));
                secrets.push(file.into_temp_path());
            }
        }

        if let Some(ssh) = &source.ssh {
            let key = write_secret(&ssh.private_key)?;
            command = command.env(
                "GIT_SSH_COMMAND",
                format!(
                    "ssh -i '{}' -o IdentitiesOnly=yes -o StrictHostKeyChecking=accept-new",
                    key.path().display()
                ),
            );
            secrets.push(key.into_temp_path());
            if let Some(passphrase) = ssh.passphrase.as_deref().filter(|p| !p.is_empty()) {
                let askpass = write_askpass()?;
                command = command
                    .env("SSH_ASKPASS", askpass.display().to_string())
                    .env("SSH_ASKPASS_REQUIRE", "force")
                    .env(PASSPHRASE_ENV, passphrase);
                secrets.push(askpass);
            }
        }

        command = command.envs(config_env(&config));
        if let Some(token) = &self.cancel {
            command = command.cancel_on(token.clone());
        }

        tracing::info!(url = %url, path = %path.display(), branch = ?source.branch, "cloning");
        let execution = self.executor.exec(command).await?;
        let result = run_step("git clone", execution).await;
        drop(secrets);
        result.map(|_| ())
    }
}

/// Express `git -c key=value` pairs as `GIT_CONFIG_*` environment entries.
fn config_env(entries: &[(&str, String)]) -> Vec<(String, String)> {
    if entries.is_empty() {
        return Vec::new();
    }
    let mut env = vec![("GIT_CONFIG_COUNT".to_string(), entries.len().to_string())];
    for (i, (key, value)) in entries.iter().enumerate() {
        env.push((format!("GIT_CONFIG_KEY_{}", i), key.to_string()));
        env.push((format!("GIT_CONFIG_VALUE_{}", i), value.clone()));
    }
    env
}

/// Write `contents` to an owner-only temp file.
fn write_secret(contents: &str) -> io::Result<NamedTempFile> {
    let mut file = tempfile::Builder::new().prefix("fal-git-").tempfile()?;
    file.write_all(contents.as_bytes())?;
    // OpenSSH rejects key files without a final newline.
    if !contents.ends_with('\n') {
        file.write_all(b"\n")?;
    }
    file.flush()?;
    Ok(file)
}

/// Write an `SSH_ASKPASS` helper that answers with `$FAL_GIT_SSH_PASSPHRASE`.
///
/// The passphrase itself stays in the environment, never on disk.
fn write_askpass() -> io::Result<TempPath> {
    let script = write_secret(&format!("#!/bin/sh\nprintf '%s\\n' \"${}\"\n", PASSPHRASE_ENV))?;
    // Closed before use; executing a file open for writing fails.
    let path = script.into_temp_path();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o700))?;
    }
    Ok(path)
}

#[cfg(test)]
#[path = "git_tests.rs"]
mod tests;
