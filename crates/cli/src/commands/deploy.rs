// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `falctl deploy` - clone a repository and deploy its app

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use fal_client::{AuthMode, Client, DeployOptions, DeployStrategy, GitSource, HttpAuth, SshAuth};
use fal_exec::Executor;

use crate::output::{print_json, OutputFormat};

#[derive(Args, Debug)]
pub struct DeployArgs {
    /// Git repository URL (http://, https:// or ssh://)
    #[arg(long)]
    pub repo: String,

    /// App entrypoint inside the repository, e.g. `app.py::MyApp`
    #[arg(long)]
    pub entrypoint: String,

    /// Branch to clone (defaults to the remote HEAD)
    #[arg(long)]
    pub branch: Option<String>,

    /// Deployment strategy: recreate or rolling
    #[arg(long, default_value_t)]
    pub strategy: DeployStrategy,

    /// App auth mode: public or private
    #[arg(long, default_value_t)]
    pub auth: AuthMode,

    /// Username for http(s) basic auth
    #[arg(long)]
    pub git_username: Option<String>,

    /// Password or token for http(s) basic auth
    #[arg(long)]
    pub git_password: Option<String>,

    /// Private key file for ssh remotes (passphrase from $FALCTL_SSH_PASSPHRASE)
    #[arg(long, conflicts_with_all = ["git_username", "git_password"])]
    pub ssh_key_file: Option<PathBuf>,

    /// User for ssh remotes
    #[arg(long, default_value = "git")]
    pub ssh_username: String,

    /// Skip TLS certificate verification
    #[arg(long)]
    pub insecure: bool,

    /// Extra CA bundle (PEM) trusted for https remotes
    #[arg(long)]
    pub ca_file: Option<PathBuf>,
}

impl DeployArgs {
    /// Translate flags into a [`GitSource`], reading key and CA files.
    pub fn git_source(&self) -> Result<GitSource> {
        let mut source = GitSource::new(&self.repo);
        source.branch = self.branch.clone();

        if let Some(path) = &self.ssh_key_file {
            let private_key = std::fs::read_to_string(path)
                .with_context(|| format!("could not read ssh key {}", path.display()))?;
            return Ok(source.ssh(SshAuth {
                username: self.ssh_username.clone(),
                private_key,
                passphrase: crate::env::ssh_passphrase(),
            }));
        }

        let is_http = self.repo.starts_with("http://") || self.repo.starts_with("https://");
        let has_http_flags = self.git_username.is_some()
            || self.git_password.is_some()
            || self.insecure
            || self.ca_file.is_some();
        if is_http || has_http_flags {
            let certificate_authority = match &self.ca_file {
                Some(path) => Some(
                    std::fs::read_to_string(path)
                        .with_context(|| format!("could not read CA bundle {}", path.display()))?,
                ),
                None => None,
            };
            source = source.http(HttpAuth {
                username: self.git_username.clone().unwrap_or_default(),
                password: self.git_password.clone().unwrap_or_default(),
                allow_insecure: self.insecure,
                certificate_authority,
            });
        }
        Ok(source)
    }

    pub fn options(&self) -> DeployOptions {
        DeployOptions::new(&self.entrypoint)
            .strategy(self.strategy)
            .auth_mode(self.auth)
    }
}

pub async fn handle<E: Executor>(
    args: DeployArgs,
    client: &Client<E>,
    format: OutputFormat,
) -> Result<()> {
    let source = args.git_source()?;
    let result = client.deploy(&source, &args.options()).await?;

    match format {
        OutputFormat::Text => {
            println!("function: {}", result.function_name);
            println!("revision: {}", result.revision);
        }
        OutputFormat::Json => print_json(&result)?,
    }
    Ok(())
}

#[cfg(test)]
#[path = "deploy_tests.rs"]
mod tests;
