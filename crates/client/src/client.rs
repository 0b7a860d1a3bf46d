// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Deploy, list and delete operations against the fal platform

use crate::app::App;
use crate::error::ClientError;
use crate::git::{GitClient, GitSource};
use crate::options::DeployOptions;
use crate::repo::parse_git_url;
use crate::result::{parse_deploy_result, DeployResult};
use crate::step::{run_step, wait_for};
use crate::uv::Uv;
use fal_exec::Executor;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

/// Environment variable carrying the fal API key into `fal` commands.
pub const FAL_KEY_ENV: &str = "FAL_KEY";

/// The Python package providing the `fal` CLI.
const FAL_PACKAGE: &str = "fal";

/// Client for one fal account.
///
/// All work happens under a single directory: a fresh `fal-*` temp dir
/// (removed on drop) or a caller-provided one.
pub struct Client<E> {
    key: String,
    dir: PathBuf,
    _temp: Option<TempDir>,
    executor: E,
    cancel: Option<CancellationToken>,
}

impl<E: Executor> Client<E> {
    /// Work in a new temporary directory.
    pub fn with_temp(key: impl Into<String>, executor: E) -> Result<Self, ClientError> {
        let temp = tempfile::Builder::new().prefix("fal-").tempdir()?;
        tracing::debug!(dir = %temp.path().display(), "created work directory");
        Ok(Self {
            key: key.into(),
            dir: temp.path().to_path_buf(),
            _temp: Some(temp),
            executor,
            cancel: None,
        })
    }

    /// Work in `dir`, which is left in place afterwards.
    pub fn in_dir(key: impl Into<String>, dir: impl Into<PathBuf>, executor: E) -> Self {
        Self {
            key: key.into(),
            dir: dir.into(),
            _temp: None,
            executor,
            cancel: None,
        }
    }

    /// Kill any running command when `token` is cancelled.
    pub fn with_cancel(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn directory(&self) -> &Path {
        &self.dir
    }

    fn shared_env(&self) -> [(&'static str, String); 1] {
        [(FAL_KEY_ENV, self.key.clone())]
    }

    fn uv(&self, path: &Path) -> Uv<E> {
        let uv = Uv::new(self.executor.clone(), path);
        match &self.cancel {
            Some(token) => uv.with_cancel(token.clone()),
            None => uv,
        }
    }

    /// Clone `source`, sync its environment and run `fal deploy`.
    ///
    /// Fails with [`ClientError::DeployFailed`] when the output carries no
    /// function/revision marker.
    pub async fn deploy(
        &self,
        source: &GitSource,
        options: &DeployOptions,
    ) -> Result<DeployResult, ClientError> {
        source.validate()?;
        let url = source.repository_url()?;
        let repo = parse_git_url(url.as_str()).ok_or_else(|| ClientError::InvalidRepositoryUrl {
            url: source.url.clone(),
        })?;
        let path = self.dir.join(&repo.repo);

        let git = GitClient::new(self.executor.clone());
        let git = match &self.cancel {
            Some(token) => git.with_cancel(token.clone()),
            None => git,
        };
        git.clone_repo(source, &path).await?;

        let uv = self.uv(&path);
        run_step("uv sync", uv.sync().await?).await?;

        let args = ["fal".to_string(), "deploy".to_string()]
            .into_iter()
            .chain(options.deploy_args());
        let mut execution = uv.run(self.shared_env(), args).await?;
        let result = parse_deploy_result(&mut execution.lines).await;
        let exit = wait_for("fal deploy", execution.process, || result.output.clone()).await?;

        if result.is_empty() {
            tracing::warn!(%exit, "deploy produced no revision");
            return Err(ClientError::DeployFailed {
                output: result.output,
            });
        }
        if !exit.success() {
            tracing::warn!(%exit, function = %result.function_name, "deploy reported a revision but exited unsuccessfully");
        }
        tracing::info!(function = %result.function_name, revision = %result.revision, "deployed");
        Ok(result)
    }

    /// Prepare a throwaway project with the fal CLI installed.
    async fn ensure_fal_env(&self) -> Result<Uv<E>, ClientError> {
        let uv = self.uv(&self.dir);
        if !tokio::fs::try_exists(self.dir.join("pyproject.toml")).await? {
            run_step("uv init", uv.init().await?).await?;
        }
        run_step("uv add fal", uv.add([FAL_PACKAGE]).await?).await?;
        Ok(uv)
    }

    pub async fn list(&self) -> Result<Vec<App>, ClientError> {
        let uv = self.ensure_fal_env().await?;
        let execution = uv
            .run(self.shared_env(), ["fal", "apps", "list", "--output", "json"])
            .await?;
        let done = run_step("fal apps list", execution).await?;
        parse_app_list(&done.transcript())
    }

    /// Find an app by alias. Its auth mode is normalized to lowercase.
    pub async fn find_app(&self, alias: &str) -> Result<Option<App>, ClientError> {
        let app = self.list().await?.into_iter().find(|app| app.alias == alias);
        Ok(app.map(|mut app| {
            app.auth_mode = app.auth_mode.to_lowercase();
            app
        }))
    }

    pub async fn delete(&self, app: &str) -> Result<(), ClientError> {
        let uv = self.ensure_fal_env().await?;
        let execution = uv
            .run(self.shared_env(), ["fal", "apps", "delete", app])
            .await?;
        run_step("fal apps delete", execution).await?;
        tracing::info!(app, "deleted");
        Ok(())
    }
}

/// Decode the JSON array in `output`, skipping any tool chatter before it.
fn parse_app_list(output: &str) -> Result<Vec<App>, ClientError> {
    let start = output
        .split('\n')
        .scan(0, |offset, line| {
            let at = *offset;
            *offset += line.len() + 1;
            Some((at, line))
        })
        .find(|(_, line)| line.trim_start().starts_with('['))
        .map_or(0, |(at, _)| at);

    let mut values = serde_json::Deserializer::from_str(&output[start..]).into_iter::<Vec<App>>();
    match values.next() {
        Some(apps) => apps.map_err(ClientError::AppList),
        None => Ok(Vec::new()),
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
