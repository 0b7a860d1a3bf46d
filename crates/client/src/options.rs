// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Deploy options passed through to `fal deploy`

use crate::error::ClientError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How new revisions replace running ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeployStrategy {
    Recreate,
    #[default]
    Rolling,
}

impl DeployStrategy {
    pub const VALUES: &'static [&'static str] = &["recreate", "rolling"];

    pub fn as_str(&self) -> &'static str {
        match self {
            DeployStrategy::Recreate => "recreate",
            DeployStrategy::Rolling => "rolling",
        }
    }
}

impl FromStr for DeployStrategy {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "recreate" => Ok(DeployStrategy::Recreate),
            "rolling" => Ok(DeployStrategy::Rolling),
            _ => Err(ClientError::InvalidChoice {
                field: "strategy",
                value: s.to_string(),
                allowed: Self::VALUES,
            }),
        }
    }
}

impl fmt::Display for DeployStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who may call the deployed app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    Public,
    #[default]
    Private,
}

impl AuthMode {
    pub const VALUES: &'static [&'static str] = &["public", "private"];

    pub fn as_str(&self) -> &'static str {
        match self {
            AuthMode::Public => "public",
            AuthMode::Private => "private",
        }
    }
}

impl FromStr for AuthMode {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" => Ok(AuthMode::Public),
            "private" => Ok(AuthMode::Private),
            _ => Err(ClientError::InvalidChoice {
                field: "auth_mode",
                value: s.to_string(),
                allowed: Self::VALUES,
            }),
        }
    }
}

impl fmt::Display for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployOptions {
    /// Path of the app file inside the repository, e.g. `src/app.py::App`.
    pub entrypoint: String,
    pub strategy: DeployStrategy,
    pub auth_mode: AuthMode,
}

impl DeployOptions {
    pub fn new(entrypoint: impl Into<String>) -> Self {
        Self {
            entrypoint: entrypoint.into(),
            strategy: DeployStrategy::default(),
            auth_mode: AuthMode::default(),
        }
    }

    pub fn strategy(mut self, strategy: DeployStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn auth_mode(mut self, auth_mode: AuthMode) -> Self {
        self.auth_mode = auth_mode;
        self
    }

    /// Arguments following `fal deploy`.
    pub(crate) fn deploy_args(&self) -> Vec<String> {
        vec![
            format!("--strategy={}", self.strategy),
            format!("--auth={}", self.auth_mode),
            self.entrypoint.clone(),
        ]
    }
}

#[cfg(test)]
#[path = "options_tests.rs"]
mod tests;
