// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! falctl - deploy and manage fal apps from git repositories

mod commands;
mod env;
mod exit_error;
mod logging;
mod output;
mod table;

use output::OutputFormat;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use commands::{apps, deploy};
use fal_client::Client;
use fal_exec::{ProcessExecutor, TracedExecutor};
use std::path::PathBuf;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[derive(Parser)]
#[command(
    name = "falctl",
    version,
    about = "Deploy and manage fal apps from git repositories"
)]
struct Cli {
    /// fal API key (defaults to $FAL_KEY)
    #[arg(long, global = true)]
    key: Option<String>,

    /// Directory for clones and uv projects (defaults to a fresh temp dir)
    #[arg(long, global = true)]
    workdir: Option<PathBuf>,

    /// Kill running commands after this many seconds
    #[arg(long, global = true, value_name = "SECS")]
    timeout: Option<u64>,

    /// Output format
    #[arg(
        short = 'o',
        long = "output",
        value_enum,
        default_value_t,
        global = true
    )]
    output: OutputFormat,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Clone a repository and deploy its app
    Deploy(deploy::DeployArgs),
    /// List deployed apps
    List,
    /// Show one deployed app
    Show {
        /// App alias
        name: String,
    },
    /// Delete a deployed app
    Delete {
        /// App alias
        name: String,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        let code = e
            .downcast_ref::<exit_error::ExitError>()
            .map_or(1, |c| c.code);
        let msg = format_error(&e);
        if !msg.is_empty() {
            eprintln!("Error: {}", msg);
        }
        std::process::exit(code);
    }
}

/// Format an anyhow error, deduplicating the chain.
///
/// If the top-level Display already contains the source error text, the
/// "Caused by" chain is skipped. Otherwise the full chain is rendered so
/// context isn't lost.
fn format_error(err: &anyhow::Error) -> String {
    let top = err.to_string();

    let chain_redundant = err
        .chain()
        .skip(1)
        .all(|cause| top.contains(&cause.to_string()));

    if chain_redundant {
        return top;
    }

    let mut buf = top;
    for (i, cause) in err.chain().skip(1).enumerate() {
        buf.push_str(&format!("\n\nCaused by:\n    {}: {}", i, cause));
    }
    buf
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let format = cli.output;

    let command = match cli.command {
        Some(cmd) => cmd,
        None => {
            // No subcommand provided: print help and exit 0
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
            return Ok(());
        }
    };

    let _log_guard = logging::setup_logging()?;

    let key = cli
        .key
        .or_else(env::fal_key)
        .context("no fal API key: pass --key or set FAL_KEY")?;

    let cancel = CancellationToken::new();
    watch_for_cancel(cancel.clone(), cli.timeout.map(Duration::from_secs));

    let executor = TracedExecutor::new(ProcessExecutor::new());
    let client = match cli.workdir {
        Some(dir) => {
            tokio::fs::create_dir_all(&dir)
                .await
                .with_context(|| format!("could not create {}", dir.display()))?;
            Client::in_dir(key, dir, executor)
        }
        None => Client::with_temp(key, executor)?,
    };
    let client = client.with_cancel(cancel);
    tracing::debug!(workdir = %client.directory().display(), "client ready");

    match command {
        Commands::Deploy(args) => deploy::handle(args, &client, format).await?,
        Commands::List => apps::list(&client, format).await?,
        Commands::Show { name } => apps::show(&name, &client, format).await?,
        Commands::Delete { name } => apps::delete(&name, &client, format).await?,
    }

    Ok(())
}

/// Cancel `token` on Ctrl-C or once `timeout` elapses.
fn watch_for_cancel(token: CancellationToken, timeout: Option<Duration>) {
    tokio::spawn(async move {
        let deadline = async {
            match timeout {
                Some(limit) => tokio::time::sleep(limit).await,
                None => std::future::pending().await,
            }
        };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => tracing::warn!("interrupted, stopping"),
            () = deadline => tracing::warn!(?timeout, "timed out, stopping"),
        }
        token.cancel();
    });
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
