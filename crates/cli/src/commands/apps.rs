// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `falctl list|show|delete` - deployed app queries and removal

use anyhow::Result;
use fal_client::{App, Client};
use fal_exec::Executor;

use crate::exit_error::ExitError;
use crate::output::{join_or_dash, print_json, OutputFormat};
use crate::table::{Column, Table};

pub async fn list<E: Executor>(client: &Client<E>, format: OutputFormat) -> Result<()> {
    let apps = client.list().await?;
    match format {
        OutputFormat::Text => {
            if apps.is_empty() {
                println!("No apps found");
            } else {
                app_table(&apps).render(&mut std::io::stdout());
            }
        }
        OutputFormat::Json => print_json(&apps)?,
    }
    Ok(())
}

pub async fn show<E: Executor>(name: &str, client: &Client<E>, format: OutputFormat) -> Result<()> {
    let Some(app) = client.find_app(name).await? else {
        return Err(ExitError::new(1, format!("app '{}' not found", name)).into());
    };
    match format {
        OutputFormat::Text => print!("{}", app_details(&app)),
        OutputFormat::Json => print_json(&app)?,
    }
    Ok(())
}

pub async fn delete<E: Executor>(
    name: &str,
    client: &Client<E>,
    format: OutputFormat,
) -> Result<()> {
    client.delete(name).await?;
    match format {
        OutputFormat::Text => println!("Deleted app {}", name),
        OutputFormat::Json => print_json(&serde_json::json!({ "deleted": name }))?,
    }
    Ok(())
}

fn app_table(apps: &[App]) -> Table {
    let mut table = Table::new(vec![
        Column::left("ALIAS"),
        Column::left("REVISION").with_max(36),
        Column::right("RUNNERS"),
        Column::left("AUTH"),
    ]);
    for app in apps {
        table.row(vec![
            app.alias.clone(),
            app.revision.clone(),
            app.active_runners.to_string(),
            app.auth_mode.to_lowercase(),
        ]);
    }
    table
}

fn app_details(app: &App) -> String {
    let fields = [
        ("alias", app.alias.clone()),
        ("revision", app.revision.clone()),
        ("auth mode", app.auth_mode.clone()),
        ("machine types", join_or_dash(&app.machine_types)),
        ("regions", join_or_dash(&app.valid_regions)),
        ("keep alive", format!("{}s", app.keep_alive)),
        (
            "concurrency",
            format!(
                "min {} / max {} / buffer {}",
                app.min_concurrency, app.max_concurrency, app.concurrency_buffer
            ),
        ),
        ("multiplexing", app.max_multiplexing.to_string()),
        ("active runners", app.active_runners.to_string()),
        ("request timeout", format!("{}s", app.request_timeout)),
        ("startup timeout", format!("{}s", app.startup_timeout)),
    ];
    let width = fields.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    fields
        .iter()
        .map(|(label, value)| format!("{:<width$}  {}\n", format!("{}:", label), value, width = width + 1))
        .collect()
}

#[cfg(test)]
#[path = "apps_tests.rs"]
mod tests;
