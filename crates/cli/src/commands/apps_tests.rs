// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use fal_exec::{FakeExecutor, FakeResponse};

const APPS_JSON: &str = r#"[{"alias":"hello","revision":"rev-1","auth_mode":"PUBLIC","active_runners":2,"machine_types":["GPU-A100"],"valid_regions":[]}]"#;

fn sample() -> App {
    App {
        alias: "hello".into(),
        revision: "rev-1".into(),
        auth_mode: "Public".into(),
        active_runners: 2,
        machine_types: vec!["GPU-A100".into()],
        keep_alive: 300,
        ..App::default()
    }
}

fn client(fake: &FakeExecutor) -> (tempfile::TempDir, Client<FakeExecutor>) {
    let dir = tempfile::tempdir().unwrap();
    let client = Client::in_dir("key", dir.path(), fake.clone());
    (dir, client)
}

#[test]
fn table_lists_alias_revision_runners_auth() {
    let mut out = Vec::new();
    app_table(&[sample()]).render(&mut out);
    let text = String::from_utf8(out).unwrap();
    let mut lines = text.lines();
    let header = lines.next().unwrap();
    assert!(header.starts_with("ALIAS"));
    assert!(header.contains("REVISION") && header.ends_with("AUTH"));
    let row = lines.next().unwrap();
    assert!(row.starts_with("hello"));
    assert!(row.ends_with("public"), "{row}");
}

#[test]
fn details_align_labels() {
    let text = app_details(&sample());
    let first = text.lines().next().unwrap();
    assert!(first.starts_with("alias:"));
    assert!(first.ends_with("hello"));
    assert!(text.contains("machine types:"));
    assert!(text.contains("GPU-A100"));
    assert!(text.contains("keep alive:"));
    assert!(text.contains("300s"));
    let value_column = |line: &str| {
        let after = line.find(':').unwrap() + 1;
        after + line[after..].len() - line[after..].trim_start().len()
    };
    let columns: Vec<usize> = text.lines().map(value_column).collect();
    assert!(columns.windows(2).all(|w| w[0] == w[1]), "{text}");
}

#[tokio::test]
async fn show_missing_app_exits_with_code_one() {
    let fake = FakeExecutor::new();
    fake.respond("uv run fal apps list", FakeResponse::success([APPS_JSON]));
    let (_dir, client) = client(&fake);

    let err = show("nope", &client, OutputFormat::Json).await.unwrap_err();
    let exit = err.downcast_ref::<ExitError>().unwrap();
    assert_eq!(exit.code, 1);
    assert_eq!(exit.message, "app 'nope' not found");
}

#[tokio::test]
async fn delete_invokes_fal_apps_delete() {
    let fake = FakeExecutor::new();
    let (_dir, client) = client(&fake);

    delete("hello", &client, OutputFormat::Json).await.unwrap();
    assert!(fake
        .command_lines()
        .iter()
        .any(|line| line == "uv run fal apps delete hello"));
}
