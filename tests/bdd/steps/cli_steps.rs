#![allow(deprecated)]
use cucumber::{then, when};
use predicates::prelude::*;
use serde_json::Value;

use crate::BoardWorld;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Run `tb` against the world's store. `<created>` in the argument line is
/// replaced by the id of the task the last `--json create` printed.
async fn run_tb(world: &mut BoardWorld, line: &str, stdin: Option<String>) {
    let port = world
        .server_port
        .expect("store not started, add 'Given a task store is running'");
    let created = world.task_keys.get("created").cloned().unwrap_or_default();
    let args: Vec<String> = line
        .split_whitespace()
        .map(|arg| arg.replace("<created>", &created))
        .collect();

    let cmd_args = args.clone();
    let output = tokio::task::spawn_blocking(move || {
        let mut cmd = assert_cmd::Command::cargo_bin("tb").expect("tb binary not found");
        cmd.env("TASKBOARD_STORE_URL", format!("http://127.0.0.1:{port}"))
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG")
            .args(&cmd_args);
        if let Some(input) = stdin {
            cmd.write_stdin(input);
        }
        cmd.output().expect("failed to run tb")
    })
    .await
    .expect("tb runner panicked");

    world.last_stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    world.last_stderr = String::from_utf8_lossy(&output.stderr).into_owned();
    world.last_exit_code = output.status.code().unwrap_or(-1);

    if world.last_exit_code == 0 && args.first().is_some_and(|a| a == "--json") {
        if let Ok(json) = serde_json::from_str::<Value>(&world.last_stdout) {
            if args.get(1).is_some_and(|a| a == "create") {
                let id = match &json["id"] {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                world.task_keys.insert("created".to_string(), id);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// When
// ---------------------------------------------------------------------------

#[when(expr = "I run tb {string}")]
async fn i_run_tb(world: &mut BoardWorld, line: String) {
    run_tb(world, &line, None).await;
}

#[when(expr = "I run tb {string} answering {string}")]
async fn i_run_tb_answering(world: &mut BoardWorld, line: String, answer: String) {
    run_tb(world, &line, Some(format!("{answer}\n"))).await;
}

// ---------------------------------------------------------------------------
// Then
// ---------------------------------------------------------------------------

#[then("the command succeeds")]
async fn the_command_succeeds(world: &mut BoardWorld) {
    assert_eq!(
        world.last_exit_code, 0,
        "tb failed: stdout={} stderr={}",
        world.last_stdout, world.last_stderr
    );
}

#[then("the command fails")]
async fn the_command_fails(world: &mut BoardWorld) {
    assert_ne!(world.last_exit_code, 0, "tb unexpectedly succeeded");
}

#[then(expr = "the output contains {string}")]
async fn the_output_contains(world: &mut BoardWorld, text: String) {
    let text = text.replace(
        "<created>",
        world.task_keys.get("created").map(String::as_str).unwrap_or(""),
    );
    assert!(
        predicate::str::contains(text.as_str()).eval(world.last_stdout.as_str()),
        "stdout does not contain {text:?}:\n{}",
        world.last_stdout
    );
}

#[then(expr = "the error output contains {string}")]
async fn the_error_output_contains(world: &mut BoardWorld, text: String) {
    assert!(
        predicate::str::contains(text.as_str()).eval(world.last_stderr.as_str()),
        "stderr does not contain {text:?}:\n{}",
        world.last_stderr
    );
}

#[then(expr = "the JSON output has {string} equal to {string}")]
async fn the_json_output_has(world: &mut BoardWorld, field: String, expected: String) {
    let json: Value = serde_json::from_str(&world.last_stdout)
        .unwrap_or_else(|e| panic!("stdout is not JSON ({e}): {}", world.last_stdout));
    let value = &json[&field];
    let actual = match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    assert_eq!(actual, expected, "field {field} in {json}");
}
