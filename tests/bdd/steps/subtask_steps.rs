use cucumber::{then, when};
use taskboard::config::TASKS;
use taskboard::models::TaskId;
use taskboard::subtasks;

use crate::BoardWorld;
use crate::steps::common_steps::{begin_action, stored};

/// `done` checks a subtask, `open` clears it.
fn checked_from(word: &str) -> bool {
    match word {
        "done" => true,
        "open" => false,
        other => panic!("expected 'done' or 'open', got {other}"),
    }
}

#[when(expr = "I mark subtask {int} of task {string} as {word}")]
async fn i_mark_subtask(world: &mut BoardWorld, index: usize, id: String, state: String) {
    begin_action(world);
    let client = world.client.as_ref().expect("client not set");
    let result = subtasks::toggle(
        client,
        &mut world.view,
        &TaskId::parse(&id),
        index,
        checked_from(&state),
    )
    .await;
    match result {
        Ok(true) => {}
        Ok(false) => world.last_error = Some("toggle ignored".to_string()),
        Err(e) => world.last_error = Some(e.to_string()),
    }
}

#[then(expr = "subtask {int} of stored record {string} is {word}")]
async fn stored_subtask_is(world: &mut BoardWorld, index: usize, key: String, state: String) {
    let record = stored(world, TASKS, &key).unwrap_or_else(|| panic!("no stored record {key}"));
    let subtask = record["subtasks"]
        .get(index)
        .unwrap_or_else(|| panic!("record {key} has no subtask {index}: {record}"));
    assert_eq!(
        subtask["done"].as_bool(),
        Some(checked_from(&state)),
        "subtask {index} of {key}: {subtask}"
    );
}

#[then(expr = "subtask {int} of task {string} is {word}")]
async fn cached_subtask_is(world: &mut BoardWorld, index: usize, id: String, state: String) {
    let task = crate::steps::task_steps::cached(world, &id);
    let subtask = task
        .subtasks
        .get(index)
        .unwrap_or_else(|| panic!("task {id} has no subtask {index}"));
    assert_eq!(subtask.done, checked_from(&state));
}
