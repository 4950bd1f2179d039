use cucumber::gherkin::Step;
use cucumber::{then, when};
use serde_json::{Value, json};
use taskboard::config::TASKS;
use taskboard::models::{Task, TaskId};

use crate::BoardWorld;
use crate::steps::common_steps::{begin_action, client, stored};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn create(world: &mut BoardWorld, draft: Value) {
    begin_action(world);
    let result = client(world).create(&draft).await;
    match result {
        Ok(task) => world.last_task = Some(task),
        Err(e) => {
            world.last_task = None;
            world.last_error = Some(e.to_string());
        }
    }
}

fn created(world: &BoardWorld) -> &Task {
    world
        .last_task
        .as_ref()
        .unwrap_or_else(|| panic!("no task was created: {:?}", world.last_error))
}

/// Copy of the cached task with this id.
pub fn cached(world: &BoardWorld, id: &str) -> Task {
    client(world)
        .cache()
        .get(&TaskId::parse(id))
        .cloned()
        .unwrap_or_else(|| panic!("task {id} is not cached"))
}

// ---------------------------------------------------------------------------
// When
// ---------------------------------------------------------------------------

#[when(expr = "I create a task titled {string} due {string} in category {string}")]
async fn i_create_a_task(world: &mut BoardWorld, title: String, due: String, category: String) {
    let draft = json!({ "title": title, "dueDate": due, "category": category });
    create(world, draft).await;
}

#[when("I create a task from the draft:")]
async fn i_create_a_task_from_the_draft(world: &mut BoardWorld, step: &Step) {
    let raw = step.docstring.as_deref().expect("step needs a doc string");
    let draft: Value = serde_json::from_str(raw).expect("draft is not valid JSON");
    create(world, draft).await;
}

#[when(expr = "I delete task {string} by reference")]
async fn i_delete_task_by_reference(world: &mut BoardWorld, reference: String) {
    begin_action(world);
    let client = client(world);
    let result = client.delete_by_id(&reference).await;
    match result {
        Ok(true) => {
            client.forget(&reference);
        }
        Ok(false) => world.last_error = Some(format!("nothing matched {reference}")),
        Err(e) => world.last_error = Some(e.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Then
// ---------------------------------------------------------------------------

#[then(expr = "the created task has priority {string} and status {string}")]
async fn created_task_has_priority_and_status(
    world: &mut BoardWorld,
    priority: String,
    status: String,
) {
    let task = created(world);
    assert_eq!(task.priority.as_str(), priority);
    assert_eq!(task.status.as_str(), status);
}

#[then("the created task has no subtasks")]
async fn created_task_has_no_subtasks(world: &mut BoardWorld) {
    assert!(created(world).subtasks.is_empty());
}

#[then(expr = "the created task has id {string}")]
async fn created_task_has_id(world: &mut BoardWorld, id: String) {
    assert_eq!(created(world).id.to_string(), id);
}

#[then("the created task is stored under its remote key")]
async fn created_task_is_stored_under_its_remote_key(world: &mut BoardWorld) {
    let task = created(world).clone();
    let key = task.remote_key.as_deref().expect("created task has no remote key");
    let record = stored(world, TASKS, key).unwrap_or_else(|| panic!("nothing stored under {key}"));
    assert_eq!(record["title"], json!(task.title));
    assert!(
        record.get("remoteKey").is_none(),
        "the key must not be persisted inside the record"
    );
}

#[then(expr = "the cache holds {int} task(s)")]
async fn the_cache_holds_n_tasks(world: &mut BoardWorld, n: usize) {
    let len = client(world).cache().len();
    assert_eq!(len, n);
}

#[then(expr = "task {string} has status {string}")]
async fn task_has_status(world: &mut BoardWorld, id: String, status: String) {
    assert_eq!(cached(world, &id).status.as_str(), status);
}

#[then(expr = "task {string} has priority {string}")]
async fn task_has_priority(world: &mut BoardWorld, id: String, priority: String) {
    assert_eq!(cached(world, &id).priority.as_str(), priority);
}

#[then(expr = "task {string} has title {string}")]
async fn task_has_title(world: &mut BoardWorld, id: String, title: String) {
    assert_eq!(cached(world, &id).title, title);
}

#[then(expr = "task {string} has remote key {string}")]
async fn task_has_remote_key(world: &mut BoardWorld, id: String, key: String) {
    assert_eq!(cached(world, &id).remote_key.as_deref(), Some(key.as_str()));
}

#[then(expr = "task {string} has {int} subtask(s) with {int} done")]
async fn task_has_subtasks(world: &mut BoardWorld, id: String, total: usize, done: usize) {
    let task = cached(world, &id);
    assert_eq!(task.subtasks.len(), total);
    assert_eq!(task.completed_subtasks(), done);
}

#[then(expr = "task {string} is assigned to {string}")]
async fn task_is_assigned_to(world: &mut BoardWorld, id: String, names: String) {
    let task = cached(world, &id);
    let actual: Vec<&str> = task
        .assigned_to
        .iter()
        .map(|a| a.name())
        .collect();
    let expected: Vec<&str> = names.split(", ").filter(|n| !n.is_empty()).collect();
    assert_eq!(actual, expected);
}

#[then(expr = "task {string} is not cached")]
async fn task_is_not_cached(world: &mut BoardWorld, id: String) {
    let cache = client(world).cache();
    assert!(cache.get(&TaskId::parse(&id)).is_none(), "task {id} is still cached");
}

#[then(expr = "no cached task is referenced by {string}")]
async fn no_cached_task_is_referenced_by(world: &mut BoardWorld, reference: String) {
    let cache = client(world).cache();
    assert!(
        cache.resolve(&reference).is_none(),
        "{reference} still resolves to a cached task"
    );
}
