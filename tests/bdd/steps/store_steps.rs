use cucumber::gherkin::Step;
use cucumber::{then, when};
use reqwest::Method;
use serde_json::Value;

use crate::BoardWorld;

// ---------------------------------------------------------------------------
// HTTP helpers
// ---------------------------------------------------------------------------

/// Send one request to the in-process store. Stores the status code and the
/// decoded body on the world.
pub async fn http_send(world: &mut BoardWorld, method: Method, path: &str, body: Option<&str>) {
    let port = world
        .server_port
        .expect("store not started, add 'Given a task store is running'");
    let url = format!("http://127.0.0.1:{port}{path}");
    let mut req = reqwest::Client::new().request(method.clone(), &url);
    if let Some(body) = body {
        req = req
            .header("content-type", "application/json")
            .body(body.to_string());
    }
    let resp = req
        .send()
        .await
        .unwrap_or_else(|e| panic!("{method} {url} failed: {e}"));
    world.last_response_status = Some(resp.status().as_u16());
    world.last_response_body = resp
        .text()
        .await
        .unwrap_or_else(|e| panic!("failed to read response body: {e}"));
}

fn last_body(world: &BoardWorld) -> Value {
    serde_json::from_str(&world.last_response_body).unwrap_or_else(|e| {
        panic!(
            "response is not JSON ({e}): {}",
            world.last_response_body
        )
    })
}

fn body_of(step: &Step) -> String {
    step.docstring
        .as_deref()
        .expect("step needs a doc string")
        .trim()
        .to_string()
}

// ---------------------------------------------------------------------------
// When
// ---------------------------------------------------------------------------

#[when(expr = "I GET {string}")]
async fn i_get(world: &mut BoardWorld, path: String) {
    http_send(world, Method::GET, &path, None).await;
}

#[when(expr = "I POST {string} with body:")]
async fn i_post(world: &mut BoardWorld, path: String, step: &Step) {
    http_send(world, Method::POST, &path, Some(&body_of(step))).await;
    if let Some(key) = last_body(world)["name"].as_str() {
        world.task_keys.insert("posted".to_string(), key.to_string());
    }
}

#[when(expr = "I PATCH {string} with body:")]
async fn i_patch(world: &mut BoardWorld, path: String, step: &Step) {
    http_send(world, Method::PATCH, &path, Some(&body_of(step))).await;
}

#[when(expr = "I PUT {string} with body:")]
async fn i_put(world: &mut BoardWorld, path: String, step: &Step) {
    http_send(world, Method::PUT, &path, Some(&body_of(step))).await;
}

#[when(expr = "I DELETE {string}")]
async fn i_delete(world: &mut BoardWorld, path: String) {
    http_send(world, Method::DELETE, &path, None).await;
}

// ---------------------------------------------------------------------------
// Then
// ---------------------------------------------------------------------------

#[then(expr = "the response status is {int}")]
async fn the_response_status_is(world: &mut BoardWorld, status: u16) {
    assert_eq!(
        world.last_response_status,
        Some(status),
        "unexpected status, body: {}",
        world.last_response_body
    );
}

#[then("the response body is null")]
async fn the_response_body_is_null(world: &mut BoardWorld) {
    assert_eq!(last_body(world), Value::Null);
}

#[then(expr = "the response body has {string} equal to {string}")]
async fn the_response_body_has(world: &mut BoardWorld, field: String, expected: String) {
    let body = last_body(world);
    let actual = crate::steps::common_steps::scalar(&body[&field]);
    assert_eq!(actual, expected, "field {field} in {body}");
}

#[then(expr = "the response lists {int} record(s)")]
async fn the_response_lists_n_records(world: &mut BoardWorld, n: usize) {
    let body = last_body(world);
    let records = body.as_object().expect("collection body is not an object");
    assert_eq!(records.len(), n);
}

#[then(expr = "the posted record has {string} equal to {string}")]
async fn the_posted_record_has(world: &mut BoardWorld, field: String, expected: String) {
    let key = world
        .task_keys
        .get("posted")
        .cloned()
        .expect("nothing was posted");
    let record = crate::steps::common_steps::stored(world, taskboard::config::TASKS, &key)
        .unwrap_or_else(|| panic!("no stored record {key}"));
    assert_eq!(crate::steps::common_steps::scalar(&record[&field]), expected);
}
