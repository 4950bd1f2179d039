//! Conversion of loosely shaped records into the canonical [`Task`] shape.
//!
//! Every function here is total: a missing or wrong-shaped field falls back to
//! its default instead of failing. Running a normalized task through
//! [`normalize`] again yields the same task.

use serde_json::{Map, Value};

use crate::models::{
    Assignee, Contact, ContactRef, DEFAULT_CATEGORY, Priority, Status, Subtask, Task, TaskId,
};

/// Map a raw status string onto the board vocabulary.
///
/// Unknown non-empty values come back lower-cased in [`Status::Other`].
pub fn normalize_status(raw: &str) -> Status {
    let lowered = raw.trim().to_lowercase();
    match lowered.as_str() {
        "" | "todo" => return Status::Todo,
        "done" => return Status::Done,
        _ => {}
    }
    let collapsed: String = lowered
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .collect();
    match collapsed.as_str() {
        "inprogress" => Status::InProgress,
        "awaitfeedback" => Status::AwaitFeedback,
        _ => Status::Other(lowered),
    }
}

/// Status from any JSON value; null and missing both mean `todo`.
pub fn normalize_status_value(raw: Option<&Value>) -> Status {
    match raw {
        Some(Value::String(s)) => normalize_status(s),
        Some(Value::Null) | None => Status::Todo,
        Some(other) => normalize_status(&other.to_string()),
    }
}

/// First-letter heuristic: `u…` is Urgent, `l…` is Low, everything else Medium.
pub fn normalize_priority(raw: &str) -> Priority {
    match raw.trim().chars().next().map(|c| c.to_ascii_lowercase()) {
        Some('u') => Priority::Urgent,
        Some('l') => Priority::Low,
        _ => Priority::Medium,
    }
}

fn priority_value(raw: Option<&Value>) -> Priority {
    match raw {
        Some(Value::String(s)) => normalize_priority(s),
        _ => Priority::Medium,
    }
}

fn string_field(obj: &Map<String, Value>, key: &str) -> String {
    match obj.get(key) {
        Some(Value::String(s)) => s.clone(),
        _ => String::new(),
    }
}

fn non_empty_string(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
        _ => None,
    }
}

fn id_value(raw: Option<&Value>) -> Option<TaskId> {
    match raw {
        Some(Value::Number(n)) => n.as_i64().map(TaskId::Num),
        Some(Value::String(s)) if !s.trim().is_empty() => Some(TaskId::Text(s.clone())),
        _ => None,
    }
}

/// Contact ids may be stored as numbers or strings; both become strings.
fn contact_id(raw: Option<&Value>) -> Option<String> {
    match raw {
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

fn assignee(raw: &Value) -> Option<Assignee> {
    match raw {
        Value::String(s) if !s.trim().is_empty() => Some(Assignee::Name(s.clone())),
        Value::Object(obj) => {
            let id = contact_id(obj.get("id"));
            let name = string_field(obj, "name");
            if id.is_none() && name.is_empty() {
                return None;
            }
            Some(Assignee::Contact(ContactRef { id, name }))
        }
        _ => None,
    }
}

/// `assignedTo` is always a sequence, even when the source held one scalar.
pub fn normalize_assignees(raw: Option<&Value>) -> Vec<Assignee> {
    match raw {
        Some(Value::Array(items)) => items.iter().filter_map(assignee).collect(),
        Some(single) => assignee(single).into_iter().collect(),
        None => Vec::new(),
    }
}

fn flag(raw: Option<&Value>) -> Option<bool> {
    match raw {
        Some(Value::Bool(b)) => Some(*b),
        Some(Value::Number(n)) => Some(n.as_f64().is_some_and(|f| f != 0.0)),
        Some(Value::String(s)) => Some(s.eq_ignore_ascii_case("true")),
        _ => None,
    }
}

fn subtask(raw: &Value) -> Option<Subtask> {
    match raw {
        Value::String(s) => Some(Subtask {
            title: s.clone(),
            done: false,
        }),
        Value::Object(obj) => {
            let title = match obj.get("title").or_else(|| obj.get("text")) {
                Some(Value::String(s)) => s.clone(),
                _ => String::new(),
            };
            let done = flag(obj.get("done"))
                .or_else(|| flag(obj.get("checked")))
                .unwrap_or(false);
            Some(Subtask { title, done })
        }
        _ => None,
    }
}

/// Subtasks keep their order; entries that are neither strings nor objects
/// are dropped. A keyed map whose keys are all indexes is read in numeric
/// order, any other map in key order.
pub fn normalize_subtasks(raw: Option<&Value>) -> Vec<Subtask> {
    match raw {
        Some(Value::Array(items)) => items.iter().filter_map(subtask).collect(),
        Some(Value::Object(keyed)) => {
            let indexed: Option<Vec<(u64, &Value)>> = keyed
                .iter()
                .map(|(k, v)| k.parse().ok().map(|n| (n, v)))
                .collect();
            match indexed {
                Some(mut indexed) => {
                    indexed.sort_by_key(|(n, _)| *n);
                    indexed.into_iter().filter_map(|(_, v)| subtask(v)).collect()
                }
                None => keyed.values().filter_map(subtask).collect(),
            }
        }
        _ => Vec::new(),
    }
}

/// Normalize a single task record.
pub fn normalize(raw: &Value) -> Task {
    let empty = Map::new();
    let obj = raw.as_object().unwrap_or(&empty);

    let remote_key = non_empty_string(obj.get("remoteKey"));
    let id = id_value(obj.get("id"))
        .or_else(|| remote_key.clone().map(TaskId::Text))
        .unwrap_or_else(TaskId::generate);

    Task {
        id,
        remote_key,
        title: string_field(obj, "title"),
        description: string_field(obj, "description"),
        due_date: string_field(obj, "dueDate"),
        priority: priority_value(obj.get("priority")),
        category: non_empty_string(obj.get("category"))
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
        assigned_to: normalize_assignees(obj.get("assignedTo")),
        subtasks: normalize_subtasks(obj.get("subtasks")),
        status: normalize_status_value(obj.get("status")),
    }
}

/// Normalize a record that the store returned under `key`.
pub fn normalize_keyed(key: &str, raw: &Value) -> Task {
    let mut record = match raw {
        Value::Object(obj) => obj.clone(),
        _ => Map::new(),
    };
    record.insert("remoteKey".to_string(), Value::String(key.to_string()));
    normalize(&Value::Object(record))
}

/// Normalize a full collection snapshot: an object keyed by store key, an
/// array, or nothing at all.
pub fn normalize_snapshot(body: &Value) -> Vec<Task> {
    match body {
        Value::Object(keyed) => keyed
            .iter()
            .filter(|(_, v)| v.is_object())
            .map(|(key, v)| normalize_keyed(key, v))
            .collect(),
        Value::Array(items) => items.iter().filter(|v| v.is_object()).map(normalize).collect(),
        _ => Vec::new(),
    }
}

fn contact(key: Option<&str>, raw: &Value) -> Option<Contact> {
    let obj = raw.as_object()?;
    let name = non_empty_string(obj.get("name"))?;
    let id = contact_id(obj.get("id")).or_else(|| key.map(str::to_string))?;
    Some(Contact {
        id,
        name,
        email: non_empty_string(obj.get("email")),
        phone: non_empty_string(obj.get("phone")),
    })
}

/// Normalize the contact directory; nameless entries are skipped.
pub fn normalize_contacts(body: &Value) -> Vec<Contact> {
    match body {
        Value::Object(keyed) => keyed
            .iter()
            .filter_map(|(key, v)| contact(Some(key), v))
            .collect(),
        Value::Array(items) => items.iter().filter_map(|v| contact(None, v)).collect(),
        _ => Vec::new(),
    }
}
