use serde_json::{Map, Value, json};
use taskboard::client::RemoteTaskClient;
use taskboard::config::Config;

use super::{check_due_date, parse_column, print_json};

#[allow(clippy::too_many_arguments)]
pub async fn run(
    config: &Config,
    title: &str,
    description: Option<&str>,
    due: Option<&str>,
    priority: Option<&str>,
    category: Option<&str>,
    assignees: &[String],
    subtasks: &[String],
    status: Option<&str>,
    json: bool,
) -> Result<(), String> {
    if title.trim().is_empty() {
        return Err("title must not be empty".to_string());
    }
    if let Some(due) = due {
        check_due_date(due)?;
    }

    let mut draft = Map::new();
    draft.insert("title".to_string(), json!(title.trim()));
    if let Some(d) = description {
        draft.insert("description".to_string(), json!(d));
    }
    if let Some(d) = due {
        draft.insert("dueDate".to_string(), json!(d));
    }
    if let Some(p) = priority {
        draft.insert("priority".to_string(), json!(p));
    }
    if let Some(c) = category {
        draft.insert("category".to_string(), json!(c));
    }
    if !assignees.is_empty() {
        draft.insert("assignedTo".to_string(), json!(assignees));
    }
    if !subtasks.is_empty() {
        let items: Vec<Value> = subtasks
            .iter()
            .map(|s| json!({ "title": s, "done": false }))
            .collect();
        draft.insert("subtasks".to_string(), Value::Array(items));
    }
    if let Some(s) = status {
        draft.insert("status".to_string(), json!(parse_column(s)?.as_str()));
    }

    let client = RemoteTaskClient::new(config.clone());
    let task = client
        .create(&Value::Object(draft))
        .await
        .map_err(|e| e.to_string())?;

    if json {
        print_json(&task)
    } else {
        println!("Created task {}: {}", task.id, task.title);
        Ok(())
    }
}
