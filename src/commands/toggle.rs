use taskboard::config::Config;
use taskboard::subtasks;

use super::{TerminalView, connect, print_json, resolve_id};

pub async fn run(
    config: &Config,
    id: &str,
    index: usize,
    checked: bool,
    json: bool,
) -> Result<(), String> {
    let client = connect(config).await;
    let id = resolve_id(&client, id)?;

    let applied = subtasks::toggle(&client, &mut TerminalView, &id, index, checked)
        .await
        .map_err(|e| e.to_string())?;
    if !applied {
        return Err(format!("no subtask {index} on task {id}"));
    }

    let cache = client.cache();
    let task = cache
        .get(&id)
        .ok_or_else(|| format!("task not found: {id}"))?;
    if json {
        return print_json(task);
    }
    let sub = &task.subtasks[index];
    let mark = if sub.done { "done" } else { "open" };
    println!("Subtask {index} of task {id} is now {mark}: {}", sub.title);
    Ok(())
}
