pub mod board;
pub mod create;
pub mod delete;
pub mod edit;
pub mod move_card;
pub mod serve;
pub mod show;
pub mod toggle;

use colored::Colorize;
use taskboard::client::RemoteTaskClient;
use taskboard::config::Config;
use taskboard::models::{Priority, Status, Task, TaskId};
use taskboard::normalize::normalize_status;
use taskboard::view::BoardView;

/// Terminal stand-in for the board renderer.
pub struct TerminalView;

impl BoardView for TerminalView {
    fn render(&mut self, tasks: &[Task]) {
        tracing::debug!(count = tasks.len(), "board re-rendered");
    }

    fn alert(&mut self, message: &str) {
        eprintln!("{}", message.red().bold());
    }

    fn validation(&mut self, message: &str) {
        eprintln!("{}", message.yellow());
    }
}

/// Client with a freshly fetched cache.
pub async fn connect(config: &Config) -> RemoteTaskClient {
    let client = RemoteTaskClient::new(config.clone());
    client.fetch_all().await;
    client
}

/// Id of the cached task matched by local id or store key.
pub fn resolve_id(client: &RemoteTaskClient, reference: &str) -> Result<TaskId, String> {
    client
        .cache()
        .resolve(reference)
        .map(|task| task.id.clone())
        .ok_or_else(|| format!("task not found: {reference}"))
}

/// Parse a column name given on the command line.
pub fn parse_column(raw: &str) -> Result<Status, String> {
    let status = normalize_status(raw);
    if status.is_canonical() {
        Ok(status)
    } else {
        Err(format!(
            "unknown column: {raw}. valid columns: todo, inprogress, await_feedback, done"
        ))
    }
}

/// Format a priority as a colored string.
pub fn format_priority(p: Priority) -> String {
    match p {
        Priority::Urgent => "Urgent".red().bold().to_string(),
        Priority::Medium => "Medium".yellow().to_string(),
        Priority::Low => "Low".green().to_string(),
    }
}

/// Format a status as a colored string.
pub fn format_status(s: &Status) -> String {
    match s {
        Status::Todo => "todo".white().to_string(),
        Status::InProgress => "inprogress".cyan().to_string(),
        Status::AwaitFeedback => "await_feedback".magenta().to_string(),
        Status::Done => "done".bright_black().to_string(),
        Status::Other(other) => other.red().to_string(),
    }
}

pub fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<(), String> {
    let j = serde_json::to_string_pretty(value).map_err(|e| format!("json error: {e}"))?;
    println!("{j}");
    Ok(())
}

/// Detail view of one task.
pub fn print_task(task: &Task) {
    println!("ID:          {}", task.id);
    if let Some(ref key) = task.remote_key {
        println!("Key:         {key}");
    }
    println!("Title:       {}", task.title);
    println!("Status:      {}", format_status(&task.status));
    println!("Priority:    {}", format_priority(task.priority));
    println!("Category:    {}", task.category);
    if !task.due_date.is_empty() {
        println!("Due:         {}", task.due_date);
    }
    if !task.description.is_empty() {
        println!("Description: {}", task.description);
    }
    if !task.assigned_to.is_empty() {
        let names: Vec<&str> = task.assigned_to.iter().map(|a| a.name()).collect();
        println!("Assigned:    {}", names.join(", "));
    }
    if !task.subtasks.is_empty() {
        println!(
            "\nSubtasks ({}/{}):",
            task.completed_subtasks(),
            task.subtasks.len()
        );
        for (i, sub) in task.subtasks.iter().enumerate() {
            let mark = if sub.done { "[x]" } else { "[ ]" };
            println!("  {i}. {mark} {}", sub.title);
        }
    }
}

/// Validate a `YYYY-MM-DD` due date.
pub fn check_due_date(raw: &str) -> Result<(), String> {
    chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| format!("invalid due date: {raw} (expected YYYY-MM-DD)"))
}
