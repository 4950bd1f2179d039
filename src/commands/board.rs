use colored::Colorize;
use taskboard::board::BoardEngine;
use taskboard::config::Config;

use super::{connect, format_priority, print_json};

pub async fn run(config: &Config, json: bool) -> Result<(), String> {
    let client = connect(config).await;
    let cache = client.cache();
    let tasks = cache.as_slice();

    if json {
        return print_json(tasks);
    }

    let engine = BoardEngine::new(tasks);
    for column in engine.layout().columns() {
        println!(
            "{} ({})",
            column.status.label().bold(),
            column.cards.len()
        );
        if column.placeholder {
            println!("  {}", "(no tasks)".bright_black());
            continue;
        }
        for id in &column.cards {
            let Some(task) = cache.get(id) else {
                continue;
            };
            let progress = if task.subtasks.is_empty() {
                String::new()
            } else {
                format!(" [{}/{}]", task.completed_subtasks(), task.subtasks.len())
            };
            let title = if task.title.chars().count() > 48 {
                format!("{}...", task.title.chars().take(45).collect::<String>())
            } else {
                task.title.clone()
            };
            println!(
                "  {:<14} {:<8} {}{}",
                task.id.to_string(),
                format_priority(task.priority),
                title,
                progress
            );
        }
    }

    let off_board = tasks.iter().filter(|t| !t.status.is_canonical()).count();
    if off_board > 0 {
        println!("\n{off_board} task(s) with an unrecognised status are not shown.");
    }
    Ok(())
}
