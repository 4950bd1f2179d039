use taskboard::board::{BoardEngine, DropOutcome};
use taskboard::config::Config;
use taskboard::view::BoardView;

use super::{TerminalView, connect, parse_column, print_json, resolve_id};

pub async fn run(config: &Config, id: &str, column: &str, json: bool) -> Result<(), String> {
    let target = parse_column(column)?;
    let client = connect(config).await;
    let id = resolve_id(&client, id)?;

    let mut engine = BoardEngine::new(client.cache().as_slice());
    match engine.move_card(id.clone(), &target, &client).await {
        Ok(DropOutcome::Moved) => {}
        Ok(DropOutcome::Ignored) => return Err(format!("task not found: {id}")),
        Err(e) => {
            TerminalView.alert(&format!("Could not move the task: {e}"));
            return Err(e.to_string());
        }
    }

    let cache = client.cache();
    let task = cache
        .get(&id)
        .ok_or_else(|| format!("task not found: {id}"))?;
    if json {
        print_json(task)
    } else {
        println!("Moved task {id} to {}", target.label());
        Ok(())
    }
}
