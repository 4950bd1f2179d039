use taskboard::config::Config;
use taskboard::overlay::Overlay;

use super::{connect, print_json, print_task, resolve_id};

pub async fn run(config: &Config, id: &str, json: bool) -> Result<(), String> {
    let client = connect(config).await;
    let id = resolve_id(&client, id)?;

    let mut overlay = Overlay::new();
    if !overlay.open(&client.cache(), &id) {
        return Err(format!("task not found: {id}"));
    }
    let cache = client.cache();
    let task = overlay
        .current(&cache)
        .ok_or_else(|| format!("task not found: {id}"))?;

    if json {
        return print_json(task);
    }
    print_task(task);
    Ok(())
}
