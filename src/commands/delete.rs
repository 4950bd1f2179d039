use std::io::{BufRead, Write};

use taskboard::config::Config;
use taskboard::dialog::DialogInput;
use taskboard::overlay::Overlay;

use super::{TerminalView, connect, resolve_id};

/// Read one answer line from stdin; `y`/`yes` confirms.
fn ask(message: &str) -> Result<DialogInput, String> {
    print!("{message} [y/N] ");
    std::io::stdout()
        .flush()
        .map_err(|e| format!("failed to write prompt: {e}"))?;
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|e| format!("failed to read answer: {e}"))?;
    Ok(match line.trim().to_lowercase().as_str() {
        "y" | "yes" => DialogInput::Confirm,
        _ => DialogInput::Cancel,
    })
}

pub async fn run(config: &Config, id: &str, yes: bool) -> Result<(), String> {
    let client = connect(config).await;
    let id = resolve_id(&client, id)?;

    let mut overlay = Overlay::new();
    if !overlay.open(&client.cache(), &id) {
        return Err(format!("task not found: {id}"));
    }
    let (mut dialog, pending) = overlay
        .request_delete(&client.cache())
        .ok_or_else(|| format!("task not found: {id}"))?;

    let input = if yes {
        DialogInput::Confirm
    } else {
        ask(dialog.message())?
    };
    dialog.handle(input);
    let confirmed = pending.resolved().await;

    let deleted = overlay
        .resolve_delete(confirmed, &client, &mut TerminalView)
        .await
        .map_err(|e| e.to_string())?;
    if deleted {
        println!("Deleted task {id}");
    } else {
        println!("Kept task {id}");
    }
    Ok(())
}
