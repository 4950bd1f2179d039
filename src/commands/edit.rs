use taskboard::config::Config;
use taskboard::models::Assignee;
use taskboard::overlay::{Overlay, SaveError};

use super::{TerminalView, check_due_date, connect, print_json, print_task, resolve_id};

#[allow(clippy::too_many_arguments)]
pub async fn run(
    config: &Config,
    id: &str,
    title: Option<&str>,
    description: Option<&str>,
    due: Option<&str>,
    priority: Option<&str>,
    assignees: &[String],
    json: bool,
) -> Result<(), String> {
    if let Some(due) = due.filter(|d| !d.is_empty()) {
        check_due_date(due)?;
    }

    let client = connect(config).await;
    let contacts = client.fetch_contacts().await;
    let id = resolve_id(&client, id)?;

    let mut overlay = Overlay::new();
    if !overlay.open(&client.cache(), &id) {
        return Err(format!("task not found: {id}"));
    }
    overlay.edit(&client.cache(), &contacts);

    if let Some(form) = overlay.form_mut() {
        if let Some(t) = title {
            form.title = t.to_string();
        }
        if let Some(d) = description {
            form.description = d.to_string();
        }
        if let Some(d) = due {
            form.due_date = d.to_string();
        }
        if let Some(p) = priority {
            form.priority = p.to_string();
        }
        if !assignees.is_empty() {
            form.assigned_to = assignees
                .iter()
                .map(|name| {
                    contacts
                        .iter()
                        .find(|c| &c.name == name)
                        .map(|c| Assignee::Contact(c.to_ref()))
                        .unwrap_or_else(|| Assignee::Name(name.clone()))
                })
                .collect();
        }
    }

    let mut view = TerminalView;
    match overlay.save(&client, &mut view).await {
        Ok(_) => {}
        Err(SaveError::Validation(msg)) => return Err(msg),
        Err(e) => return Err(e.to_string()),
    }

    let cache = client.cache();
    let task = overlay
        .current(&cache)
        .ok_or_else(|| format!("task not found: {id}"))?;
    if json {
        return print_json(task);
    }
    println!("Updated task {id}");
    print_task(task);
    Ok(())
}
