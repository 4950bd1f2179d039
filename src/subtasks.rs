use tracing::{debug, info, warn};

use crate::client::{ClientError, RemoteTaskClient};
use crate::models::TaskId;
use crate::view::BoardView;

/// Set the completion flag of one subtask and persist the whole task.
///
/// Unknown tasks and out-of-range indexes are no-ops (`Ok(false)`). A failed
/// write is logged and returned but not alerted; toggling again retries it.
pub async fn toggle(
    client: &RemoteTaskClient,
    view: &mut dyn BoardView,
    task_id: &TaskId,
    index: usize,
    checked: bool,
) -> Result<bool, ClientError> {
    let cached = client.cache().get(task_id).cloned();
    let Some(mut updated) = cached else {
        debug!(%task_id, "toggle for unknown task ignored");
        return Ok(false);
    };
    if index >= updated.subtasks.len() {
        debug!(%task_id, index, "toggle for unknown subtask ignored");
        return Ok(false);
    }

    updated.subtasks[index].done = checked;

    if let Err(e) = client.save(&updated).await {
        warn!(error = %e, %task_id, index, "subtask toggle was not saved");
        return Err(e);
    }
    let mut cache = client.cache();
    cache.replace(updated);
    info!(%task_id, index, checked, "subtask toggled");
    view.render(cache.as_slice());
    Ok(true)
}
