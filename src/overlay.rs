//! Task detail overlay: view, edit, save, cancel and confirmed delete.
//!
//! There is one overlay per board. Opening another task replaces whatever was
//! open, unsaved edits included.

use std::fmt;

use tracing::{debug, info, warn};

use crate::cache::TaskCache;
use crate::client::{ClientError, RemoteTaskClient};
use crate::dialog::{self, ConfirmDialog, PendingConfirm};
use crate::models::{Assignee, Contact, Task, TaskId};
use crate::normalize::normalize_priority;
use crate::view::BoardView;

/// Message shown when a save is attempted without a title.
pub const TITLE_REQUIRED: &str = "Please enter a title.";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OverlayState {
    #[default]
    Closed,
    Viewing(TaskId),
    Editing(TaskId),
    ConfirmingDelete(TaskId),
}

/// Field values on the edit surface.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EditForm {
    pub title: String,
    pub description: String,
    pub due_date: String,
    pub priority: String,
    pub assigned_to: Vec<Assignee>,
}

#[derive(Debug)]
pub enum SaveError {
    Validation(String),
    Remote(ClientError),
}

impl fmt::Display for SaveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveError::Validation(msg) => write!(f, "{msg}"),
            SaveError::Remote(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for SaveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SaveError::Remote(e) => Some(e),
            SaveError::Validation(_) => None,
        }
    }
}

/// Map stored assignees onto known contacts. Entries matching no contact are
/// dropped; each contact is selected at most once.
pub fn rehydrate_assignees(assigned: &[Assignee], contacts: &[Contact]) -> Vec<Assignee> {
    let mut selected: Vec<Assignee> = Vec::new();
    for entry in assigned {
        let found = match entry {
            Assignee::Name(name) => contacts.iter().find(|c| &c.name == name),
            Assignee::Contact(r) => r
                .id
                .as_ref()
                .and_then(|id| contacts.iter().find(|c| &c.id == id))
                .or_else(|| contacts.iter().find(|c| c.name == r.name)),
        };
        let Some(contact) = found else {
            debug!(assignee = entry.name(), "assignee matches no contact, dropped");
            continue;
        };
        let reference = Assignee::Contact(contact.to_ref());
        if !selected.contains(&reference) {
            selected.push(reference);
        }
    }
    selected
}

#[derive(Debug, Default)]
pub struct Overlay {
    state: OverlayState,
    form: Option<EditForm>,
}

impl Overlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &OverlayState {
        &self.state
    }

    pub fn task_id(&self) -> Option<&TaskId> {
        match &self.state {
            OverlayState::Closed => None,
            OverlayState::Viewing(id)
            | OverlayState::Editing(id)
            | OverlayState::ConfirmingDelete(id) => Some(id),
        }
    }

    /// Task the overlay is showing, looked up fresh in the cache.
    pub fn current<'a>(&self, cache: &'a TaskCache) -> Option<&'a Task> {
        self.task_id().and_then(|id| cache.get(id))
    }

    pub fn form(&self) -> Option<&EditForm> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut EditForm> {
        self.form.as_mut()
    }

    /// Show a task. Unknown ids leave the overlay as it was.
    pub fn open(&mut self, cache: &TaskCache, id: &TaskId) -> bool {
        if cache.get(id).is_none() {
            debug!(%id, "open ignored, task not cached");
            return false;
        }
        self.form = None;
        self.state = OverlayState::Viewing(id.clone());
        debug!(%id, "overlay viewing");
        true
    }

    /// Switch from viewing to editing, seeding the form from the cached task.
    pub fn edit(&mut self, cache: &TaskCache, contacts: &[Contact]) -> bool {
        let OverlayState::Viewing(id) = &self.state else {
            return false;
        };
        let Some(task) = cache.get(id) else {
            return false;
        };
        self.form = Some(EditForm {
            title: task.title.clone(),
            description: task.description.clone(),
            due_date: task.due_date.clone(),
            priority: task.priority.as_str().to_string(),
            assigned_to: rehydrate_assignees(&task.assigned_to, contacts),
        });
        debug!(%id, "overlay editing");
        self.state = OverlayState::Editing(id.clone());
        true
    }

    /// Drop unsaved edits and go back to viewing.
    pub fn cancel(&mut self) -> bool {
        let OverlayState::Editing(id) = &self.state else {
            return false;
        };
        self.state = OverlayState::Viewing(id.clone());
        self.form = None;
        true
    }

    /// Persist the edit form.
    ///
    /// An empty title or a failed write leaves the overlay in `Editing`.
    /// Returns `Ok(false)` when there is nothing to save.
    pub async fn save(
        &mut self,
        client: &RemoteTaskClient,
        view: &mut dyn BoardView,
    ) -> Result<bool, SaveError> {
        let OverlayState::Editing(id) = &self.state else {
            return Ok(false);
        };
        let id = id.clone();
        let Some(form) = self.form.clone() else {
            return Ok(false);
        };

        if form.title.trim().is_empty() {
            view.validation(TITLE_REQUIRED);
            return Err(SaveError::Validation(TITLE_REQUIRED.to_string()));
        }
        let existing = client.cache().get(&id).cloned();
        let Some(existing) = existing else {
            debug!(%id, "save ignored, task no longer cached");
            return Ok(false);
        };

        let updated = Task {
            title: form.title.trim().to_string(),
            description: form.description,
            due_date: form.due_date,
            priority: normalize_priority(&form.priority),
            assigned_to: form.assigned_to,
            ..existing
        };

        if let Err(e) = client.save(&updated).await {
            view.alert(&format!("Could not save the task: {e}"));
            return Err(SaveError::Remote(e));
        }

        let mut cache = client.cache();
        let replaced = cache
            .position(&id)
            .is_some_and(|i| cache.replace_at(i, updated));
        if !replaced {
            warn!(%id, "saved task vanished from the cache");
        }
        view.render(cache.as_slice());
        info!(%id, "task edited");
        self.open(&cache, &id);
        Ok(true)
    }

    /// Ask before deleting the task being viewed.
    pub fn request_delete(&mut self, cache: &TaskCache) -> Option<(ConfirmDialog, PendingConfirm)> {
        let OverlayState::Viewing(id) = &self.state else {
            return None;
        };
        let task = cache.get(id)?;
        let message = format!("Delete task \"{}\"? This cannot be undone.", task.title);
        self.state = OverlayState::ConfirmingDelete(id.clone());
        Some(dialog::confirm(message))
    }

    /// Act on the dialog's answer. `true` deletes the task and closes the
    /// overlay; `false` returns to viewing.
    pub async fn resolve_delete(
        &mut self,
        confirmed: bool,
        client: &RemoteTaskClient,
        view: &mut dyn BoardView,
    ) -> Result<bool, ClientError> {
        let OverlayState::ConfirmingDelete(id) = &self.state else {
            return Ok(false);
        };
        let id = id.clone();
        if !confirmed {
            self.state = OverlayState::Viewing(id);
            return Ok(false);
        }

        let task = client.cache().get(&id).cloned();
        let Some(task) = task else {
            debug!(%id, "delete ignored, task no longer cached");
            self.state = OverlayState::Closed;
            view.render(client.cache().as_slice());
            return Ok(false);
        };
        match client.delete_task(&task).await {
            Ok(()) => {
                let mut cache = client.cache();
                cache.remove_id(&id);
                self.state = OverlayState::Closed;
                view.render(cache.as_slice());
                Ok(true)
            }
            Err(e) => {
                view.alert(&format!("Could not delete the task: {e}"));
                self.state = OverlayState::Viewing(id);
                Err(e)
            }
        }
    }

    /// Escape or backdrop click.
    pub fn dismiss(&mut self) {
        self.state = OverlayState::Closed;
        self.form = None;
    }
}
