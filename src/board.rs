//! Drag-and-drop status changes and the column projection they act on.

use tracing::{debug, error, info};

use crate::client::{ClientError, RemoteTaskClient};
use crate::models::{COLUMN_STATUSES, Status, Task, TaskId};

/// One board column. `placeholder` is set whenever the column has no cards.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub status: Status,
    pub cards: Vec<TaskId>,
    pub placeholder: bool,
}

/// Visual placement of cards into the four status columns.
///
/// Built from task statuses, but re-parented directly on drop so a card moves
/// before the store confirms the change.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardLayout {
    columns: Vec<Column>,
}

impl Default for BoardLayout {
    fn default() -> Self {
        let columns = COLUMN_STATUSES
            .iter()
            .map(|status| Column {
                status: status.clone(),
                cards: Vec::new(),
                placeholder: true,
            })
            .collect();
        BoardLayout { columns }
    }
}

impl BoardLayout {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let mut layout = Self::default();
        layout.rebuild(tasks);
        layout
    }

    /// Re-derive every column from task statuses. Tasks with a status outside
    /// the board vocabulary land in no column.
    pub fn rebuild(&mut self, tasks: &[Task]) {
        for column in &mut self.columns {
            column.cards = tasks
                .iter()
                .filter(|t| t.status == column.status)
                .map(|t| t.id.clone())
                .collect();
        }
        self.settle();
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, status: &Status) -> Option<&Column> {
        self.columns.iter().find(|c| &c.status == status)
    }

    /// Column a card currently sits in.
    pub fn column_of(&self, id: &TaskId) -> Option<&Status> {
        self.columns
            .iter()
            .find(|c| c.cards.contains(id))
            .map(|c| &c.status)
    }

    /// Re-parent a card under `target`, appending it last.
    fn move_card(&mut self, id: &TaskId, target: &Status) -> bool {
        if self.column(target).is_none() {
            return false;
        }
        for column in &mut self.columns {
            column.cards.retain(|card| card != id);
        }
        if let Some(column) = self.columns.iter_mut().find(|c| &c.status == target) {
            column.cards.push(id.clone());
        }
        self.settle();
        true
    }

    /// Placeholder check, run after every change to the columns.
    fn settle(&mut self) {
        for column in &mut self.columns {
            column.placeholder = column.cards.is_empty();
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// The card moved and the store accepted the new status.
    Moved,
    /// Nothing was being dragged, the target is not a column, or the card is
    /// no longer cached.
    Ignored,
}

/// Turns drag gestures into status updates.
#[derive(Debug, Clone, Default)]
pub struct BoardEngine {
    layout: BoardLayout,
    dragging: Option<TaskId>,
}

impl BoardEngine {
    pub fn new(tasks: &[Task]) -> Self {
        BoardEngine {
            layout: BoardLayout::from_tasks(tasks),
            dragging: None,
        }
    }

    pub fn layout(&self) -> &BoardLayout {
        &self.layout
    }

    /// Re-render the columns from the cache.
    pub fn refresh(&mut self, tasks: &[Task]) {
        self.layout.rebuild(tasks);
    }

    pub fn drag_start(&mut self, id: TaskId) {
        debug!(%id, "drag start");
        self.dragging = Some(id);
    }

    /// Drag released outside any column.
    pub fn drag_end(&mut self) {
        self.dragging = None;
    }

    pub fn dragging(&self) -> Option<&TaskId> {
        self.dragging.as_ref()
    }

    /// Drop the dragged card on the `target` column.
    ///
    /// The card is re-parented immediately. If the status write then fails the
    /// card stays where it was dropped and the error is returned for the
    /// caller to report.
    pub async fn drop_on(
        &mut self,
        target: &Status,
        client: &RemoteTaskClient,
    ) -> Result<DropOutcome, ClientError> {
        let Some(id) = self.dragging.take() else {
            return Ok(DropOutcome::Ignored);
        };
        if !target.is_canonical() || client.cache().get(&id).is_none() {
            debug!(%id, %target, "drop ignored");
            return Ok(DropOutcome::Ignored);
        }

        self.layout.move_card(&id, target);
        match client.update_status(&id, target.clone()).await {
            Ok(true) => {
                info!(%id, %target, "card moved");
                Ok(DropOutcome::Moved)
            }
            Ok(false) => Ok(DropOutcome::Ignored),
            Err(e) => {
                error!(error = %e, %id, %target, "card moved but status was not saved");
                Err(e)
            }
        }
    }

    /// Drag `id` and drop it on `target` in one step.
    pub async fn move_card(
        &mut self,
        id: TaskId,
        target: &Status,
        client: &RemoteTaskClient,
    ) -> Result<DropOutcome, ClientError> {
        self.drag_start(id);
        self.drop_on(target, client).await
    }
}
