use std::collections::HashSet;

use crate::models::{Status, Task, TaskId};

/// In-memory ordered collection of normalized tasks.
///
/// Holds at most one task per id. Anyone may read it; only the client and the
/// board, overlay and subtask mutators inside this crate change it, and only
/// after the store has accepted the write.
#[derive(Debug, Default, Clone)]
pub struct TaskCache {
    tasks: Vec<Task>,
}

impl TaskCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn as_slice(&self) -> &[Task] {
        &self.tasks
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Task> {
        self.tasks.iter()
    }

    /// Owned copy of the current contents, in order.
    pub fn snapshot(&self) -> Vec<Task> {
        self.tasks.clone()
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    pub fn position(&self, id: &TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| &t.id == id)
    }

    /// Find a task by local id or by store key.
    pub fn resolve(&self, reference: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.is_referenced_by(reference))
    }

    /// Store key already known for the task with this id.
    pub fn key_for(&self, id: &TaskId) -> Option<&str> {
        self.get(id).and_then(|t| t.remote_key.as_deref())
    }

    pub fn with_status<'a>(&'a self, status: &'a Status) -> impl Iterator<Item = &'a Task> + 'a {
        self.tasks.iter().filter(move |t| &t.status == status)
    }

    /// Replace everything with a fresh snapshot. Later records whose id is
    /// already taken fall back to their store key, then to a generated id.
    pub(crate) fn replace_all(&mut self, tasks: Vec<Task>) {
        let mut seen: HashSet<TaskId> = HashSet::new();
        let mut unique = Vec::with_capacity(tasks.len());
        for mut task in tasks {
            if seen.contains(&task.id) {
                task.id = match &task.remote_key {
                    Some(key) if !seen.contains(&TaskId::Text(key.clone())) => {
                        TaskId::Text(key.clone())
                    }
                    _ => TaskId::generate(),
                };
            }
            seen.insert(task.id.clone());
            unique.push(task);
        }
        self.tasks = unique;
    }

    /// Append a confirmed task; an existing task with the same id is replaced
    /// in place instead.
    pub(crate) fn append(&mut self, task: Task) {
        match self.position(&task.id) {
            Some(i) => self.tasks[i] = task,
            None => self.tasks.push(task),
        }
    }

    pub(crate) fn replace_at(&mut self, index: usize, task: Task) -> bool {
        match self.tasks.get_mut(index) {
            Some(slot) => {
                *slot = task;
                true
            }
            None => false,
        }
    }

    /// Replace the task carrying the same id.
    pub(crate) fn replace(&mut self, task: Task) -> bool {
        match self.position(&task.id) {
            Some(i) => self.replace_at(i, task),
            None => false,
        }
    }

    pub(crate) fn set_status(&mut self, id: &TaskId, status: Status) -> bool {
        match self.tasks.iter_mut().find(|t| &t.id == id) {
            Some(task) => {
                task.status = status;
                true
            }
            None => false,
        }
    }

    /// Remove exactly one task matched by id or store key.
    pub(crate) fn remove(&mut self, reference: &str) -> Option<Task> {
        let index = self.tasks.iter().position(|t| t.is_referenced_by(reference))?;
        Some(self.tasks.remove(index))
    }

    /// Remove the task carrying exactly this id.
    pub(crate) fn remove_id(&mut self, id: &TaskId) -> Option<Task> {
        let index = self.position(id)?;
        Some(self.tasks.remove(index))
    }
}

impl<'a> IntoIterator for &'a TaskCache {
    type Item = &'a Task;
    type IntoIter = std::slice::Iter<'a, Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.iter()
    }
}
