use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::normalize::{normalize_priority, normalize_status};

/// Local task identifier. Records from the store carry either a number or a
/// string; both forms address the same task when their text matches.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskId {
    Num(i64),
    Text(String),
}

impl TaskId {
    /// Generate a short local id for a record that has neither an id nor a key.
    pub fn generate() -> Self {
        let uuid = uuid::Uuid::new_v4();
        let hash = &format!("{:x}", uuid.as_u128())[..8];
        TaskId::Text(format!("t-{hash}"))
    }

    /// Parse a reference coming from the UI or command line. Only canonical
    /// integers become `Num`, so keys such as `-0042` keep their text.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        match raw.parse::<i64>() {
            Ok(n) if n.to_string() == raw => TaskId::Num(n),
            _ => TaskId::Text(raw.to_string()),
        }
    }

    /// True when `reference` is this id's textual form.
    pub fn matches(&self, reference: &str) -> bool {
        match self {
            TaskId::Num(n) => n.to_string() == reference.trim(),
            TaskId::Text(s) => s == reference,
        }
    }
}

impl PartialEq for TaskId {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}

impl Eq for TaskId {}

impl Hash for TaskId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskId::Num(n) => write!(f, "{n}"),
            TaskId::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for TaskId {
    fn from(n: i64) -> Self {
        TaskId::Num(n)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        TaskId::parse(s)
    }
}

/// Board status. The four canonical tokens map to columns; anything else the
/// store hands back is kept lower-cased in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Status {
    Todo,
    InProgress,
    AwaitFeedback,
    Done,
    Other(String),
}

/// Board columns, left to right.
pub const COLUMN_STATUSES: [Status; 4] = [
    Status::Todo,
    Status::InProgress,
    Status::AwaitFeedback,
    Status::Done,
];

impl Status {
    pub fn as_str(&self) -> &str {
        match self {
            Status::Todo => "todo",
            Status::InProgress => "inprogress",
            Status::AwaitFeedback => "await_feedback",
            Status::Done => "done",
            Status::Other(s) => s,
        }
    }

    pub fn is_canonical(&self) -> bool {
        !matches!(self, Status::Other(_))
    }

    /// Column heading shown by renderers.
    pub fn label(&self) -> &str {
        match self {
            Status::Todo => "To do",
            Status::InProgress => "In progress",
            Status::AwaitFeedback => "Await feedback",
            Status::Done => "Done",
            Status::Other(s) => s,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<String> for Status {
    fn from(s: String) -> Self {
        normalize_status(&s)
    }
}

impl From<Status> for String {
    fn from(s: Status) -> Self {
        s.as_str().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Priority {
    Urgent,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Urgent => "Urgent",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<String> for Priority {
    fn from(s: String) -> Self {
        normalize_priority(&s)
    }
}

impl From<Priority> for String {
    fn from(p: Priority) -> Self {
        p.as_str().to_string()
    }
}

/// Category applied when a record names none.
pub const DEFAULT_CATEGORY: &str = "User Story";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
}

/// An entry of `assignedTo`: either a bare name or a contact reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Assignee {
    Name(String),
    Contact(ContactRef),
}

impl Assignee {
    pub fn name(&self) -> &str {
        match self {
            Assignee::Name(n) => n,
            Assignee::Contact(c) => &c.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    pub title: String,
    pub done: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_key: Option<String>,
    pub title: String,
    pub description: String,
    pub due_date: String,
    pub priority: Priority,
    pub category: String,
    pub assigned_to: Vec<Assignee>,
    pub subtasks: Vec<Subtask>,
    pub status: Status,
}

impl Task {
    /// True when `reference` names this task by local id or by store key.
    pub fn is_referenced_by(&self, reference: &str) -> bool {
        self.id.matches(reference) || self.remote_key.as_deref() == Some(reference)
    }

    /// Body written to the store on a full replace: every field but the key,
    /// which is already the record's path.
    pub fn to_record(&self) -> Result<serde_json::Value, serde_json::Error> {
        let mut value = serde_json::to_value(self)?;
        if let Some(obj) = value.as_object_mut() {
            obj.remove("remoteKey");
        }
        Ok(value)
    }

    /// Body for a create request: no id fields, so the store assigns a key.
    pub fn to_draft_record(&self) -> Result<serde_json::Value, serde_json::Error> {
        let mut value = self.to_record()?;
        if let Some(obj) = value.as_object_mut() {
            obj.remove("id");
        }
        Ok(value)
    }

    pub fn completed_subtasks(&self) -> usize {
        self.subtasks.iter().filter(|s| s.done).count()
    }
}

/// Entry of the contact directory that assignees resolve against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl Contact {
    pub fn to_ref(&self) -> ContactRef {
        ContactRef {
            id: Some(self.id.clone()),
            name: self.name.clone(),
        }
    }
}
