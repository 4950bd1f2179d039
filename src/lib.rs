/// Drag-and-drop status changes and the column layout.
pub mod board;
/// In-memory task cache.
pub mod cache;
/// Remote task client for the document store.
pub mod client;
/// Store location and server settings.
pub mod config;
/// Yes/no confirmation gate.
pub mod dialog;
/// Tracing subscriber setup.
pub mod logging;
/// Data types: Task, TaskId, Status, Priority, Assignee, Subtask, Contact.
pub mod models;
/// Canonicalisation of loosely shaped task records.
pub mod normalize;
/// Task detail overlay state machine.
pub mod overlay;
/// Local document store server.
pub mod store;
/// Subtask completion toggling.
pub mod subtasks;
/// Renderer and notice seam.
pub mod view;
