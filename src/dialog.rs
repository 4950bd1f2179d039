//! Yes/no gate shown before destructive actions.
//!
//! [`confirm`] opens a dialog and hands back two halves: the [`ConfirmDialog`]
//! that receives user input, and a [`PendingConfirm`] that resolves once.
//! Dropping an unresolved dialog counts as a cancel.

use tokio::sync::oneshot;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogAction {
    Cancel,
    Confirm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogInput {
    /// Click on the confirm button.
    Confirm,
    /// Click on the cancel button.
    Cancel,
    Backdrop,
    Escape,
    /// Move focus to the other button; focus never leaves the dialog.
    Tab,
    /// Activate whichever button has focus.
    Enter,
}

#[derive(Debug)]
pub struct ConfirmDialog {
    message: String,
    focus: DialogAction,
    responder: Option<oneshot::Sender<bool>>,
}

#[derive(Debug)]
pub struct PendingConfirm {
    outcome: oneshot::Receiver<bool>,
}

/// Open a confirmation dialog with focus on Cancel.
pub fn confirm(message: impl Into<String>) -> (ConfirmDialog, PendingConfirm) {
    let (tx, rx) = oneshot::channel();
    let dialog = ConfirmDialog {
        message: message.into(),
        focus: DialogAction::Cancel,
        responder: Some(tx),
    };
    debug!(message = %dialog.message, "confirmation dialog opened");
    (dialog, PendingConfirm { outcome: rx })
}

impl ConfirmDialog {
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn focus(&self) -> DialogAction {
        self.focus
    }

    /// Still waiting for an answer.
    pub fn is_open(&self) -> bool {
        self.responder.is_some()
    }

    /// Feed one input. Returns the answer if this input settled the dialog;
    /// input after that is ignored.
    pub fn handle(&mut self, input: DialogInput) -> Option<bool> {
        if !self.is_open() {
            return None;
        }
        let answer = match input {
            DialogInput::Confirm => true,
            DialogInput::Cancel | DialogInput::Backdrop | DialogInput::Escape => false,
            DialogInput::Enter => self.focus == DialogAction::Confirm,
            DialogInput::Tab => {
                self.focus = match self.focus {
                    DialogAction::Cancel => DialogAction::Confirm,
                    DialogAction::Confirm => DialogAction::Cancel,
                };
                return None;
            }
        };
        self.resolve(answer);
        Some(answer)
    }

    fn resolve(&mut self, answer: bool) {
        if let Some(tx) = self.responder.take() {
            debug!(answer, "confirmation dialog resolved");
            let _ = tx.send(answer);
        }
    }
}

impl Drop for ConfirmDialog {
    fn drop(&mut self) {
        self.resolve(false);
    }
}

impl PendingConfirm {
    /// Wait for the answer. A dialog torn down without one reads as `false`.
    pub async fn resolved(self) -> bool {
        self.outcome.await.unwrap_or(false)
    }
}
