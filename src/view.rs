use crate::models::Task;

/// Outbound seam to whatever draws the board and talks to the user.
pub trait BoardView {
    /// Re-render the board from the current cache contents.
    fn render(&mut self, tasks: &[Task]);
    /// Blocking notice, used for write failures.
    fn alert(&mut self, message: &str);
    /// Inline validation message on the edit surface.
    fn validation(&mut self, message: &str);
}

/// A view that only records what it was asked to show.
#[derive(Debug, Default, Clone)]
pub struct RecordingView {
    pub renders: usize,
    pub last_render: Vec<Task>,
    pub alerts: Vec<String>,
    pub validations: Vec<String>,
}

impl BoardView for RecordingView {
    fn render(&mut self, tasks: &[Task]) {
        self.renders += 1;
        self.last_render = tasks.to_vec();
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }

    fn validation(&mut self, message: &str) {
        self.validations.push(message.to_string());
    }
}
