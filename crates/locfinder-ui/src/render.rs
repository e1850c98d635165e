use crate::alert::Alert;
use crate::state::AppState;

/// The external collaborator that draws the map, table, and panel.
pub trait Renderer {
    /// Called after every handled command with the resulting state.
    fn render(&mut self, state: &AppState);

    /// Show a user-visible alert.
    fn alert(&mut self, alert: &Alert);
}

/// Keeps every alert and counts renders instead of drawing anything.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub alerts: Vec<Alert>,
    pub renders: usize,
}

impl Renderer for RecordingRenderer {
    fn render(&mut self, _state: &AppState) {
        self.renders += 1;
    }

    fn alert(&mut self, alert: &Alert) {
        self.alerts.push(alert.clone());
    }
}
