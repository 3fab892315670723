use std::time::Instant;

/// Aktuell vy i applikationen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Dashboard,
    Members,
    Attendance,
    Archive,
    Settings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusType {
    Success,
    Error,
    Info,
}

/// Statusmeddelande i nederkanten, försvinner av sig självt
#[derive(Debug)]
pub struct StatusMessage {
    pub text: String,
    pub status_type: StatusType,
    created: Instant,
}

/// Centraliserat applikationstillstånd
#[derive(Debug, Default)]
pub struct AppState {
    /// Aktuell vy
    pub current_view: View,

    /// Statusmeddelande
    pub status_message: Option<StatusMessage>,

    /// Dark mode
    pub dark_mode: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Navigera till vy
    pub fn navigate(&mut self, view: View) {
        self.current_view = view;
    }

    pub fn set_status(&mut self, text: impl Into<String>, status_type: StatusType) {
        self.status_message = Some(StatusMessage {
            text: text.into(),
            status_type,
            created: Instant::now(),
        });
    }

    pub fn set_success(&mut self, text: impl Into<String>) {
        self.set_status(text, StatusType::Success);
    }

    pub fn set_error(&mut self, text: impl Into<String>) {
        self.set_status(text, StatusType::Error);
    }

    /// Rensa statusmeddelanden som visats klart
    pub fn clear_old_status(&mut self) {
        if let Some(ref status) = self.status_message {
            if status.created.elapsed().as_secs() >= 5 {
                self.status_message = None;
            }
        }
    }
}
