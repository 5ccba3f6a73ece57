//! Application state definitions

use std::collections::VecDeque;

/// Current view in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Wizard,
    /// Key binding overview
    Help,
}

/// UI-only state around the wizard
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub current_view: View,
    /// Highlighted option inside a multi-select field
    pub option_cursor: usize,
    /// Transient feedback shown in the status bar
    pub status_message: Option<String>,
    /// Errors waiting to be shown in a dialog, oldest first
    error_queue: VecDeque<String>,
}

impl AppState {
    /// Queue an error for the error dialog
    pub fn push_error(&mut self, message: String) {
        tracing::debug!(%message, "queued error");
        self.error_queue.push_back(message);
    }

    /// The error currently displayed, if any
    pub fn current_error(&self) -> Option<&str> {
        self.error_queue.front().map(String::as_str)
    }

    pub fn dismiss_error(&mut self) {
        self.error_queue.pop_front();
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// Move the option highlight, wrapping within `count` options
    pub fn move_option_cursor(&mut self, forward: bool, count: usize) {
        if count == 0 {
            self.option_cursor = 0;
            return;
        }
        self.option_cursor = if forward {
            (self.option_cursor + 1) % count
        } else {
            (self.option_cursor + count - 1) % count
        };
    }

    pub fn toggle_help(&mut self) {
        self.current_view = match self.current_view {
            View::Wizard => View::Help,
            View::Help => View::Wizard,
        };
    }
}
