//! UI module for rendering the TUI

mod components;
mod forms;
mod help;
mod layout;

use crate::app::App;
use crate::state::{Phase, View};
use components::render_error_dialog;
use ratatui::Frame;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let (header_area, main_area) = layout::create_layout(area);

    layout::draw_stepper(frame, header_area, app);

    match app.state.current_view {
        View::Help => help::draw(frame, main_area),
        View::Wizard => match app.wizard.phase() {
            Phase::Submitted(_) => forms::draw_submitted(frame, main_area, app),
            _ => forms::draw_step(frame, main_area, app),
        },
    }

    layout::draw_status_bar(frame, app);

    // Error dialog overlays everything
    if let Some(message) = app.state.current_error() {
        let retryable = matches!(app.wizard.phase(), Phase::Failed(_));
        render_error_dialog(frame, message, retryable);
    }
}
