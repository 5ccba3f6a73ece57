//! Error dialog component

use super::base::{render_dialog, DialogConfig};
use ratatui::{
    style::{Color, Modifier, Style},
    text::Span,
    Frame,
};

fn key_span(key: &'static str) -> Span<'static> {
    Span::styled(
        key,
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )
}

/// Key hint under the message; a failed delivery also explains how to retry
fn hint(retryable: bool) -> Vec<Span<'static>> {
    let mut spans = vec![
        Span::raw("Press "),
        key_span("Enter"),
        Span::raw(" or "),
        key_span("Esc"),
        Span::raw(" to close"),
    ];
    if retryable {
        spans.push(Span::raw(", then "));
        spans.push(key_span("Enter"));
        spans.push(Span::raw(" again to retry"));
    }
    spans
}

/// Render an error dialog overlay centered on the screen
pub fn render_error_dialog(frame: &mut Frame, error_message: &str, retryable: bool) {
    let title = if retryable {
        "Submission not sent"
    } else {
        "Something went wrong"
    };

    render_dialog(
        frame,
        DialogConfig {
            title,
            title_color: Color::Red,
            border_color: Color::Red,
            message: error_message,
            hint: Some(hint(retryable)),
            max_width: 60,
        },
    );
}
