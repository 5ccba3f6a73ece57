//! Action buttons for the step panel

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Button height in rows (top border + content + bottom border)
pub const BUTTON_HEIGHT: u16 = 3;

/// What an action can do right now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionState {
    Ready,
    Disabled,
    /// Running in the background; shown with a spinner mark
    Busy,
}

impl ActionState {
    pub fn from_enabled(enabled: bool) -> Self {
        if enabled {
            ActionState::Ready
        } else {
            ActionState::Disabled
        }
    }
}

/// Render an action as a bordered row: label on the left, key on the right
pub fn render_action(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    shortcut: &str,
    primary: bool,
    state: ActionState,
) {
    let (border_style, label_style) = match state {
        ActionState::Ready if primary => (
            Style::default().fg(Color::Cyan),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        ActionState::Ready => (Style::default().fg(Color::Gray), Style::default()),
        ActionState::Busy => (
            Style::default().fg(Color::Yellow),
            Style::default().fg(Color::Yellow),
        ),
        ActionState::Disabled => (
            Style::default().fg(Color::DarkGray),
            Style::default().fg(Color::DarkGray),
        ),
    };

    let label = if state == ActionState::Busy {
        format!(" ◌ {label}")
    } else {
        format!(" {label}")
    };
    let shortcut = format!("{shortcut} ");
    let inner_width = area.width.saturating_sub(2) as usize;
    let gap = inner_width
        .saturating_sub(label.chars().count() + shortcut.chars().count())
        .max(1);

    let line = Line::from(vec![
        Span::styled(label, label_style),
        Span::raw(" ".repeat(gap)),
        Span::styled(shortcut, Style::default().fg(Color::DarkGray)),
    ]);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style);

    frame.render_widget(Paragraph::new(line).block(block), area);
}
