//! Key binding overview

use crate::platform::{QUIT_SHORTCUT, SAVE_DRAFT_SHORTCUT};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

fn bindings() -> Vec<(&'static str, &'static str)> {
    vec![
        ("Tab / ↓", "Next field"),
        ("Shift+Tab / ↑", "Previous field"),
        ("Enter / PgDn", "Next step, or submit on the last step"),
        ("Esc / PgUp", "Previous step; closes on the first step"),
        ("Alt+1..9", "Jump to a step"),
        ("← / →", "Change a choice, or move between options"),
        ("Space", "Toggle a checkbox or the highlighted option"),
        ("Backspace", "Delete the last character"),
        (SAVE_DRAFT_SHORTCUT, "Save a draft now"),
        (QUIT_SHORTCUT, "Quit"),
        ("F1", "Toggle this help"),
    ]
}

pub fn draw(frame: &mut Frame, area: Rect) {
    let key_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);

    let lines: Vec<Line> = bindings()
        .into_iter()
        .map(|(keys, action)| {
            Line::from(vec![
                Span::styled(format!("  {keys:<16}"), key_style),
                Span::raw(action),
            ])
        })
        .collect();

    let block = Block::default()
        .title(" Keys ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
