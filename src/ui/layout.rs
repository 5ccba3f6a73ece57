//! Layout components (stepper header, status bar)

use crate::app::App;
use crate::draft::DraftStatus;
use crate::platform::{QUIT_SHORTCUT, SAVE_DRAFT_SHORTCUT};
use crate::state::{Phase, View, Wizard};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Height of the stepper header
const HEADER_HEIGHT: u16 = 3;

/// Split the screen into header and content, reserving the status bar line
pub fn create_layout(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT), // Stepper
            Constraint::Min(0),                // Content
            Constraint::Length(1),             // Status bar
        ])
        .split(area);

    (chunks[0], chunks[1])
}

/// Spans for the step indicator: done, current, and upcoming steps
fn stepper_spans(wizard: &Wizard) -> Vec<Span<'static>> {
    let submitted = matches!(wizard.phase(), Phase::Submitted(_));
    let mut spans = Vec::new();
    for (idx, step) in wizard.steps().iter().enumerate() {
        if idx > 0 {
            spans.push(Span::styled("  ›  ", Style::default().fg(Color::DarkGray)));
        }
        let (marker, style) = if submitted || wizard.is_completed(idx) {
            ("✓", Style::default().fg(Color::Green))
        } else if wizard.is_current(idx) {
            (
                "●",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            ("○", Style::default().fg(Color::DarkGray))
        };
        spans.push(Span::styled(format!("{marker} {}", step.label), style));
    }
    spans
}

/// Draw the wizard title and step indicator
pub fn draw_stepper(frame: &mut Frame, area: Rect, app: &App) {
    let wizard = &app.wizard;
    let title = match wizard.offer() {
        Some(offer) => format!(" {} · {} ", wizard.title(), offer.title),
        None => format!(" {} ", wizard.title()),
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    frame.render_widget(
        Paragraph::new(Line::from(stepper_spans(wizard))).block(block),
        area,
    );
}

/// Draw the status bar
pub fn draw_status_bar(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let status_area = Rect {
        x: 0,
        y: area.height.saturating_sub(1),
        width: area.width,
        height: 1,
    };

    let mut spans = vec![];

    // Delivery state
    let delivery = if app.is_delivering() {
        Span::styled(" ◌ ", Style::default().fg(Color::Yellow))
    } else {
        Span::styled(" ● ", Style::default().fg(Color::Green))
    };
    spans.push(delivery);

    let hints = get_view_hints(app);
    spans.push(Span::styled(hints, Style::default().fg(Color::Gray)));

    if let Some(status) = app.wizard.draft_status() {
        spans.push(Span::raw(" | "));
        let draft = match status {
            DraftStatus::Saved => Span::styled("draft saved", Style::default().fg(Color::Green)),
            DraftStatus::Cleared => Span::styled("draft cleared", Style::default().fg(Color::Gray)),
            DraftStatus::Failed(_) => {
                Span::styled("draft not saved", Style::default().fg(Color::Red))
            }
        };
        spans.push(draft);
    }

    if let Some(msg) = &app.state.status_message {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(msg, Style::default().fg(Color::Yellow)));
    }

    let quit_hint = format!(" {QUIT_SHORTCUT}:quit  → {} ", app.sink_name());

    let status = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status, status_area);

    let quit_width = quit_hint.chars().count() as u16;
    let quit_area = Rect {
        x: area.width.saturating_sub(quit_width),
        y: area.height.saturating_sub(1),
        width: quit_width.min(area.width),
        height: 1,
    };
    let quit_widget =
        Paragraph::new(quit_hint).style(Style::default().bg(Color::DarkGray).fg(Color::Gray));
    frame.render_widget(quit_widget, quit_area);
}

/// Get keyboard hints for the current view
fn get_view_hints(app: &App) -> String {
    match app.state.current_view {
        View::Help => "Esc:close help".to_string(),
        View::Wizard => match app.wizard.phase() {
            Phase::Submitted(_) => "n:new form  Enter:close".to_string(),
            _ => format!(
                "Tab:field  Enter:next  Esc:back  Space:toggle  ←/→:choose  {SAVE_DRAFT_SHORTCUT}:save  F1:help"
            ),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{partnership, EmailCheck};

    fn text(spans: &[Span]) -> String {
        spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_stepper_marks_current_and_completed() {
        let mut wizard = Wizard::new(partnership::schema(EmailCheck::Format), None, None);
        let first = text(&stepper_spans(&wizard));
        assert!(first.starts_with("● Institution"));
        assert!(first.contains("○ Confirm"));

        wizard.set_text("orgName", "Acme");
        wizard.set_choice("orgType", Some("School"));
        wizard.set_text("countryCity", "Oslo");
        wizard.set_text("field", "Design");
        wizard.next();
        let second = text(&stepper_spans(&wizard));
        assert!(second.starts_with("✓ Institution"));
        assert!(second.contains("● Collaboration"));
    }

    #[test]
    fn test_layout_reserves_status_line() {
        let (header, body) = create_layout(Rect::new(0, 0, 80, 24));
        assert_eq!(header.height, HEADER_HEIGHT);
        assert_eq!(body.height, 24 - HEADER_HEIGHT - 1);
    }
}
