//! Field rendering utilities for wizard steps

use crate::state::{FieldKind, FormField};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Rows a field occupies, borders included
pub fn field_height(field: &FormField) -> u16 {
    match field.kind {
        FieldKind::LongText => 5,
        FieldKind::MultiSelect(_) => 4,
        _ => 3,
    }
}

/// Draw one field. `error` is shown on the bottom border; `option_cursor`
/// marks the highlighted option of an active multi-select.
pub fn draw_field(
    frame: &mut Frame,
    area: Rect,
    field: &FormField,
    is_active: bool,
    error: Option<&str>,
    option_cursor: usize,
) {
    let accent = Style::default().fg(Color::Cyan);
    let style = if is_active {
        accent
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let border_style = match (error, is_active) {
        (Some(_), _) => Style::default().fg(Color::Red),
        (None, true) => accent,
        (None, false) => Style::default().fg(Color::DarkGray),
    };

    let cursor = if is_active { "▌" } else { "" };

    let content = match &field.kind {
        FieldKind::LongText => {
            let mut lines: Vec<Line> = field
                .as_text()
                .split('\n')
                .map(|l| Line::from(l.to_string()))
                .collect();
            if field.as_text().is_empty() && !is_active {
                lines = vec![Line::from(Span::styled("(empty)", style))];
            } else if is_active {
                if let Some(last) = lines.last_mut() {
                    last.spans.push(Span::styled(cursor, accent));
                }
            }
            Paragraph::new(lines)
        }
        FieldKind::ShortText => {
            let value = field.as_text();
            let display = if value.is_empty() && !is_active {
                "(empty)"
            } else {
                value
            };
            Paragraph::new(Line::from(vec![
                Span::styled(display.to_string(), style),
                Span::styled(cursor, accent),
            ]))
        }
        FieldKind::Choice(_) => {
            let value = field.display_value();
            let line = if is_active {
                Line::from(vec![
                    Span::styled("◀ ", accent),
                    Span::styled(value, accent.add_modifier(Modifier::BOLD)),
                    Span::styled(" ▶", accent),
                ])
            } else {
                Line::from(Span::styled(value, style))
            };
            Paragraph::new(line)
        }
        FieldKind::Flag => {
            let mark = if field.as_flag() { "[x]" } else { "[ ]" };
            let mut spans = vec![Span::styled(mark, style)];
            if is_active {
                spans.push(Span::styled(
                    "  Space to toggle",
                    Style::default().fg(Color::DarkGray),
                ));
            }
            Paragraph::new(Line::from(spans))
        }
        FieldKind::MultiSelect(options) => {
            let selected = field.as_set();
            let mut spans = Vec::with_capacity(options.len() * 2);
            for (idx, option) in options.iter().enumerate() {
                let checked = selected.iter().any(|s| s == option);
                let mark = if checked { "[x]" } else { "[ ]" };
                let mut chip_style = if checked {
                    Style::default().fg(Color::Green)
                } else {
                    style
                };
                if is_active && idx == option_cursor {
                    chip_style = chip_style.add_modifier(Modifier::REVERSED);
                }
                spans.push(Span::styled(format!("{mark} {option}"), chip_style));
                spans.push(Span::raw("  "));
            }
            Paragraph::new(Line::from(spans))
        }
    };

    let mut block = Block::default()
        .title(format!(" {} ", field.label))
        .borders(Borders::ALL)
        .border_style(border_style);
    if let Some(message) = error {
        block = block.title_bottom(Line::from(Span::styled(
            format!(" {message} "),
            Style::default().fg(Color::Red),
        )));
    }

    frame.render_widget(content.wrap(Wrap { trim: false }).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    const FORMATS: &[&str] = &["Online", "On-site", "Hybrid"];

    fn render(field: &FormField, is_active: bool, error: Option<&str>) -> String {
        let backend = TestBackend::new(60, field_height(field));
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| draw_field(frame, frame.area(), field, is_active, error, 1))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_heights_by_kind() {
        assert_eq!(field_height(&FormField::text("a", "A")), 3);
        assert_eq!(field_height(&FormField::long_text("a", "A")), 5);
        assert_eq!(field_height(&FormField::multi_select("a", "A", FORMATS)), 4);
    }

    #[test]
    fn test_error_shown_on_border() {
        let field = FormField::text("orgName", "Organization name");
        let screen = render(&field, false, Some("Organization name is required"));
        assert!(screen.contains("Organization name is required"));
        assert!(screen.contains("(empty)"));
    }

    #[test]
    fn test_multi_select_lists_every_option() {
        let mut field = FormField::multi_select("formats", "Formats", FORMATS);
        field.value = crate::state::FieldValue::Set(vec!["Hybrid".to_string()]);
        let screen = render(&field, true, None);
        assert!(screen.contains("[ ] Online"));
        assert!(screen.contains("[x] Hybrid"));
    }
}
