//! Current wizard step: fields on the left, actions and price on the right

use super::field_renderer::{draw_field, field_height};
use super::summary::draw_price_panel;
use crate::app::App;
use crate::platform::SAVE_DRAFT_SHORTCUT;
use crate::state::{Offer, Phase};
use crate::ui::components::{render_action, ActionState, BUTTON_HEIGHT};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Width of the action panel
const ACTION_PANEL_WIDTH: u16 = 34;

/// Draw the active step with its action panel
pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(40),                    // Form area
            Constraint::Length(ACTION_PANEL_WIDTH), // Action panel
        ])
        .split(area);

    draw_fields(frame, main_chunks[0], app);
    draw_action_panel(frame, main_chunks[1], app);
}

/// Index of the first field to draw so the focused one stays visible
fn first_visible(heights: &[u16], active: usize, available: u16) -> usize {
    let mut first = 0;
    while first < active {
        let used: u16 = heights[first..=active].iter().sum();
        if used <= available {
            break;
        }
        first += 1;
    }
    first
}

fn draw_fields(frame: &mut Frame, area: Rect, app: &App) {
    let wizard = &app.wizard;
    let step = wizard.current_step();

    let block = Block::default()
        .title(format!(
            " Step {} of {}: {} ",
            wizard.step_index() + 1,
            wizard.steps().len(),
            step.label
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let fields: Vec<_> = step
        .fields
        .iter()
        .filter_map(|key| wizard.field(key))
        .collect();
    let heights: Vec<u16> = fields.iter().map(|f| field_height(f)).collect();
    let active = wizard.active_field().min(fields.len().saturating_sub(1));
    let first = first_visible(&heights, active, inner.height);

    let mut y = inner.y;
    for (idx, field) in fields.iter().enumerate().skip(first) {
        let height = heights[idx];
        if y + height > inner.y + inner.height {
            break;
        }
        let field_area = Rect {
            x: inner.x,
            y,
            width: inner.width,
            height,
        };
        draw_field(
            frame,
            field_area,
            field,
            idx == active,
            wizard.errors().get(field.name),
            app.state.option_cursor,
        );
        y += height;
    }
}

fn draw_action_panel(frame: &mut Frame, area: Rect, app: &App) {
    let wizard = &app.wizard;

    let block = Block::default()
        .title(" Actions ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let price_height = if wizard.price().is_some() { 7 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(BUTTON_HEIGHT), // Next / Submit
            Constraint::Length(BUTTON_HEIGHT), // Back
            Constraint::Length(BUTTON_HEIGHT), // Save draft
            Constraint::Length(price_height),  // Price
            Constraint::Min(0),                // Delivery state
        ])
        .split(inner);

    let submitting = matches!(wizard.phase(), Phase::Submitting(_));
    let (primary, primary_state) = if !wizard.is_last_step() {
        ("Next", ActionState::Ready)
    } else if submitting {
        ("Submitting", ActionState::Busy)
    } else {
        ("Submit", ActionState::from_enabled(wizard.can_submit()))
    };
    render_action(frame, chunks[0], primary, "Enter", true, primary_state);
    render_action(
        frame,
        chunks[1],
        "Back",
        "Esc",
        false,
        ActionState::from_enabled(wizard.step_index() > 0 && !submitting),
    );
    render_action(
        frame,
        chunks[2],
        "Save draft",
        SAVE_DRAFT_SHORTCUT,
        false,
        ActionState::from_enabled(wizard.has_drafts()),
    );

    if let Some(price) = wizard.price() {
        let currency = wizard.offer().map(|o| o.currency.as_str()).unwrap_or("EUR");
        draw_price_panel(frame, chunks[3], &price, currency);
    }

    match (wizard.phase(), wizard.offer()) {
        (Phase::Failed(reason), _) => draw_failure(frame, chunks[4], reason),
        (_, Some(offer)) => draw_offer(frame, chunks[4], offer),
        _ => {}
    }
}

/// Offer details shown next to a priced wizard
fn draw_offer(frame: &mut Frame, area: Rect, offer: &Offer) {
    let mut lines = vec![
        Line::from(Span::styled(
            offer.title.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            offer.category.as_str(),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    lines.extend(offer.bullets.iter().map(|bullet| {
        Line::from(vec![
            Span::styled("• ", Style::default().fg(Color::Cyan)),
            Span::raw(bullet.as_str()),
        ])
    }));
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), area);
}

fn draw_failure(frame: &mut Frame, area: Rect, reason: &str) {
    let lines = vec![
        Line::from(Span::styled(
            "Last attempt failed",
            Style::default().fg(Color::Red),
        )),
        Line::from(Span::styled(reason, Style::default().fg(Color::DarkGray))),
        Line::from(Span::styled(
            "Press Enter to retry",
            Style::default().fg(Color::Yellow),
        )),
    ];
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), area);
}
