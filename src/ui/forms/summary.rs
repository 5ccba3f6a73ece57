//! Price breakdown and post-submission summary panels

use crate::app::App;
use crate::state::{format_money, Phase, PriceBreakdown};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

fn price_row<'a>(label: &'a str, amount: String, style: Style) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{label:<12}"), Style::default().fg(Color::DarkGray)),
        Span::styled(amount, style),
    ])
}

/// Draw base price, tax, and total for the current offer
pub fn draw_price_panel(frame: &mut Frame, area: Rect, price: &PriceBreakdown, currency: &str) {
    let lines = vec![
        price_row("Price", format_money(price.base, currency), Style::default()),
        price_row(
            "Tax",
            format!("{} ({})", format_money(price.tax, currency), price.rate_label()),
            Style::default(),
        ),
        Line::from(""),
        price_row(
            "Total",
            format_money(price.total, currency),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
    ];

    let block = Block::default()
        .title(" Summary ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Draw the confirmation shown once a submission was delivered
pub fn draw_submitted(frame: &mut Frame, area: Rect, app: &App) {
    let Phase::Submitted(record) = app.wizard.phase() else {
        return;
    };

    let mut lines = vec![
        Line::from(Span::styled(
            "Thank you! Your submission was received.",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Reference   ", Style::default().fg(Color::DarkGray)),
            Span::raw(record.id()),
        ]),
        Line::from(vec![
            Span::styled("Sent        ", Style::default().fg(Color::DarkGray)),
            Span::raw(record.created_at().format("%Y-%m-%d %H:%M UTC").to_string()),
        ]),
        Line::from(""),
    ];

    for (key, value) in record.summary() {
        let label = app.wizard.field(key).map(|f| f.label).unwrap_or(key.as_str());
        lines.push(Line::from(vec![
            Span::styled(format!("{label}: "), Style::default().fg(Color::DarkGray)),
            Span::raw(value.as_str()),
        ]));
    }

    if let Some(price) = record.price() {
        let currency = app
            .wizard
            .offer()
            .map(|o| o.currency.as_str())
            .unwrap_or("EUR");
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("Total: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format_money(price.total, currency),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "n: start a new form   Enter/Esc: close",
        Style::default().fg(Color::Cyan),
    )));

    let block = Block::default()
        .title(format!(" {} ", app.wizard.title()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(block),
        area,
    );
}
