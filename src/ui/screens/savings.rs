use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};
use rust_decimal::Decimal;

use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::format_amount;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let points = &app.overview.savings;
    let title = format!(
        " Savings ({} months, {} available) ",
        points.len(),
        format_amount(app.overview.current_available)
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(title, theme::title_style()));

    if points.is_empty() {
        let msg = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "No months recorded yet",
                theme::dim_style(),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Use :month <YYYY-MM> <salary> [bonus] [card] [emi] to add one",
                theme::dim_style(),
            )),
        ])
        .centered()
        .block(block);
        f.render_widget(msg, area);
        return;
    }

    let header = Row::new(
        ["Month", "Salary", "Bonus", "Cash", "EMI", "Card", "Available", "Cumulative"]
            .iter()
            .map(|h| Cell::from(*h).style(theme::header_style())),
    )
    .height(1);

    let rows: Vec<Row> = points
        .iter()
        .enumerate()
        .skip(app.month_scroll)
        .take(area.height.saturating_sub(3) as usize)
        .map(|(i, point)| {
            let record = app.months.iter().find(|m| m.month_year == point.month_year);
            let field = |get: fn(&crate::models::FinanceMonth) -> Decimal| {
                record.map(|m| format_amount(get(m))).unwrap_or_default()
            };

            let style = if i == app.month_index {
                theme::selected_style()
            } else if i % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };
            let available_style = if point.available_funds_month < Decimal::ZERO {
                theme::over_budget_style()
            } else {
                theme::under_budget_style()
            };
            // Flag rows whose stored running total no longer matches.
            let stale = record.is_some_and(|m| m.cumulative_available != point.cumulative_available);
            let cumulative = if stale {
                Span::styled(
                    format!("{} *", format_amount(point.cumulative_available)),
                    Style::default().fg(theme::YELLOW).add_modifier(Modifier::BOLD),
                )
            } else {
                Span::raw(format_amount(point.cumulative_available))
            };

            Row::new(vec![
                Cell::from(point.month_year.format("%b %Y").to_string()),
                Cell::from(field(|m| m.monthly_salary)),
                Cell::from(field(|m| m.bonus_income)),
                Cell::from(field(|m| m.cash_holding_1.saturating_add(m.cash_holding_2))),
                Cell::from(field(|m| m.monthly_emi)),
                Cell::from(field(|m| m.credit_card_spent)),
                Cell::from(Span::styled(
                    format_amount(point.available_funds_month),
                    available_style,
                )),
                Cell::from(cumulative),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(9),
        Constraint::Length(13),
        Constraint::Length(12),
        Constraint::Length(12),
        Constraint::Length(11),
        Constraint::Length(11),
        Constraint::Length(13),
        Constraint::Min(14),
    ];

    f.render_widget(Table::new(rows, widths).header(header).block(block), area);
}
