use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};
use rust_decimal::prelude::ToPrimitive;

use crate::models::LineStatus;
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_amount, format_percent, progress_bar, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(64), Constraint::Percentage(36)])
        .split(area);

    render_lines(f, chunks[0], app);
    render_breakdown(f, chunks[1], app);
}

fn block(title: String) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(title, theme::title_style()))
}

fn status_style(status: LineStatus) -> Style {
    match status {
        LineStatus::Planned => theme::dim_style(),
        LineStatus::Pending => Style::default().fg(theme::YELLOW),
        LineStatus::Paid => Style::default().fg(theme::GREEN),
    }
}

fn render_lines(f: &mut Frame, area: Rect, app: &App) {
    let lines = app.visible_lines();
    let title = match &app.category_filter {
        Some(c) => format!(" Budget Lines: {c} ({}) ", lines.len()),
        None => format!(" Budget Lines ({}) ", lines.len()),
    };

    if lines.is_empty() {
        let hint = if app.category_filter.is_some() {
            "No lines in this category. :filter with no argument shows all"
        } else {
            "No budget lines yet. Add one with :add <category> | <item> | <amount>"
        };
        let msg = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(hint, theme::dim_style())),
        ])
        .centered()
        .block(block(title));
        f.render_widget(msg, area);
        return;
    }

    let header = Row::new(
        ["Category", "Item", "Budgeted", "Actual", "Remaining", "Status"]
            .iter()
            .map(|h| Cell::from(*h).style(theme::header_style())),
    )
    .height(1);

    let rows: Vec<Row> = lines
        .iter()
        .enumerate()
        .skip(app.line_scroll)
        .take(area.height.saturating_sub(3) as usize)
        .map(|(i, line)| {
            let row_style = if i == app.line_index {
                theme::selected_style()
            } else if i % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };
            let remaining_style = if line.is_over_budget() {
                theme::over_budget_style()
            } else {
                theme::under_budget_style()
            };

            let item = match &line.vendor_name {
                Some(v) => format!("{} ({v})", line.item_name),
                None => line.item_name.clone(),
            };

            Row::new(vec![
                Cell::from(truncate(&line.category, 12)),
                Cell::from(truncate(&item, 28)),
                Cell::from(format_amount(line.budgeted_amount)),
                Cell::from(format_amount(line.actual_amount)),
                Cell::from(Span::styled(format_amount(line.remaining()), remaining_style)),
                Cell::from(Span::styled(line.status.as_str(), status_style(line.status))),
            ])
            .style(row_style)
        })
        .collect();

    let widths = [
        Constraint::Length(13),
        Constraint::Min(16),
        Constraint::Length(14),
        Constraint::Length(14),
        Constraint::Length(14),
        Constraint::Length(8),
    ];

    f.render_widget(Table::new(rows, widths).header(header).block(block(title)), area);
}

fn render_breakdown(f: &mut Frame, area: Rect, app: &App) {
    let mut text: Vec<Line> = Vec::new();
    for row in &app.overview.breakdown {
        let pct = row.utilization.to_f64().unwrap_or(0.0);
        let color = theme::utilization_color(pct);
        text.push(Line::from(vec![
            Span::styled(format!(" {:<13}", truncate(&row.category, 12)), theme::normal_style()),
            Span::styled(progress_bar(row.utilization, 10), Style::default().fg(color)),
            Span::styled(format!(" {:>6}", format_percent(row.utilization)), Style::default().fg(color)),
        ]));
        text.push(Line::from(Span::styled(
            format!(
                "   {} of {}",
                format_amount(row.totals.actual),
                format_amount(row.totals.budgeted)
            ),
            theme::dim_style(),
        )));
    }

    if !text.is_empty() {
        text.push(Line::from(""));
        for (status, totals) in crate::aggregate::status_totals(&app.lines) {
            text.push(Line::from(vec![
                Span::styled(format!(" {:<9}", status.as_str()), status_style(status)),
                Span::styled(format_amount(totals.budgeted), theme::normal_style()),
            ]));
        }
    }

    f.render_widget(Paragraph::new(text).block(block(" By Category ".to_string())), area);
}
