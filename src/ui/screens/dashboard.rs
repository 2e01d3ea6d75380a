use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph, Sparkline},
    Frame,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_amount, format_percent, progress_bar, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // Summary cards
            Constraint::Min(10),   // Spend chart + savings target
            Constraint::Length(5), // Cumulative savings
        ])
        .split(area);

    render_summary_cards(f, chunks[0], app);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[1]);
    render_spend_chart(f, middle[0], app);
    render_target_panel(f, middle[1], app);

    render_savings_sparkline(f, chunks[2], app);
}

fn panel(title: String) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(title, theme::title_style()))
}

fn render_summary_cards(f: &mut Frame, area: Rect, app: &App) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(25); 4])
        .split(area);

    let totals = &app.overview.totals;
    let utilization = totals.utilization();
    let remaining_color = if totals.is_over_budget() {
        theme::RED
    } else {
        theme::GREEN
    };

    render_card(
        f,
        cards[0],
        "Budgeted",
        format_amount(totals.budgeted),
        theme::BLUE,
        format!("{} lines", app.lines.len()),
    );
    render_card(
        f,
        cards[1],
        "Actual",
        format_amount(totals.actual),
        theme::YELLOW,
        format!("{} categories", app.overview.breakdown.len()),
    );
    render_card(
        f,
        cards[2],
        "Remaining",
        format_amount(totals.remaining),
        remaining_color,
        if totals.is_over_budget() {
            "over budget".to_string()
        } else {
            String::new()
        },
    );
    render_card(
        f,
        cards[3],
        "Utilization",
        format_percent(utilization),
        theme::utilization_color(utilization.to_f64().unwrap_or(0.0)),
        progress_bar(utilization, 12),
    );
}

fn render_card(f: &mut Frame, area: Rect, title: &str, value: String, color: Color, subtitle: String) {
    let text = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            value,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(subtitle, theme::dim_style())),
    ])
    .centered()
    .block(panel(format!(" {title} ")));

    f.render_widget(text, area);
}

fn render_spend_chart(f: &mut Frame, area: Rect, app: &App) {
    if app.overview.pie.is_empty() {
        let msg = Paragraph::new(Line::from(Span::styled(
            "Nothing spent yet. Record actuals with :actual on the Budget tab",
            theme::dim_style(),
        )))
        .centered()
        .block(panel(" Actual Spend by Category ".to_string()));
        f.render_widget(msg, area);
        return;
    }

    let bars: Vec<Bar> = app
        .overview
        .pie
        .iter()
        .map(|slice| {
            Bar::default()
                .value(slice.value.to_u64().unwrap_or(0))
                .text_value(format_amount(slice.value.trunc()))
                .label(Line::from(truncate(&slice.label, 10)))
                .style(Style::default().fg(theme::ACCENT))
                .value_style(
                    Style::default()
                        .fg(theme::HEADER_BG)
                        .bg(theme::ACCENT)
                        .add_modifier(Modifier::BOLD),
                )
        })
        .collect();

    let chart = BarChart::default()
        .block(panel(" Actual Spend by Category ".to_string()))
        .data(BarGroup::default().bars(&bars))
        .bar_width(10)
        .bar_gap(1);

    f.render_widget(chart, area);
}

fn render_target_panel(f: &mut Frame, area: Rect, app: &App) {
    let ov = &app.overview;
    let mut lines = vec![
        Line::from(""),
        labelled("Budget target", format_amount(ov.budget_target), theme::TEXT),
        labelled("Saved so far", format_amount(ov.current_available), theme::GREEN),
    ];

    match (&ov.target, app.settings.target_date) {
        (Some(t), Some(date)) => {
            lines.push(labelled("Wedding date", date.to_string(), theme::TEXT));
            lines.push(labelled(
                "Still needed",
                format_amount(t.remaining_needed),
                theme::YELLOW,
            ));
            lines.push(labelled(
                "Months left",
                t.months_remaining.to_string(),
                theme::TEXT,
            ));
            let (value, color) = if t.remaining_needed.is_zero() {
                ("on track".to_string(), theme::GREEN)
            } else if t.months_remaining == 0 {
                ("date reached".to_string(), theme::RED)
            } else {
                (format_amount(t.monthly_target), theme::ACCENT)
            };
            lines.push(labelled("Save per month", value, color));
        }
        _ => {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "  Set a wedding date with :date YYYY-MM-DD",
                theme::dim_style(),
            )));
        }
    }

    if ov.stale_months > 0 {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  {} month(s) out of sync, run :reconcile", ov.stale_months),
            Style::default().fg(theme::RED),
        )));
    }

    f.render_widget(
        Paragraph::new(lines).block(panel(" Savings Target ".to_string())),
        area,
    );
}

fn labelled(label: &str, value: String, color: Color) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {label:<16}"), theme::dim_style()),
        Span::styled(
            value,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
    ])
}

fn render_savings_sparkline(f: &mut Frame, area: Rect, app: &App) {
    // Sparklines cannot show negatives; a deficit month draws as empty.
    let data: Vec<u64> = app
        .overview
        .savings
        .iter()
        .map(|p| p.cumulative_available.max(Decimal::ZERO).to_u64().unwrap_or(0))
        .collect();

    let title = match app.overview.savings.last() {
        Some(p) => format!(
            " Cumulative Savings ({} months, {} as of {}) ",
            data.len(),
            format_amount(p.cumulative_available),
            p.month_year.format("%b %Y")
        ),
        None => " Cumulative Savings (record months with :month) ".to_string(),
    };

    let sparkline = Sparkline::default()
        .block(panel(title))
        .data(&data)
        .style(Style::default().fg(theme::GREEN));

    f.render_widget(sparkline, area);
}
