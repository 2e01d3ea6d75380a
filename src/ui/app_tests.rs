#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::*;

fn line(category: &str, item: &str) -> BudgetLine {
    BudgetLine::new(category.to_string(), item.to_string(), dec!(1000))
}

fn month(y: i32, m: u32, salary: rust_decimal::Decimal) -> FinanceMonth {
    let mut fm = FinanceMonth::new(NaiveDate::from_ymd_opt(y, m, 1).unwrap());
    fm.monthly_salary = salary;
    fm.recompute_available();
    fm
}

#[test]
fn test_new_app_has_empty_overview() {
    let app = App::new();
    assert_eq!(app.screen, Screen::Dashboard);
    assert_eq!(app.overview.totals.budgeted, dec!(0));
    assert!(app.overview.savings.is_empty());
    assert!(app.selected_line().is_none());
    assert!(app.selected_month().is_none());
}

#[test]
fn test_visible_lines_respects_filter() {
    let mut app = App::new();
    app.lines = vec![line("Decor", "Flowers"), line("Travel", "Hotel"), line("Decor", "Lights")];
    assert_eq!(app.visible_lines().len(), 3);

    app.category_filter = Some("decor".to_string());
    let items: Vec<&str> = app.visible_lines().iter().map(|l| l.item_name.as_str()).collect();
    assert_eq!(items, vec!["Flowers", "Lights"]);
}

#[test]
fn test_recompute_clamps_cursors() {
    let mut app = App::new();
    app.lines = vec![line("Decor", "Flowers")];
    app.line_index = 5;
    app.line_scroll = 5;
    app.month_index = 3;
    app.recompute();
    assert_eq!((app.line_index, app.line_scroll), (0, 0));
    assert_eq!(app.month_index, 0);
    assert_eq!(app.overview.totals.budgeted, dec!(1000));
}

#[test]
fn test_selected_month_follows_sorted_savings() {
    let mut app = App::new();
    app.months = vec![month(2025, 3, dec!(300)), month(2025, 1, dec!(100))];
    app.recompute();
    app.month_index = 1;
    assert_eq!(app.selected_month().unwrap().month_key(), "2025-03");
    assert_eq!(app.overview.savings[1].cumulative_available, dec!(400));
}

#[test]
fn test_screen_cycle_order() {
    let names: Vec<String> = Screen::all().iter().map(|s| s.to_string()).collect();
    assert_eq!(names, vec!["Dashboard", "Budget", "Savings"]);
}
