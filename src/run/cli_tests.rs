#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use super::*;
use crate::models::{LineStatus, PlanSettings};

fn args(list: &[&str]) -> Vec<String> {
    std::iter::once("weddingbudget")
        .chain(list.iter().copied())
        .map(String::from)
        .collect()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_add_and_add_month() {
    let mut db = Database::open_in_memory().unwrap();
    as_cli(&args(&["add", "home setup", "Sofa", "80000", "85000", "paid"]), &mut db).unwrap();
    as_cli(&args(&["add-month", "2025-01", "90000", "0", "5000"]), &mut db).unwrap();
    as_cli(&args(&["add-month", "2025-01", "95000"]), &mut db).unwrap();

    let lines = db.get_budget_lines().unwrap();
    assert_eq!(lines[0].category, "Home Setup");
    assert_eq!(lines[0].status, LineStatus::Paid);

    let months = db.get_finance_months().unwrap();
    assert_eq!(months.len(), 1);
    assert_eq!(months[0].credit_card_spent, dec!(5000));
    assert_eq!(months[0].available_funds_month, dec!(90000));
}

#[test]
fn test_usage_errors() {
    let mut db = Database::open_in_memory().unwrap();
    assert!(as_cli(&args(&["add", "Decor"]), &mut db).is_err());
    assert!(as_cli(&args(&["add-month", "2025-01"]), &mut db).is_err());
    assert!(as_cli(&args(&["target", "1", "2026-01-01", "x"]), &mut db).is_err());
    assert!(as_cli(&args(&["import"]), &mut db).is_err());
    assert!(as_cli(&args(&["import", "/nonexistent/lines.csv"]), &mut db).is_err());
    assert!(as_cli(&args(&["frobnicate"]), &mut db).is_err());
    assert!(db.get_budget_lines().unwrap().is_empty());
}

#[test]
fn test_target_saves_settings() {
    let mut db = Database::open_in_memory().unwrap();
    as_cli(&args(&["target", "1000000", "2026-02-14"]), &mut db).unwrap();
    assert_eq!(
        db.get_settings().unwrap(),
        PlanSettings {
            total_budget_target: Some(dec!(1000000)),
            target_date: Some(date(2026, 2, 14)),
        }
    );

    as_cli(&args(&["target", "auto"]), &mut db).unwrap();
    let settings = db.get_settings().unwrap();
    assert_eq!(settings.total_budget_target, None);
    assert_eq!(settings.target_date, Some(date(2026, 2, 14)));
}

#[test]
fn test_export_import_roundtrip() {
    let mut db = Database::open_in_memory().unwrap();
    as_cli(&args(&["add", "Decor", "Flowers", "30000"]), &mut db).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.csv").display().to_string();
    as_cli(&args(&["export", &path]), &mut db).unwrap();

    let mut other = Database::open_in_memory().unwrap();
    as_cli(&args(&["import", &path]), &mut other).unwrap();
    let lines = other.get_budget_lines().unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].item_name, "Flowers");
}

#[test]
fn test_summary_text_with_target() {
    let lines = vec![
        BudgetLine {
            actual_amount: dec!(1500),
            ..BudgetLine::new("A".into(), "x".into(), dec!(1000))
        },
        BudgetLine::new("A".into(), "y".into(), dec!(500)),
        BudgetLine::new("B".into(), "z".into(), dec!(2000)),
    ];
    let mut month = FinanceMonth::new(date(2025, 1, 1));
    month.monthly_salary = dec!(400000);
    month.recompute_available();
    let settings = PlanSettings {
        total_budget_target: Some(dec!(1000000)),
        target_date: Some(date(2025, 7, 1)),
    };
    let ov = aggregate::overview(&lines, &[month], &settings, date(2025, 1, 1));
    let text = summary_text(&ov, settings.target_date);

    assert!(text.contains("  Budgeted:     3,500.00"));
    assert!(text.contains("  Remaining:    2,000.00"));
    assert!(text.contains("  Utilization:  42.9%"));
    assert!(!text.contains("OVER"));
    assert!(text.contains("  Still needed: 600,000.00"));
    assert!(text.contains("  Months left:  6"));
    assert!(text.contains("  Per month:    100,000.00"));
}

#[test]
fn test_summary_text_without_date() {
    let ov = aggregate::overview(&[], &[], &PlanSettings::default(), date(2025, 1, 1));
    let text = summary_text(&ov, None);
    assert!(text.contains("Set a wedding date"));
    assert!(!text.contains("By Category"));
}

#[test]
fn test_lines_table_flags_over_budget() {
    let mut line = BudgetLine::new("Decor".into(), "Flowers".into(), dec!(100));
    line.id = Some(7);
    line.actual_amount = dec!(150);
    let table = lines_table(&[line]);
    let row = table.lines().nth(2).unwrap();
    assert!(row.starts_with("7    Decor"));
    assert!(row.ends_with(" !"));
}

#[test]
fn test_months_table_marks_stale_cache() {
    let mut jan = FinanceMonth::new(date(2025, 1, 1));
    jan.available_funds_month = dec!(100);
    jan.cumulative_available = dec!(100);
    let mut feb = FinanceMonth::new(date(2025, 2, 1));
    feb.available_funds_month = dec!(50);
    feb.cumulative_available = dec!(999);

    let table = months_table(&[feb, jan]);
    let rows: Vec<&str> = table.lines().skip(2).collect();
    assert!(rows[0].starts_with("2025-01"));
    assert!(!rows[0].ends_with('*'));
    assert!(rows[1].starts_with("2025-02"));
    assert!(rows[1].ends_with("150.00 *"));
}
