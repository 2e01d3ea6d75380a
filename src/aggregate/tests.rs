#![allow(clippy::unwrap_used)]

use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;
use crate::models::{BudgetLine, FinanceMonth, LineStatus, PlanSettings};

fn line(category: &str, budgeted: Decimal, actual: Decimal) -> BudgetLine {
    let mut l = BudgetLine::new(category.into(), format!("{category} item"), budgeted);
    l.actual_amount = actual;
    l
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn month(y: i32, m: u32, available: Decimal) -> FinanceMonth {
    let mut fm = FinanceMonth::new(date(y, m, 1));
    fm.available_funds_month = available;
    fm
}

fn scenario_lines() -> Vec<BudgetLine> {
    vec![
        line("A", dec!(1000), dec!(1200)),
        line("A", dec!(500), dec!(300)),
        line("B", dec!(2000), Decimal::ZERO),
    ]
}

fn zero() -> Totals {
    Totals {
        budgeted: Decimal::ZERO,
        actual: Decimal::ZERO,
        remaining: Decimal::ZERO,
    }
}

// ── Totals ────────────────────────────────────────────────────

#[test]
fn test_category_totals_scenario() {
    let totals = category_totals(&scenario_lines(), "A");
    assert_eq!(totals.budgeted, dec!(1500));
    assert_eq!(totals.actual, dec!(1500));
    assert_eq!(totals.remaining, Decimal::ZERO);
}

#[test]
fn test_grand_totals_scenario() {
    let totals = grand_totals(&scenario_lines());
    assert_eq!(totals.budgeted, dec!(3500));
    assert_eq!(totals.actual, dec!(1500));
    assert_eq!(totals.remaining, dec!(2000));
}

#[test]
fn test_category_totals_empty_input() {
    assert_eq!(category_totals(&[], "Reception"), zero());
    assert_eq!(grand_totals(&[]), zero());
}

#[test]
fn test_category_totals_no_match() {
    assert_eq!(category_totals(&scenario_lines(), "C"), zero());
}

#[test]
fn test_category_match_is_exact() {
    let lines = vec![line("Reception", dec!(100), dec!(10))];
    assert_eq!(category_totals(&lines, "reception"), zero());
    assert_eq!(category_totals(&lines, "Reception ").budgeted, Decimal::ZERO);
    assert_eq!(category_totals(&lines, "Reception").budgeted, dec!(100));
}

#[test]
fn test_remaining_goes_negative_when_over_budget() {
    let lines = vec![line("Decor", dec!(50000), dec!(62500.50))];
    let totals = category_totals(&lines, "Decor");
    assert_eq!(totals.remaining, dec!(-12500.50));
    assert!(totals.is_over_budget());
}

#[test]
fn test_grand_totals_equals_sum_of_partition() {
    let lines = vec![
        line("Marriage", dec!(300000), dec!(120000)),
        line("Reception", dec!(450000.75), dec!(0)),
        line("Marriage", dec!(25000), dec!(31000)),
        line("Home Setup", dec!(80000), dec!(79999.99)),
        line("Mehendi", dec!(15000), dec!(2000)),
    ];
    let grand = grand_totals(&lines);
    let rows = category_breakdown(&lines, &["Marriage", "Reception", "Home Setup"]);

    let budgeted: Decimal = rows.iter().map(|r| r.totals.budgeted).sum();
    let actual: Decimal = rows.iter().map(|r| r.totals.actual).sum();
    let lines_seen: usize = rows.iter().map(|r| r.line_count).sum();
    assert_eq!(grand.budgeted, budgeted);
    assert_eq!(grand.actual, actual);
    assert_eq!(lines_seen, lines.len());
}

// ── utilization_percent ───────────────────────────────────────

#[test]
fn test_utilization_zero_budget_is_zero() {
    assert_eq!(utilization_percent(Decimal::ZERO, Decimal::ZERO), Decimal::ZERO);
    assert_eq!(utilization_percent(Decimal::ZERO, dec!(5000)), Decimal::ZERO);
}

#[test]
fn test_utilization_rounds_to_one_place() {
    assert_eq!(utilization_percent(dec!(3), dec!(1)), dec!(33.3));
    assert_eq!(utilization_percent(dec!(3), dec!(2)), dec!(66.7));
    assert_eq!(utilization_percent(dec!(1000), dec!(1200)), dec!(120));
    assert_eq!(utilization_percent(dec!(1000), Decimal::ZERO), Decimal::ZERO);
}

#[test]
fn test_totals_utilization() {
    let totals = grand_totals(&scenario_lines());
    assert_eq!(totals.utilization(), dec!(42.9));
}

// ── pie_series ────────────────────────────────────────────────

#[test]
fn test_pie_series_omits_zero_actual() {
    let slices = pie_series(&scenario_lines(), &["A", "B"]);
    assert_eq!(slices.len(), 1);
    assert_eq!(slices[0].label, "A");
    assert_eq!(slices[0].value, dec!(1500));
}

#[test]
fn test_pie_series_keeps_category_order() {
    let lines = vec![
        line("Reception", dec!(10), dec!(10)),
        line("Marriage", dec!(10), dec!(900)),
        line("Engagement", dec!(10), dec!(50)),
    ];
    let labels: Vec<String> = pie_series(&lines, &["Engagement", "Reception", "Marriage"])
        .into_iter()
        .map(|s| s.label)
        .collect();
    assert_eq!(labels, vec!["Engagement", "Reception", "Marriage"]);
}

#[test]
fn test_pie_series_ignores_categories_not_listed() {
    let lines = vec![line("Mehendi", dec!(10), dec!(10))];
    assert!(pie_series(&lines, &["Marriage"]).is_empty());
}

// ── category_breakdown / status_totals ────────────────────────

#[test]
fn test_breakdown_includes_empty_listed_categories() {
    let rows = category_breakdown(&scenario_lines(), &["B", "C", "A"]);
    let names: Vec<&str> = rows.iter().map(|r| r.category.as_str()).collect();
    assert_eq!(names, vec!["B", "C", "A"]);
    assert_eq!(rows[1].totals, zero());
    assert_eq!(rows[1].line_count, 0);
    assert_eq!(rows[2].line_count, 2);
    assert_eq!(rows[2].utilization, dec!(100));
}

#[test]
fn test_breakdown_appends_unlisted_categories() {
    let rows = category_breakdown(&scenario_lines(), &["B"]);
    let names: Vec<&str> = rows.iter().map(|r| r.category.as_str()).collect();
    assert_eq!(names, vec!["B", "A"]);
}

#[test]
fn test_status_totals() {
    let mut lines = scenario_lines();
    lines[0].status = LineStatus::Paid;
    lines[1].status = LineStatus::Pending;

    let by_status = status_totals(&lines);
    assert_eq!(by_status.len(), 3);
    assert_eq!(by_status[0].0, LineStatus::Planned);
    assert_eq!(by_status[0].1.budgeted, dec!(2000));
    assert_eq!(by_status[1].1.actual, dec!(300));
    assert_eq!(by_status[2].1.actual, dec!(1200));
}

// ── cumulative_savings ────────────────────────────────────────

#[test]
fn test_cumulative_prefix_sums() {
    let months = vec![
        month(2025, 1, dec!(40000)),
        month(2025, 2, dec!(55000)),
        month(2025, 3, dec!(-5000)),
        month(2025, 4, dec!(62000.50)),
    ];
    let points = cumulative_savings(&months);
    assert_eq!(points.len(), 4);
    for (i, point) in points.iter().enumerate() {
        let expected: Decimal = months[..=i].iter().map(|m| m.available_funds_month).sum();
        assert_eq!(point.cumulative_available, expected, "prefix {i}");
    }
    assert_eq!(points[0].cumulative_available, dec!(40000));
    assert_eq!(points[3].cumulative_available, dec!(152000.50));
}

#[test]
fn test_cumulative_sorts_input() {
    let months = vec![
        month(2025, 3, dec!(3)),
        month(2024, 12, dec!(100)),
        month(2025, 1, dec!(20)),
    ];
    let points = cumulative_savings(&months);
    let keys: Vec<NaiveDate> = points.iter().map(|p| p.month_year).collect();
    assert_eq!(keys, vec![date(2024, 12, 1), date(2025, 1, 1), date(2025, 3, 1)]);
    assert_eq!(points[2].cumulative_available, dec!(123));
}

#[test]
fn test_cumulative_independent_of_input_order() {
    let months = vec![
        month(2025, 1, dec!(10)),
        month(2025, 2, dec!(20)),
        month(2025, 3, dec!(30)),
        month(2025, 4, dec!(40)),
    ];
    let expected = cumulative_savings(&months);

    let orders: [[usize; 4]; 5] = [
        [3, 2, 1, 0],
        [1, 3, 0, 2],
        [2, 0, 3, 1],
        [0, 2, 1, 3],
        [3, 0, 2, 1],
    ];
    for order in orders {
        let shuffled: Vec<FinanceMonth> = order.iter().map(|&i| months[i].clone()).collect();
        assert_eq!(cumulative_savings(&shuffled), expected, "order {order:?}");
    }
}

#[test]
fn test_cumulative_ignores_stored_value() {
    let mut months = vec![month(2025, 1, dec!(100)), month(2025, 2, dec!(200))];
    months[0].cumulative_available = dec!(999999);
    months[1].cumulative_available = dec!(-1);
    let points = cumulative_savings(&months);
    assert_eq!(points[0].cumulative_available, dec!(100));
    assert_eq!(points[1].cumulative_available, dec!(300));
}

#[test]
fn test_cumulative_empty() {
    assert!(cumulative_savings(&[]).is_empty());
    assert_eq!(current_available(&[]), Decimal::ZERO);
}

#[test]
fn test_current_available_is_last_point() {
    let months = vec![month(2025, 2, dec!(5)), month(2025, 1, dec!(7))];
    assert_eq!(current_available(&cumulative_savings(&months)), dec!(12));
}

#[test]
fn test_cumulative_drift_reports_stale_cache() {
    let mut months = vec![month(2025, 1, dec!(100)), month(2025, 2, dec!(200))];
    months[0].cumulative_available = dec!(100);
    months[1].cumulative_available = dec!(250);

    let drift = cumulative_drift(&months);
    assert_eq!(drift.len(), 1);
    assert_eq!(drift[0].month_year, date(2025, 2, 1));
    assert_eq!(drift[0].stored, dec!(250));
    assert_eq!(drift[0].computed, dec!(300));

    months[1].cumulative_available = dec!(300);
    assert!(cumulative_drift(&months).is_empty());
}

// ── months_between ────────────────────────────────────────────

#[test]
fn test_months_between_whole_months() {
    assert_eq!(months_between(date(2025, 1, 15), date(2025, 7, 15)), 6);
    assert_eq!(months_between(date(2025, 1, 15), date(2025, 7, 14)), 5);
    assert_eq!(months_between(date(2025, 11, 1), date(2026, 2, 1)), 3);
}

#[test]
fn test_months_between_past_or_same_day() {
    assert_eq!(months_between(date(2025, 6, 1), date(2025, 6, 1)), 0);
    assert_eq!(months_between(date(2025, 6, 1), date(2025, 1, 1)), 0);
    assert_eq!(months_between(date(2025, 6, 1), date(2025, 6, 30)), 0);
}

#[test]
fn test_months_between_month_end_clamping() {
    // Jan 31 + 1 month clamps to Feb 28.
    assert_eq!(months_between(date(2025, 1, 31), date(2025, 2, 28)), 1);
    assert_eq!(months_between(date(2025, 1, 31), date(2025, 2, 27)), 0);
}

// ── monthly_savings_target ────────────────────────────────────

#[test]
fn test_savings_target_six_months() {
    let today = date(2025, 3, 10);
    let target_date = today.checked_add_months(Months::new(6)).unwrap();
    let target = monthly_savings_target(dec!(400000), dec!(1000000), target_date, today);
    assert_eq!(target.remaining_needed, dec!(600000));
    assert_eq!(target.months_remaining, 6);
    assert_eq!(target.monthly_target, dec!(100000));
}

#[test]
fn test_savings_target_already_met() {
    let today = date(2025, 3, 10);
    let target_date = date(2025, 12, 10);
    let target = monthly_savings_target(dec!(1200000), dec!(1000000), target_date, today);
    assert_eq!(target.remaining_needed, Decimal::ZERO);
    assert_eq!(target.months_remaining, 9);
    assert_eq!(target.monthly_target, Decimal::ZERO);
}

#[test]
fn test_savings_target_date_passed() {
    let today = date(2025, 3, 10);
    let target = monthly_savings_target(dec!(100), dec!(1000), date(2025, 1, 1), today);
    assert_eq!(target.remaining_needed, dec!(900));
    assert_eq!(target.months_remaining, 0);
    assert_eq!(target.monthly_target, Decimal::ZERO);
}

#[test]
fn test_savings_target_less_than_a_month_away() {
    let today = date(2025, 3, 10);
    let target = monthly_savings_target(Decimal::ZERO, dec!(5000), date(2025, 4, 1), today);
    assert_eq!(target.months_remaining, 0);
    assert_eq!(target.monthly_target, Decimal::ZERO);
}

// ── loan_emi ──────────────────────────────────────────────────

#[test]
fn test_loan_emi_standard() {
    assert_eq!(loan_emi(dec!(100000), dec!(12), 12), dec!(8884.88));
}

#[test]
fn test_loan_emi_zero_rate_splits_evenly() {
    assert_eq!(loan_emi(dec!(120000), Decimal::ZERO, 24), dec!(5000));
}

#[test]
fn test_loan_emi_degenerate_inputs() {
    assert_eq!(loan_emi(dec!(100000), dec!(10), 0), Decimal::ZERO);
    assert_eq!(loan_emi(Decimal::ZERO, dec!(10), 12), Decimal::ZERO);
}

#[test]
fn test_loan_emi_steep_rate_tends_to_interest_only() {
    // (1 + r)^600 no longer fits a Decimal at 500% a year
    let emi = loan_emi(dec!(100000), dec!(500), 600);
    assert_eq!(emi, dec!(41666.67));
    assert!(loan_emi(dec!(100000), dec!(500), 12) > emi);
}

// ── saturation ────────────────────────────────────────────────

#[test]
fn test_grand_totals_saturate_on_huge_lines() {
    let big = line("Decor", Decimal::MAX, Decimal::ZERO);
    let totals = grand_totals(&[big.clone(), big]);
    assert_eq!(totals.budgeted, Decimal::MAX);
    assert_eq!(totals.remaining, Decimal::MAX);

    let spent = line("Decor", Decimal::ZERO, Decimal::MAX);
    let totals = grand_totals(&[spent.clone(), spent]);
    assert_eq!(totals.remaining, Decimal::MIN);
    assert!(totals.is_over_budget());
}

#[test]
fn test_cumulative_saturates_on_huge_months() {
    let months = vec![
        month(2025, 1, Decimal::MAX),
        month(2025, 2, Decimal::MAX),
    ];
    let points = cumulative_savings(&months);
    assert_eq!(points[1].cumulative_available, Decimal::MAX);
}

#[test]
fn test_overview_survives_extreme_records() {
    let lines = vec![
        line("Decor", Decimal::MAX, Decimal::MAX),
        line("Decor", Decimal::MAX, Decimal::ZERO),
    ];
    let months = vec![month(2025, 1, Decimal::MIN), month(2025, 2, Decimal::MIN)];
    let settings = PlanSettings {
        total_budget_target: None,
        target_date: Some(date(2026, 1, 1)),
    };
    let ov = overview(&lines, &months, &settings, date(2025, 1, 1));
    assert_eq!(ov.current_available, Decimal::MIN);
    let target = ov.target.unwrap();
    assert_eq!(target.remaining_needed, Decimal::MAX);
    assert_eq!(target.months_remaining, 12);
}

// ── overview ──────────────────────────────────────────────────

#[test]
fn test_overview_without_target_date() {
    let lines = vec![
        line("Reception", dec!(200), dec!(50)),
        line("Marriage", dec!(300), dec!(0)),
    ];
    let months = vec![month(2025, 1, dec!(120))];
    let view = overview(&lines, &months, &PlanSettings::default(), date(2025, 2, 1));

    assert_eq!(view.totals.budgeted, dec!(500));
    assert_eq!(view.budget_target, dec!(500));
    assert_eq!(view.current_available, dec!(120));
    assert!(view.target.is_none());
    // Default order, empty categories dropped.
    let names: Vec<&str> = view.breakdown.iter().map(|r| r.category.as_str()).collect();
    assert_eq!(names, vec!["Marriage", "Reception"]);
    assert_eq!(view.pie.len(), 1);
    assert_eq!(view.pie[0].label, "Reception");
    assert_eq!(view.stale_months, 1);
}

#[test]
fn test_overview_with_target() {
    let lines = vec![line("Marriage", dec!(900000), dec!(0))];
    let mut jan = month(2025, 1, dec!(400000));
    jan.cumulative_available = dec!(400000);
    let settings = PlanSettings {
        total_budget_target: Some(dec!(1000000)),
        target_date: Some(date(2025, 8, 1)),
    };
    let view = overview(&lines, &[jan], &settings, date(2025, 2, 1));

    let target = view.target.unwrap();
    assert_eq!(view.budget_target, dec!(1000000));
    assert_eq!(target.remaining_needed, dec!(600000));
    assert_eq!(target.months_remaining, 6);
    assert_eq!(target.monthly_target, dec!(100000));
    assert_eq!(view.stale_months, 0);
}

#[test]
fn test_overview_custom_category_in_pie() {
    let lines = vec![line("Sangeet", dec!(100), dec!(100))];
    let view = overview(&lines, &[], &PlanSettings::default(), date(2025, 1, 1));
    assert_eq!(view.pie[0].label, "Sangeet");
    assert_eq!(view.breakdown.len(), 1);
}
