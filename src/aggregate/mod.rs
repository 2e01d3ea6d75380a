//! Derived budget and savings views.
//!
//! Every function here is pure: it reads a snapshot of records and returns
//! fresh values. Nothing is cached and nothing is written back. Inputs are
//! assumed to be well-formed non-negative amounts; the store and the input
//! forms are responsible for rejecting anything else. Sums saturate at the
//! `Decimal` bounds instead of overflowing.

use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::Decimal;

use crate::models::{categories_with_extras, BudgetLine, FinanceMonth, LineStatus, PlanSettings};

/// Display precision for utilization percentages.
const UTILIZATION_DP: u32 = 1;
const EMI_DP: u32 = 2;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Totals {
    pub(crate) budgeted: Decimal,
    pub(crate) actual: Decimal,
    /// `budgeted - actual`; negative when over budget.
    pub(crate) remaining: Decimal,
}

impl Totals {
    pub(crate) fn utilization(&self) -> Decimal {
        utilization_percent(self.budgeted, self.actual)
    }

    pub(crate) fn is_over_budget(&self) -> bool {
        self.remaining < Decimal::ZERO
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PieSlice {
    pub(crate) label: String,
    pub(crate) value: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CategorySummary {
    pub(crate) category: String,
    pub(crate) totals: Totals,
    pub(crate) utilization: Decimal,
    pub(crate) line_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SavingsPoint {
    pub(crate) month_year: NaiveDate,
    pub(crate) available_funds_month: Decimal,
    pub(crate) cumulative_available: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SavingsTarget {
    pub(crate) remaining_needed: Decimal,
    pub(crate) months_remaining: u32,
    pub(crate) monthly_target: Decimal,
}

/// A month whose stored cumulative cache disagrees with a fresh recomputation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CumulativeDrift {
    pub(crate) month_year: NaiveDate,
    pub(crate) stored: Decimal,
    pub(crate) computed: Decimal,
}

/// Everything the dashboard and `summary` command show, computed from one snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Overview {
    pub(crate) totals: Totals,
    pub(crate) breakdown: Vec<CategorySummary>,
    pub(crate) pie: Vec<PieSlice>,
    pub(crate) savings: Vec<SavingsPoint>,
    pub(crate) current_available: Decimal,
    pub(crate) budget_target: Decimal,
    /// `None` until a target date is set.
    pub(crate) target: Option<SavingsTarget>,
    pub(crate) stale_months: usize,
}

fn sum_totals<'a>(lines: impl Iterator<Item = &'a BudgetLine>) -> Totals {
    let (budgeted, actual) = lines.fold((Decimal::ZERO, Decimal::ZERO), |(b, a), line| {
        (
            b.saturating_add(line.budgeted_amount),
            a.saturating_add(line.actual_amount),
        )
    });
    Totals {
        budgeted,
        actual,
        remaining: budgeted.saturating_sub(actual),
    }
}

/// Totals over lines whose category equals `category` exactly.
pub(crate) fn category_totals(lines: &[BudgetLine], category: &str) -> Totals {
    sum_totals(lines.iter().filter(|l| l.category == category))
}

pub(crate) fn grand_totals(lines: &[BudgetLine]) -> Totals {
    sum_totals(lines.iter())
}

/// `actual / budgeted * 100`, rounded to one decimal place. Zero budget yields zero.
pub(crate) fn utilization_percent(budgeted: Decimal, actual: Decimal) -> Decimal {
    if budgeted.is_zero() {
        return Decimal::ZERO;
    }
    actual
        .checked_div(budgeted)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .map(|pct| pct.round_dp(UTILIZATION_DP))
        .unwrap_or(Decimal::ZERO)
}

/// Actual spend per category in `categories` order, omitting categories with nothing spent.
pub(crate) fn pie_series<S: AsRef<str>>(lines: &[BudgetLine], categories: &[S]) -> Vec<PieSlice> {
    categories
        .iter()
        .map(|c| PieSlice {
            label: c.as_ref().to_string(),
            value: category_totals(lines, c.as_ref()).actual,
        })
        .filter(|slice| slice.value > Decimal::ZERO)
        .collect()
}

/// Per-category rows in `categories` order. Categories present in `lines` but
/// missing from `categories` are appended in first-seen order, so the rows
/// always partition `lines`.
pub(crate) fn category_breakdown<S: AsRef<str>>(
    lines: &[BudgetLine],
    categories: &[S],
) -> Vec<CategorySummary> {
    let mut names: Vec<&str> = categories.iter().map(|c| c.as_ref()).collect();
    for line in lines {
        if !names.contains(&line.category.as_str()) {
            names.push(line.category.as_str());
        }
    }

    names
        .into_iter()
        .map(|name| {
            let totals = category_totals(lines, name);
            CategorySummary {
                category: name.to_string(),
                utilization: totals.utilization(),
                line_count: lines.iter().filter(|l| l.category == name).count(),
                totals,
            }
        })
        .collect()
}

/// Totals per status, in `Planned, Pending, Paid` order.
pub(crate) fn status_totals(lines: &[BudgetLine]) -> Vec<(LineStatus, Totals)> {
    LineStatus::all()
        .iter()
        .map(|s| (*s, sum_totals(lines.iter().filter(|l| l.status == *s))))
        .collect()
}

/// Running total of `available_funds_month`, ascending by month.
///
/// Input order does not matter. The stored `cumulative_available` on each
/// record is ignored.
pub(crate) fn cumulative_savings(months: &[FinanceMonth]) -> Vec<SavingsPoint> {
    let mut sorted: Vec<&FinanceMonth> = months.iter().collect();
    sorted.sort_by(|a, b| {
        a.month_year
            .cmp(&b.month_year)
            .then_with(|| a.available_funds_month.cmp(&b.available_funds_month))
    });

    let mut running = Decimal::ZERO;
    sorted
        .into_iter()
        .map(|m| {
            running = running.saturating_add(m.available_funds_month);
            SavingsPoint {
                month_year: m.month_year,
                available_funds_month: m.available_funds_month,
                cumulative_available: running,
            }
        })
        .collect()
}

/// Latest cumulative value, or zero when nothing has been tracked yet.
pub(crate) fn current_available(points: &[SavingsPoint]) -> Decimal {
    points
        .last()
        .map(|p| p.cumulative_available)
        .unwrap_or(Decimal::ZERO)
}

/// Months whose stored cumulative value differs from the recomputed one.
pub(crate) fn cumulative_drift(months: &[FinanceMonth]) -> Vec<CumulativeDrift> {
    let computed = cumulative_savings(months);
    computed
        .iter()
        .filter_map(|point| {
            let stored = months
                .iter()
                .find(|m| m.month_year == point.month_year)?
                .cumulative_available;
            (stored != point.cumulative_available).then_some(CumulativeDrift {
                month_year: point.month_year,
                stored,
                computed: point.cumulative_available,
            })
        })
        .collect()
}

/// Whole calendar months from `today` to `target_date`: the largest `n` with
/// `today + n months <= target_date`. Zero when the target is not in the future.
pub(crate) fn months_between(today: NaiveDate, target_date: NaiveDate) -> u32 {
    if target_date <= today {
        return 0;
    }
    let span = (target_date.year() - today.year()) * 12 + target_date.month() as i32
        - today.month() as i32;
    let mut n = u32::try_from(span).unwrap_or(0);
    while n > 0 {
        match today.checked_add_months(Months::new(n)) {
            Some(d) if d <= target_date => break,
            _ => n -= 1,
        }
    }
    n
}

/// How much must be saved per month to reach `total_budget_target` by `target_date`.
pub(crate) fn monthly_savings_target(
    current_available: Decimal,
    total_budget_target: Decimal,
    target_date: NaiveDate,
    today: NaiveDate,
) -> SavingsTarget {
    let remaining_needed = total_budget_target
        .saturating_sub(current_available)
        .max(Decimal::ZERO);
    let months_remaining = months_between(today, target_date);
    let monthly_target = if months_remaining > 0 {
        remaining_needed
            .checked_div(Decimal::from(months_remaining))
            .unwrap_or(Decimal::ZERO)
    } else {
        Decimal::ZERO
    };
    SavingsTarget {
        remaining_needed,
        months_remaining,
        monthly_target,
    }
}

pub(crate) fn overview(
    lines: &[BudgetLine],
    months: &[FinanceMonth],
    settings: &PlanSettings,
    today: NaiveDate,
) -> Overview {
    let categories = categories_with_extras(lines.iter().map(|l| l.category.as_str()));
    let totals = grand_totals(lines);
    let savings = cumulative_savings(months);
    let current = current_available(&savings);
    let budget_target = settings.effective_target(totals.budgeted);
    let target = settings
        .target_date
        .map(|date| monthly_savings_target(current, budget_target, date, today));

    Overview {
        totals,
        breakdown: category_breakdown(lines, &categories)
            .into_iter()
            .filter(|row| row.line_count > 0)
            .collect(),
        pie: pie_series(lines, &categories),
        stale_months: cumulative_drift(months).len(),
        savings,
        current_available: current,
        budget_target,
        target,
    }
}

/// Equated monthly instalment for an amortizing loan, rounded to cents.
///
/// `annual_rate_pct` is a percentage (8.5 means 8.5% a year). A zero rate
/// splits the principal evenly; a zero tenure yields zero. When `(1+r)^n`
/// outgrows `Decimal` the instalment is taken at its limit, `P·r`.
pub(crate) fn loan_emi(principal: Decimal, annual_rate_pct: Decimal, tenure_months: u32) -> Decimal {
    if tenure_months == 0 || principal.is_zero() {
        return Decimal::ZERO;
    }
    let n = Decimal::from(tenure_months);
    let r = annual_rate_pct / Decimal::from(1200);
    if r.is_zero() {
        return (principal / n).round_dp(EMI_DP);
    }

    // growth / (growth - 1) tends to 1 as growth grows
    let mut growth = Some(Decimal::ONE);
    for _ in 0..tenure_months {
        growth = growth.and_then(|g| g.checked_mul(Decimal::ONE + r));
        if growth.is_none() {
            break;
        }
    }
    let ratio = growth
        .and_then(|g| g.checked_div(g - Decimal::ONE))
        .unwrap_or(Decimal::ONE);

    principal
        .saturating_mul(r)
        .saturating_mul(ratio)
        .round_dp(EMI_DP)
}

#[cfg(test)]
mod tests;
