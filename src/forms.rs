//! Input validation for values typed at the command bar or on the CLI.
//!
//! The aggregator trusts its inputs, so anything negative or malformed has to
//! be rejected here before it reaches the store.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::aggregate;
use crate::import::parse_decimal;
use crate::models::{canonical_category, parse_month_key, BudgetLine, FinanceMonth, LineStatus};

/// Largest amount any money field accepts.
const MAX_AMOUNT: i64 = 1_000_000_000_000;
/// Loans run at most 50 years.
const MAX_TENURE_MONTHS: u32 = 600;
const MAX_INTEREST_RATE: i64 = 100;

/// Parse a money amount. Must be zero or positive.
pub(crate) fn parse_amount(field: &str, input: &str) -> Result<Decimal> {
    let value = parse_decimal(input).with_context(|| format!("Invalid {field}: {input}"))?;
    check_amount(field, value)
}

/// Range check shared by typed input and CSV import.
pub(crate) fn check_amount(field: &str, value: Decimal) -> Result<Decimal> {
    if value < Decimal::ZERO {
        anyhow::bail!("{field} cannot be negative: {value}");
    }
    if value > Decimal::from(MAX_AMOUNT) {
        anyhow::bail!("{field} is too large: {value} (max {MAX_AMOUNT})");
    }
    Ok(value)
}

pub(crate) fn parse_status(input: &str) -> Result<LineStatus> {
    LineStatus::parse(input)
        .ok_or_else(|| anyhow::anyhow!("Unknown status '{input}'. Use planned, pending or paid"))
}

pub(crate) fn parse_month(input: &str) -> Result<NaiveDate> {
    parse_month_key(input)
        .ok_or_else(|| anyhow::anyhow!("Invalid month '{input}'. Use YYYY-MM (e.g. 2025-01)"))
}

/// A new budget line from raw fields. `actual` and `status` are optional.
pub(crate) fn line_from_fields(
    category: &str,
    item: &str,
    budgeted: &str,
    actual: Option<&str>,
    status: Option<&str>,
) -> Result<BudgetLine> {
    let category = canonical_category(category);
    if category.is_empty() {
        anyhow::bail!("Category is required");
    }
    let item = item.trim();
    if item.is_empty() {
        anyhow::bail!("Item name is required");
    }

    let mut line = BudgetLine::new(category, item.to_string(), parse_amount("budgeted amount", budgeted)?);
    if let Some(a) = actual {
        line.actual_amount = parse_amount("actual amount", a)?;
    }
    if let Some(s) = status {
        line.status = parse_status(s)?;
    }
    Ok(line)
}

/// Apply `<salary> [bonus] [card_spent] [emi]` to a month. Missing trailing
/// fields keep their current values.
pub(crate) fn apply_month_fields(month: &mut FinanceMonth, fields: &[&str]) -> Result<()> {
    if fields.is_empty() {
        anyhow::bail!("Monthly salary is required");
    }
    if fields.len() > 4 {
        anyhow::bail!("Too many values: expected <salary> [bonus] [card_spent] [emi]");
    }
    month.monthly_salary = parse_amount("salary", fields[0])?;
    if let Some(v) = fields.get(1) {
        month.bonus_income = parse_amount("bonus", v)?;
    }
    if let Some(v) = fields.get(2) {
        month.credit_card_spent = parse_amount("credit card spend", v)?;
    }
    if let Some(v) = fields.get(3) {
        month.monthly_emi = parse_amount("EMI", v)?;
    }
    month.recompute_available();
    Ok(())
}

/// Record a loan on a month and derive its EMI.
pub(crate) fn apply_loan(month: &mut FinanceMonth, amount: &str, rate: &str, tenure: &str) -> Result<()> {
    let loan_amount = parse_amount("loan amount", amount)?;
    let rate_pct = parse_amount("interest rate", rate)?;
    if rate_pct > Decimal::from(MAX_INTEREST_RATE) {
        anyhow::bail!("Interest rate must be at most {MAX_INTEREST_RATE}%: {rate}");
    }
    let tenure_months: u32 = tenure
        .trim()
        .parse()
        .with_context(|| format!("Invalid tenure in months: {tenure}"))?;
    if tenure_months > MAX_TENURE_MONTHS {
        anyhow::bail!("Tenure must be at most {MAX_TENURE_MONTHS} months: {tenure}");
    }
    month.loan_amount = loan_amount;
    month.loan_interest_rate = rate_pct;
    month.loan_tenure_months = tenure_months;
    month.monthly_emi = aggregate::loan_emi(
        month.loan_amount,
        month.loan_interest_rate,
        month.loan_tenure_months,
    );
    month.recompute_available();
    Ok(())
}

pub(crate) fn apply_cash(month: &mut FinanceMonth, holding_1: &str, holding_2: Option<&str>) -> Result<()> {
    month.cash_holding_1 = parse_amount("cash holding", holding_1)?;
    if let Some(h2) = holding_2 {
        month.cash_holding_2 = parse_amount("cash holding", h2)?;
    }
    month.recompute_available();
    Ok(())
}

/// `auto` (or empty) clears the explicit target so the grand budget is used.
pub(crate) fn parse_target_amount(input: &str) -> Result<Option<Decimal>> {
    let trimmed = input.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("auto") {
        return Ok(None);
    }
    parse_amount("target amount", trimmed).map(Some)
}

/// `none` (or empty) clears the target date.
pub(crate) fn parse_target_date(input: &str) -> Result<Option<NaiveDate>> {
    let trimmed = input.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(Some)
        .with_context(|| format!("Invalid date '{trimmed}'. Use YYYY-MM-DD"))
}

#[cfg(test)]
#[path = "forms_tests.rs"]
mod tests;
