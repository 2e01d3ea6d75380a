use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

/// One calendar month of savings tracking, keyed by the first day of the month.
#[derive(Debug, Clone, PartialEq)]
pub struct FinanceMonth {
    pub id: Option<i64>,
    pub month_year: NaiveDate,
    pub monthly_salary: Decimal,
    pub loan_amount: Decimal,
    /// Annual rate in percent, e.g. `8.5`.
    pub loan_interest_rate: Decimal,
    pub loan_tenure_months: u32,
    pub monthly_emi: Decimal,
    pub cash_holding_1: Decimal,
    pub cash_holding_2: Decimal,
    pub credit_card_spent: Decimal,
    pub bonus_income: Decimal,
    pub available_funds_month: Decimal,
    /// Cached running total as last written to the store. Display only;
    /// `aggregate::cumulative_savings` is authoritative.
    pub cumulative_available: Decimal,
}

impl FinanceMonth {
    /// An all-zero month. `month_year` is normalized to the first of its month.
    pub fn new(month_year: NaiveDate) -> Self {
        Self {
            id: None,
            month_year: first_of_month(month_year),
            monthly_salary: Decimal::ZERO,
            loan_amount: Decimal::ZERO,
            loan_interest_rate: Decimal::ZERO,
            loan_tenure_months: 0,
            monthly_emi: Decimal::ZERO,
            cash_holding_1: Decimal::ZERO,
            cash_holding_2: Decimal::ZERO,
            credit_card_spent: Decimal::ZERO,
            bonus_income: Decimal::ZERO,
            available_funds_month: Decimal::ZERO,
            cumulative_available: Decimal::ZERO,
        }
    }

    /// Net cash available this month: inflows and holdings minus EMI and card spend.
    pub fn compute_available(&self) -> Decimal {
        self.monthly_salary
            .saturating_add(self.bonus_income)
            .saturating_add(self.cash_holding_1)
            .saturating_add(self.cash_holding_2)
            .saturating_sub(self.monthly_emi)
            .saturating_sub(self.credit_card_spent)
    }

    pub fn recompute_available(&mut self) {
        self.available_funds_month = self.compute_available();
    }

    /// "YYYY-MM"
    pub fn month_key(&self) -> String {
        self.month_year.format("%Y-%m").to_string()
    }
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Parse "YYYY-MM" (or a full "YYYY-MM-DD") into the first day of that month.
pub fn parse_month_key(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .ok()
        .map(first_of_month)
}
