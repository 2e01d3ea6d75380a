use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Savings goal for the wedding, persisted in the `settings` table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlanSettings {
    /// `None` means "use the grand budgeted total".
    pub total_budget_target: Option<Decimal>,
    pub target_date: Option<NaiveDate>,
}

impl PlanSettings {
    pub fn effective_target(&self, grand_budgeted: Decimal) -> Decimal {
        self.total_budget_target.unwrap_or(grand_budgeted)
    }
}
