pub(crate) const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS budget_lines (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    category        TEXT NOT NULL,
    item_name       TEXT NOT NULL,
    budgeted_amount TEXT NOT NULL DEFAULT '0',
    actual_amount   TEXT NOT NULL DEFAULT '0',
    status          TEXT NOT NULL DEFAULT 'planned',
    notes           TEXT,
    vendor_name     TEXT,
    payment_mode    TEXT
);

CREATE INDEX IF NOT EXISTS idx_budget_lines_category ON budget_lines(category);

CREATE TABLE IF NOT EXISTS finance_months (
    id                    INTEGER PRIMARY KEY AUTOINCREMENT,
    month_year            TEXT NOT NULL UNIQUE,
    monthly_salary        TEXT NOT NULL DEFAULT '0',
    loan_amount           TEXT NOT NULL DEFAULT '0',
    loan_interest_rate    TEXT NOT NULL DEFAULT '0',
    loan_tenure_months    INTEGER NOT NULL DEFAULT 0,
    monthly_emi           TEXT NOT NULL DEFAULT '0',
    cash_holding_1        TEXT NOT NULL DEFAULT '0',
    cash_holding_2        TEXT NOT NULL DEFAULT '0',
    credit_card_spent     TEXT NOT NULL DEFAULT '0',
    bonus_income          TEXT NOT NULL DEFAULT '0',
    available_funds_month TEXT NOT NULL DEFAULT '0',
    cumulative_available  TEXT NOT NULL DEFAULT '0'
);

CREATE TABLE IF NOT EXISTS settings (
    key   TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;

pub(crate) const KEY_BUDGET_TARGET: &str = "total_budget_target";
pub(crate) const KEY_TARGET_DATE: &str = "target_date";
