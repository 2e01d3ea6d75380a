use rust_decimal::Decimal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineStatus {
    Planned,
    Pending,
    Paid,
}

impl LineStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Planned => "planned",
            Self::Pending => "pending",
            Self::Paid => "paid",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "planned" | "plan" => Some(Self::Planned),
            "pending" => Some(Self::Pending),
            "paid" | "done" => Some(Self::Paid),
            _ => None,
        }
    }

    pub fn all() -> &'static [LineStatus] {
        &[Self::Planned, Self::Pending, Self::Paid]
    }
}

impl std::fmt::Display for LineStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMode {
    Cash,
    Card,
    BankTransfer,
    Upi,
    Cheque,
    Other,
}

impl PaymentMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "Cash",
            Self::Card => "Card",
            Self::BankTransfer => "Bank Transfer",
            Self::Upi => "UPI",
            Self::Cheque => "Cheque",
            Self::Other => "Other",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "cash" => Self::Cash,
            "card" | "credit card" | "debit card" => Self::Card,
            "bank transfer" | "bank" | "transfer" | "neft" | "imps" => Self::BankTransfer,
            "upi" => Self::Upi,
            "cheque" | "check" => Self::Cheque,
            _ => Self::Other,
        }
    }
}

impl std::fmt::Display for PaymentMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One planned or realized expense.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetLine {
    pub id: Option<i64>,
    pub category: String,
    pub item_name: String,
    pub budgeted_amount: Decimal,
    pub actual_amount: Decimal,
    pub status: LineStatus,
    pub notes: Option<String>,
    pub vendor_name: Option<String>,
    pub payment_mode: Option<PaymentMode>,
}

impl BudgetLine {
    pub fn new(category: String, item_name: String, budgeted_amount: Decimal) -> Self {
        Self {
            id: None,
            category,
            item_name,
            budgeted_amount,
            actual_amount: Decimal::ZERO,
            status: LineStatus::Planned,
            notes: None,
            vendor_name: None,
            payment_mode: None,
        }
    }

    pub fn remaining(&self) -> Decimal {
        self.budgeted_amount.saturating_sub(self.actual_amount)
    }

    pub fn is_over_budget(&self) -> bool {
        self.actual_amount > self.budgeted_amount
    }
}
