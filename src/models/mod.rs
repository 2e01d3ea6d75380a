mod budget_line;
mod category;
mod finance_month;
mod settings;

pub use budget_line::{BudgetLine, LineStatus, PaymentMode};
pub use category::{canonical_category, categories_with_extras, DEFAULT_CATEGORIES};
pub use finance_month::{first_of_month, parse_month_key, FinanceMonth};
pub use settings::PlanSettings;
