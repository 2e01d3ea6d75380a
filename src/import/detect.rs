/// Column positions for a budget spreadsheet. Only category, item and
/// budgeted amount are required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LineColumns {
    pub(crate) category: usize,
    pub(crate) item: usize,
    pub(crate) budgeted: usize,
    pub(crate) actual: Option<usize>,
    pub(crate) status: Option<usize>,
    pub(crate) vendor: Option<usize>,
    pub(crate) payment_mode: Option<usize>,
    pub(crate) notes: Option<usize>,
}

const CATEGORY: &[&str] = &["category", "section", "event", "function"];
const ITEM: &[&str] = &["item", "item name", "item_name", "description", "expense"];
const BUDGETED: &[&str] = &["budgeted", "budget", "budgeted amount", "budgeted_amount", "planned", "estimate"];
const ACTUAL: &[&str] = &["actual", "actual amount", "actual_amount", "spent", "cost"];
const STATUS: &[&str] = &["status", "state"];
const VENDOR: &[&str] = &["vendor", "vendor name", "vendor_name", "supplier"];
const PAYMENT_MODE: &[&str] = &["payment mode", "payment_mode", "mode", "paid via"];
const NOTES: &[&str] = &["notes", "note", "remarks", "comments"];

/// Map header names to columns. Returns None if a required column is missing.
pub(crate) fn detect_columns(headers: &[String]) -> Option<LineColumns> {
    let h: Vec<String> = headers
        .iter()
        .map(|s| s.to_lowercase().trim().to_string())
        .collect();

    Some(LineColumns {
        category: col_index(&h, CATEGORY)?,
        item: col_index(&h, ITEM)?,
        budgeted: col_index(&h, BUDGETED)?,
        actual: col_index(&h, ACTUAL),
        status: col_index(&h, STATUS),
        vendor: col_index(&h, VENDOR),
        payment_mode: col_index(&h, PAYMENT_MODE),
        notes: col_index(&h, NOTES),
    })
}

fn col_index(headers: &[String], aliases: &[&str]) -> Option<usize> {
    headers.iter().position(|h| aliases.contains(&h.as_str()))
}

#[cfg(test)]
#[path = "detect_tests.rs"]
mod tests;
