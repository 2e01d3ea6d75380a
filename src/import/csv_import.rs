use anyhow::{Context, Result};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;

use super::detect::{detect_columns, LineColumns};
use crate::forms;
use crate::models::{canonical_category, BudgetLine, LineStatus, PaymentMode};

pub(crate) const EXPORT_HEADERS: [&str; 8] = [
    "Category",
    "Item",
    "Budgeted",
    "Actual",
    "Status",
    "Vendor",
    "Payment Mode",
    "Notes",
];

pub(crate) struct LineCsv;

impl LineCsv {
    /// Read a budget spreadsheet. The first row must be a header row.
    pub(crate) fn read(path: &Path) -> Result<Vec<BudgetLine>> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .has_headers(false)
            .from_path(path)
            .with_context(|| format!("Failed to open CSV file: {}", path.display()))?;

        let mut rows: Vec<Vec<String>> = Vec::new();
        for result in rdr.records() {
            let record = result.context("Failed to read CSV record")?;
            rows.push(record.iter().map(|s| s.to_string()).collect());
        }

        if rows.is_empty() {
            anyhow::bail!("CSV file is empty");
        }

        let headers = rows.remove(0);
        let columns = detect_columns(&headers).ok_or_else(|| {
            anyhow::anyhow!(
                "Missing required columns. Expected at least: Category, Item, Budgeted (found: {})",
                headers.join(", ")
            )
        })?;

        let lines = Self::parse(&rows, &columns)?;
        tracing::info!(path = %path.display(), lines = lines.len(), "budget CSV read");
        Ok(lines)
    }

    /// Convert data rows to budget lines. Rows without an item name are skipped.
    pub(crate) fn parse(rows: &[Vec<String>], columns: &LineColumns) -> Result<Vec<BudgetLine>> {
        let mut lines = Vec::new();

        for (i, row) in rows.iter().enumerate() {
            // Row numbers in messages count the header as row 1.
            let row_no = i + 2;
            let item = cell(row, Some(columns.item));
            if item.is_empty() {
                continue;
            }

            let budgeted = parse_decimal(&cell(row, Some(columns.budgeted)))
                .and_then(|v| forms::check_amount("budgeted amount", v))
                .with_context(|| format!("Row {row_no}: invalid budgeted amount"))?;
            let actual = parse_decimal(&cell(row, columns.actual))
                .and_then(|v| forms::check_amount("actual amount", v))
                .with_context(|| format!("Row {row_no}: invalid actual amount"))?;

            let status_raw = cell(row, columns.status);
            let status = if status_raw.is_empty() {
                LineStatus::Planned
            } else {
                LineStatus::parse(&status_raw).with_context(|| {
                    format!("Row {row_no}: unknown status '{status_raw}' (use planned, pending or paid)")
                })?
            };

            let mut category = canonical_category(&cell(row, Some(columns.category)));
            if category.is_empty() {
                category = "Other".into();
            }

            lines.push(BudgetLine {
                id: None,
                category,
                item_name: item,
                budgeted_amount: budgeted,
                actual_amount: actual,
                status,
                notes: non_empty(cell(row, columns.notes)),
                vendor_name: non_empty(cell(row, columns.vendor)),
                payment_mode: non_empty(cell(row, columns.payment_mode))
                    .map(|m| PaymentMode::parse(&m)),
            });
        }

        Ok(lines)
    }

    /// Write lines with the standard header set. Returns the number of rows written.
    pub(crate) fn write(path: &Path, lines: &[BudgetLine]) -> Result<usize> {
        let mut wtr = csv::Writer::from_path(path)
            .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;
        wtr.write_record(EXPORT_HEADERS)?;
        for line in lines {
            let budgeted = line.budgeted_amount.to_string();
            let actual = line.actual_amount.to_string();
            wtr.write_record([
                line.category.as_str(),
                line.item_name.as_str(),
                budgeted.as_str(),
                actual.as_str(),
                line.status.as_str(),
                line.vendor_name.as_deref().unwrap_or(""),
                line.payment_mode.map(|p| p.as_str()).unwrap_or(""),
                line.notes.as_deref().unwrap_or(""),
            ])?;
        }
        wtr.flush().context("Failed to flush CSV file")?;
        tracing::info!(path = %path.display(), lines = lines.len(), "budget CSV written");
        Ok(lines.len())
    }
}

fn cell(row: &[String], col: Option<usize>) -> String {
    col.and_then(|c| row.get(c))
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

/// Parse an amount cell. Currency symbols and thousands separators are
/// ignored and an empty cell is zero.
pub(crate) fn parse_decimal(s: &str) -> Result<Decimal> {
    let cleaned: String = s
        .replace(['$', '₹', ',', '"'], "")
        .trim()
        .to_string();
    let cleaned = cleaned.strip_prefix("Rs.").unwrap_or(cleaned.as_str()).trim();
    if cleaned.is_empty() {
        return Ok(Decimal::ZERO);
    }
    Decimal::from_str(cleaned).with_context(|| format!("Failed to parse '{s}' as decimal"))
}

#[cfg(test)]
#[path = "csv_import_tests.rs"]
mod tests;
