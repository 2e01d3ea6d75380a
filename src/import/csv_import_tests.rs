#![allow(clippy::unwrap_used)]

use super::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::io::Write;

fn make_csv_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

// ── parse_decimal ─────────────────────────────────────────────

#[test]
fn test_parse_decimal_basic() {
    assert_eq!(parse_decimal("100.50").unwrap(), dec!(100.50));
    assert_eq!(parse_decimal("42").unwrap(), dec!(42));
}

#[test]
fn test_parse_decimal_with_currency() {
    assert_eq!(parse_decimal("$1,234.56").unwrap(), dec!(1234.56));
    assert_eq!(parse_decimal("₹2,50,000").unwrap(), dec!(250000));
    assert_eq!(parse_decimal("Rs. 15,000").unwrap(), dec!(15000));
}

#[test]
fn test_parse_decimal_empty() {
    assert_eq!(parse_decimal("").unwrap(), Decimal::ZERO);
    assert_eq!(parse_decimal("   ").unwrap(), Decimal::ZERO);
}

#[test]
fn test_parse_decimal_invalid() {
    assert!(parse_decimal("lots").is_err());
}

// ── read ──────────────────────────────────────────────────────

#[test]
fn test_read_full_sheet() {
    let file = make_csv_file(
        "Category,Item,Budgeted,Actual,Status,Vendor,Payment Mode,Notes\n\
         marriage,Venue,\"3,00,000\",\"1,50,000\",pending,Grand Palace,Bank Transfer,advance paid\n\
         Reception,Caterer,250000,,planned,,,\n",
    );
    let lines = LineCsv::read(file.path()).unwrap();
    assert_eq!(lines.len(), 2);

    assert_eq!(lines[0].category, "Marriage");
    assert_eq!(lines[0].item_name, "Venue");
    assert_eq!(lines[0].budgeted_amount, dec!(300000));
    assert_eq!(lines[0].actual_amount, dec!(150000));
    assert_eq!(lines[0].status, LineStatus::Pending);
    assert_eq!(lines[0].vendor_name.as_deref(), Some("Grand Palace"));
    assert_eq!(lines[0].payment_mode, Some(PaymentMode::BankTransfer));
    assert_eq!(lines[0].notes.as_deref(), Some("advance paid"));

    assert_eq!(lines[1].actual_amount, Decimal::ZERO);
    assert!(lines[1].vendor_name.is_none());
    assert!(lines[1].payment_mode.is_none());
}

#[test]
fn test_read_minimal_sheet_defaults() {
    let file = make_csv_file("Section,Description,Budget\nMehendi,Henna artist,12000\n");
    let lines = LineCsv::read(file.path()).unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].category, "Mehendi");
    assert_eq!(lines[0].status, LineStatus::Planned);
    assert_eq!(lines[0].actual_amount, Decimal::ZERO);
}

#[test]
fn test_read_skips_rows_without_item() {
    let file = make_csv_file("Category,Item,Budgeted\nDecor,,100\nDecor,Lights,200\n,,\n");
    let lines = LineCsv::read(file.path()).unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].item_name, "Lights");
}

#[test]
fn test_read_blank_category_becomes_other() {
    let file = make_csv_file("Category,Item,Budgeted\n,Gifts,5000\n");
    let lines = LineCsv::read(file.path()).unwrap();
    assert_eq!(lines[0].category, "Other");
}

#[test]
fn test_read_rejects_unknown_status() {
    let file = make_csv_file("Category,Item,Budgeted,Status\nDecor,Lights,200,maybe\n");
    let err = LineCsv::read(file.path()).unwrap_err();
    assert!(format!("{err:#}").contains("Row 2"));
}

#[test]
fn test_read_rejects_bad_amount() {
    let file = make_csv_file("Category,Item,Budgeted\nDecor,Lights,two hundred\n");
    assert!(LineCsv::read(file.path()).is_err());
}

#[test]
fn test_read_rejects_negative_amounts() {
    let file = make_csv_file("Category,Item,Budgeted,Actual\nDecor,Flowers,-5000,-100\n");
    let err = LineCsv::read(file.path()).unwrap_err();
    let msg = format!("{err:#}");
    assert!(msg.contains("Row 2: invalid budgeted amount"));
    assert!(msg.contains("cannot be negative"));

    let file = make_csv_file("Category,Item,Budgeted,Actual\nDecor,Flowers,5000,-100\n");
    let err = LineCsv::read(file.path()).unwrap_err();
    assert!(format!("{err:#}").contains("Row 2: invalid actual amount"));
}

#[test]
fn test_read_rejects_oversized_amount() {
    let file = make_csv_file(
        "Category,Item,Budgeted\nDecor,Hall,79228162514264337593543950335\n",
    );
    let err = LineCsv::read(file.path()).unwrap_err();
    assert!(format!("{err:#}").contains("too large"));
}

#[test]
fn test_read_missing_required_columns() {
    let file = make_csv_file("Name,Amount\nVenue,100\n");
    let err = LineCsv::read(file.path()).unwrap_err();
    assert!(err.to_string().contains("Missing required columns"));
}

#[test]
fn test_read_empty_file() {
    let file = make_csv_file("");
    assert!(LineCsv::read(file.path()).is_err());
}

// ── write ─────────────────────────────────────────────────────

#[test]
fn test_written_file_reads_back() {
    let mut venue = BudgetLine::new("Marriage".into(), "Venue, main hall".into(), dec!(300000));
    venue.actual_amount = dec!(310000.25);
    venue.status = LineStatus::Paid;
    venue.payment_mode = Some(PaymentMode::Upi);
    venue.vendor_name = Some("Grand Palace".into());
    let band = BudgetLine::new("Reception".into(), "Band".into(), dec!(40000));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lines.csv");
    assert_eq!(LineCsv::write(&path, &[venue.clone(), band.clone()]).unwrap(), 2);

    let lines = LineCsv::read(&path).unwrap();
    assert_eq!(lines, vec![venue, band]);
}
