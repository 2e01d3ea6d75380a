use anyhow::Result;
use chrono::Local;
use std::fmt::Write as _;
use std::path::Path;

use crate::aggregate::{self, Overview};
use crate::db::Database;
use crate::forms;
use crate::import::LineCsv;
use crate::models::{canonical_category, BudgetLine, FinanceMonth};
use crate::ui::util::{format_amount, format_percent, truncate};

use super::{default_export_path, shellexpand};

pub(crate) fn as_cli(args: &[String], db: &mut Database) -> Result<()> {
    match args[1].as_str() {
        "summary" | "s" => cli_summary(db),
        "lines" | "l" => cli_lines(&args[2..], db),
        "add" => cli_add(&args[2..], db),
        "months" | "m" => cli_months(db),
        "add-month" => cli_add_month(&args[2..], db),
        "target" => cli_target(&args[2..], db),
        "import" => cli_import(&args[2..], db),
        "export" => cli_export(&args[2..], db),
        "reconcile" => cli_reconcile(db),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("weddingbudget {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("WeddingBudget - local-only wedding budget and savings tracker");
    println!();
    println!("Usage: weddingbudget [command]");
    println!();
    println!("Commands:");
    println!("  (none)                                   Launch interactive TUI");
    println!("  summary                                  Totals, categories and savings target");
    println!("  lines [category]                         List budget lines");
    println!("  add <category> <item> <budgeted> [actual] [status]");
    println!("                                           Add a budget line");
    println!("  months                                   List savings months");
    println!("  add-month <YYYY-MM> <salary> [bonus] [card_spent] [emi]");
    println!("                                           Record or update a month");
    println!("  target [amount|auto] [YYYY-MM-DD|none]   Show or set the savings target");
    println!("  import <file.csv>                        Import budget lines from CSV");
    println!("  export [path]                            Export budget lines to CSV");
    println!("  reconcile                                Rewrite stored running totals");
    println!("  --help, -h                               Show this help");
    println!("  --version, -V                            Show version");
}

fn load_overview(db: &Database) -> Result<Overview> {
    let lines = db.get_budget_lines()?;
    let months = db.get_finance_months()?;
    let settings = db.get_settings()?;
    Ok(aggregate::overview(
        &lines,
        &months,
        &settings,
        Local::now().date_naive(),
    ))
}

fn cli_summary(db: &mut Database) -> Result<()> {
    let overview = load_overview(db)?;
    let date = db.get_settings()?.target_date;
    print!("{}", summary_text(&overview, date));
    Ok(())
}

pub(crate) fn summary_text(ov: &Overview, target_date: Option<chrono::NaiveDate>) -> String {
    let mut out = String::new();
    let t = &ov.totals;
    let _ = writeln!(out, "WeddingBudget Summary");
    let _ = writeln!(out, "{}", "─".repeat(48));
    let _ = writeln!(out, "  Budgeted:     {}", format_amount(t.budgeted));
    let _ = writeln!(out, "  Actual:       {}", format_amount(t.actual));
    let _ = writeln!(out, "  Remaining:    {}", format_amount(t.remaining));
    let _ = writeln!(out, "  Utilization:  {}", format_percent(t.utilization()));

    if !ov.breakdown.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "By Category:");
        for row in &ov.breakdown {
            let flag = if row.totals.is_over_budget() { "  OVER" } else { "" };
            let _ = writeln!(
                out,
                "  {:<14} {:>16} / {:>16} {:>7}{flag}",
                truncate(&row.category, 14),
                format_amount(row.totals.actual),
                format_amount(row.totals.budgeted),
                format_percent(row.utilization),
            );
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Savings:");
    let _ = writeln!(out, "  Saved so far: {}", format_amount(ov.current_available));
    let _ = writeln!(out, "  Target:       {}", format_amount(ov.budget_target));
    match (ov.target, target_date) {
        (Some(st), Some(date)) => {
            let _ = writeln!(out, "  Wedding date: {date}");
            let _ = writeln!(out, "  Still needed: {}", format_amount(st.remaining_needed));
            let _ = writeln!(out, "  Months left:  {}", st.months_remaining);
            let _ = writeln!(out, "  Per month:    {}", format_amount(st.monthly_target));
        }
        _ => {
            let _ = writeln!(out, "  Set a wedding date with: weddingbudget target auto YYYY-MM-DD");
        }
    }
    if ov.stale_months > 0 {
        let _ = writeln!(
            out,
            "  Warning: {} month(s) have a stale stored total (run `weddingbudget reconcile`)",
            ov.stale_months
        );
    }
    out
}

pub(crate) fn lines_table(lines: &[BudgetLine]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<4} {:<12} {:<24} {:>14} {:>14} {:<8}",
        "ID", "Category", "Item", "Budgeted", "Actual", "Status"
    );
    let _ = writeln!(out, "{}", "─".repeat(81));
    for line in lines {
        let _ = writeln!(
            out,
            "{:<4} {:<12} {:<24} {:>14} {:>14} {:<8}{}",
            line.id.unwrap_or(0),
            truncate(&line.category, 12),
            truncate(&line.item_name, 24),
            format_amount(line.budgeted_amount),
            format_amount(line.actual_amount),
            line.status.as_str(),
            if line.is_over_budget() { " !" } else { "" },
        );
    }
    out
}

fn cli_lines(args: &[String], db: &mut Database) -> Result<()> {
    let mut lines = db.get_budget_lines()?;
    if let Some(category) = args.first() {
        let category = canonical_category(category);
        lines.retain(|l| l.category == category);
    }
    if lines.is_empty() {
        println!("No budget lines");
        return Ok(());
    }
    print!("{}", lines_table(&lines));
    Ok(())
}

fn cli_add(args: &[String], db: &mut Database) -> Result<()> {
    if args.len() < 3 || args.len() > 5 {
        anyhow::bail!("Usage: weddingbudget add <category> <item> <budgeted> [actual] [status]");
    }
    let line = forms::line_from_fields(
        &args[0],
        &args[1],
        &args[2],
        args.get(3).map(String::as_str),
        args.get(4).map(String::as_str),
    )?;
    let id = db.insert_budget_line(&line)?;
    println!(
        "Added #{id}: {} / {} ({})",
        line.category,
        line.item_name,
        format_amount(line.budgeted_amount)
    );
    Ok(())
}

pub(crate) fn months_table(months: &[FinanceMonth]) -> String {
    let points = aggregate::cumulative_savings(months);
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<8} {:>14} {:>12} {:>12} {:>14} {:>16}",
        "Month", "Salary", "EMI", "Card", "Available", "Cumulative"
    );
    let _ = writeln!(out, "{}", "─".repeat(81));
    for point in &points {
        let Some(m) = months.iter().find(|m| m.month_year == point.month_year) else {
            continue;
        };
        let stale = if m.cumulative_available != point.cumulative_available {
            " *"
        } else {
            ""
        };
        let _ = writeln!(
            out,
            "{:<8} {:>14} {:>12} {:>12} {:>14} {:>16}{stale}",
            m.month_key(),
            format_amount(m.monthly_salary),
            format_amount(m.monthly_emi),
            format_amount(m.credit_card_spent),
            format_amount(point.available_funds_month),
            format_amount(point.cumulative_available),
        );
    }
    out
}

fn cli_months(db: &mut Database) -> Result<()> {
    let months = db.get_finance_months()?;
    if months.is_empty() {
        println!("No months recorded");
        return Ok(());
    }
    print!("{}", months_table(&months));
    Ok(())
}

fn cli_add_month(args: &[String], db: &mut Database) -> Result<()> {
    if args.len() < 2 {
        anyhow::bail!(
            "Usage: weddingbudget add-month <YYYY-MM> <salary> [bonus] [card_spent] [emi]"
        );
    }
    let date = forms::parse_month(&args[0])?;
    let mut month = db
        .get_finance_month(date)?
        .unwrap_or_else(|| FinanceMonth::new(date));
    let fields: Vec<&str> = args[1..].iter().map(String::as_str).collect();
    forms::apply_month_fields(&mut month, &fields)?;
    db.upsert_finance_month(&month)?;
    println!(
        "{}: available {}",
        month.month_key(),
        format_amount(month.available_funds_month)
    );
    Ok(())
}

fn cli_target(args: &[String], db: &mut Database) -> Result<()> {
    if args.len() > 2 {
        anyhow::bail!("Usage: weddingbudget target [amount|auto] [YYYY-MM-DD|none]");
    }
    if !args.is_empty() {
        let mut settings = db.get_settings()?;
        settings.total_budget_target = forms::parse_target_amount(&args[0])?;
        if let Some(date) = args.get(1) {
            settings.target_date = forms::parse_target_date(date)?;
        }
        db.save_settings(&settings)?;
    }

    let overview = load_overview(db)?;
    let settings = db.get_settings()?;
    println!("Target:       {}", format_amount(overview.budget_target));
    match (overview.target, settings.target_date) {
        (Some(st), Some(date)) => {
            println!("Wedding date: {date}");
            println!("Still needed: {}", format_amount(st.remaining_needed));
            println!("Months left:  {}", st.months_remaining);
            println!("Per month:    {}", format_amount(st.monthly_target));
        }
        _ => println!("Wedding date: not set"),
    }
    Ok(())
}

fn cli_import(args: &[String], db: &mut Database) -> Result<()> {
    let Some(file_path) = args.first() else {
        anyhow::bail!("Usage: weddingbudget import <file.csv>");
    };
    let path = shellexpand(file_path);
    if !Path::new(&path).exists() {
        anyhow::bail!("File not found: {path}");
    }

    let lines = LineCsv::read(Path::new(&path))?;
    println!("Parsed {} budget lines", lines.len());
    let count = db.insert_budget_lines_batch(&lines)?;
    tracing::info!(count, path = %path, "imported budget lines");
    println!("Imported {count} budget lines");
    Ok(())
}

fn cli_export(args: &[String], db: &mut Database) -> Result<()> {
    let output_path = args
        .first()
        .map(|a| shellexpand(a))
        .unwrap_or_else(default_export_path);

    let lines = db.get_budget_lines()?;
    if lines.is_empty() {
        println!("No budget lines to export");
        return Ok(());
    }
    let count = LineCsv::write(Path::new(&output_path), &lines)?;
    println!("Exported {count} budget lines to {output_path}");
    Ok(())
}

fn cli_reconcile(db: &mut Database) -> Result<()> {
    let fixed = db.refresh_cumulative_cache()?;
    println!("Reconciled {fixed} month(s)");
    Ok(())
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
