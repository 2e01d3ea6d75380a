use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use super::app::{App, InputMode, PendingAction, Screen};
use crate::db::Database;
use crate::forms;
use crate::import::LineCsv;
use crate::models::{canonical_category, BudgetLine, FinanceMonth, PaymentMode};
use crate::run::{default_export_path, shellexpand};
use crate::ui::util::format_amount;

pub(crate) struct Command {
    pub(crate) description: &'static str,
    pub(crate) run: fn(&str, &mut App, &mut Database) -> anyhow::Result<()>,
}

macro_rules! register_command {
    ($name:expr, $desc:expr, $func:expr, $registry:expr) => {{
        $registry.insert(
            $name,
            Command {
                description: $desc,
                run: $func,
            },
        );
    }};
}

pub(crate) static COMMANDS: LazyLock<HashMap<&str, Command>> = LazyLock::new(|| {
    let mut r: HashMap<&str, Command> = HashMap::new();

    register_command!("q", "Quit WeddingBudget", cmd_quit, r);
    register_command!("quit", "Quit WeddingBudget", cmd_quit, r);
    register_command!("d", "Go to Dashboard", cmd_dashboard, r);
    register_command!("dashboard", "Go to Dashboard", cmd_dashboard, r);
    register_command!("b", "Go to Budget lines", cmd_budget, r);
    register_command!("budget", "Go to Budget lines", cmd_budget, r);
    register_command!("s", "Go to Savings", cmd_savings, r);
    register_command!("savings", "Go to Savings", cmd_savings, r);
    register_command!("h", "Show available commands", cmd_help, r);
    register_command!("help", "Show available commands", cmd_help, r);
    register_command!(
        "add",
        "Add line (e.g. :add Decor | Flowers | 30000 [| actual] [| status])",
        cmd_add,
        r
    );
    register_command!("actual", "Set actual spend on selected line", cmd_actual, r);
    register_command!("budgeted", "Set budgeted amount on selected line", cmd_budgeted, r);
    register_command!(
        "status",
        "Set status on selected line (planned/pending/paid)",
        cmd_status,
        r
    );
    register_command!("vendor", "Set vendor on selected line (- clears)", cmd_vendor, r);
    register_command!("note", "Set notes on selected line (- clears)", cmd_note, r);
    register_command!("pay", "Set payment mode on selected line (- clears)", cmd_pay, r);
    register_command!("delete", "Delete selected budget line", cmd_delete, r);
    register_command!(
        "filter",
        "Filter lines by category (no argument clears)",
        cmd_filter,
        r
    );
    register_command!(
        "month",
        "Record month (e.g. :month 2025-01 90000 [bonus] [card] [emi])",
        cmd_month,
        r
    );
    register_command!(
        "loan",
        "Set loan and derive EMI (e.g. :loan 2025-01 500000 9.5 36)",
        cmd_loan,
        r
    );
    register_command!(
        "cash",
        "Set cash holdings (e.g. :cash 2025-01 20000 [5000])",
        cmd_cash,
        r
    );
    register_command!("delete-month", "Delete selected savings month", cmd_delete_month, r);
    register_command!(
        "target",
        "Set total budget target (auto uses grand budgeted)",
        cmd_target,
        r
    );
    register_command!("date", "Set wedding date (e.g. :date 2026-02-14, none clears)", cmd_date, r);
    register_command!("import", "Import budget lines (e.g. :import ~/lines.csv)", cmd_import, r);
    register_command!("export", "Export budget lines to CSV", cmd_export, r);
    register_command!(
        "reconcile",
        "Rewrite stored cumulative savings",
        cmd_reconcile,
        r
    );

    r
});

pub(crate) fn handle_command(input: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let trimmed = input.trim();
    let mut parts = trimmed.splitn(2, ' ');
    let cmd_name = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    if let Some(cmd) = COMMANDS.get(cmd_name) {
        if let Err(e) = (cmd.run)(args, app, db) {
            tracing::warn!(command = cmd_name, error = %e, "command failed");
            app.set_status(format!("Error: {e}"));
        }
    } else {
        let suggestion = find_closest(cmd_name);
        app.set_status(format!(
            "Unknown command: :{cmd_name}. Did you mean :{suggestion}?"
        ));
    }

    Ok(())
}

fn find_closest(input: &str) -> String {
    COMMANDS
        .keys()
        .filter(|k| k.len() > 1)
        .min_by_key(|k| levenshtein(input, k))
        .unwrap_or(&"help")
        .to_string()
}

fn levenshtein(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Run the action the user just confirmed with `y`.
pub(crate) fn confirm_pending(app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if let Some(action) = app.pending_action.take() {
        match action {
            PendingAction::DeleteLine { id, name } => {
                db.delete_budget_line(id)?;
                tracing::info!(id, "deleted budget line");
                app.refresh_all(db)?;
                app.set_status(format!("Deleted: {name}"));
            }
            PendingAction::DeleteMonth { id, month } => {
                db.delete_finance_month(id)?;
                tracing::info!(id, "deleted finance month");
                app.refresh_all(db)?;
                app.set_status(format!("Deleted month {month}"));
            }
        }
    }
    app.input_mode = InputMode::Normal;
    app.confirm_message.clear();
    Ok(())
}

pub(crate) fn cancel_pending(app: &mut App) {
    app.pending_action = None;
    app.input_mode = InputMode::Normal;
    app.confirm_message.clear();
    app.set_status("Cancelled");
}

// ── Navigation ───────────────────────────────────────────────

fn cmd_quit(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.running = false;
    Ok(())
}

fn cmd_dashboard(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Dashboard;
    app.refresh_all(db)
}

fn cmd_budget(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Budget;
    app.refresh_all(db)
}

fn cmd_savings(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Savings;
    app.refresh_all(db)
}

fn cmd_help(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.show_help = true;
    Ok(())
}

// ── Budget lines ─────────────────────────────────────────────

fn cmd_add(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let fields: Vec<&str> = args.split('|').map(str::trim).collect();
    if fields.len() < 3 || fields.len() > 5 {
        app.set_status("Usage: :add <category> | <item> | <budgeted> [| actual] [| status]");
        return Ok(());
    }

    let line = forms::line_from_fields(
        fields[0],
        fields[1],
        fields[2],
        fields.get(3).copied().filter(|s| !s.is_empty()),
        fields.get(4).copied().filter(|s| !s.is_empty()),
    )?;
    let id = db.insert_budget_line(&line)?;
    tracing::info!(id, category = %line.category, "added budget line");

    app.screen = Screen::Budget;
    app.refresh_all(db)?;
    if let Some(pos) = app.visible_lines().iter().position(|l| l.id == Some(id)) {
        app.line_index = pos;
    }
    app.set_status(format!(
        "Added {} / {} ({})",
        line.category,
        line.item_name,
        format_amount(line.budgeted_amount)
    ));
    Ok(())
}

/// Apply `edit` to the line under the cursor and save it. Only the Budget
/// screen shows a cursor, so other screens are refused.
fn update_selected(
    app: &mut App,
    db: &mut Database,
    edit: impl FnOnce(&mut BudgetLine) -> anyhow::Result<()>,
) -> anyhow::Result<()> {
    if app.screen != Screen::Budget {
        app.set_status("Navigate to Budget and select a line first");
        return Ok(());
    }
    let Some(mut line) = app.selected_line().cloned() else {
        app.set_status("Select a budget line first (:b)");
        return Ok(());
    };
    edit(&mut line)?;
    db.update_budget_line(&line)?;
    app.refresh_all(db)?;
    app.set_status(format!("Updated {}", line.item_name));
    Ok(())
}

fn cmd_actual(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let amount = forms::parse_amount("actual amount", args)?;
    update_selected(app, db, |line| {
        line.actual_amount = amount;
        Ok(())
    })
}

fn cmd_budgeted(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let amount = forms::parse_amount("budgeted amount", args)?;
    update_selected(app, db, |line| {
        line.budgeted_amount = amount;
        Ok(())
    })
}

fn cmd_status(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let status = forms::parse_status(args)?;
    update_selected(app, db, |line| {
        line.status = status;
        Ok(())
    })
}

fn optional_text(args: &str) -> Option<String> {
    match args.trim() {
        "" | "-" => None,
        s => Some(s.to_string()),
    }
}

fn cmd_vendor(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    update_selected(app, db, |line| {
        line.vendor_name = optional_text(args);
        Ok(())
    })
}

fn cmd_note(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    update_selected(app, db, |line| {
        line.notes = optional_text(args);
        Ok(())
    })
}

fn cmd_pay(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    update_selected(app, db, |line| {
        line.payment_mode = optional_text(args).map(|m| PaymentMode::parse(&m));
        Ok(())
    })
}

fn cmd_delete(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    if app.screen != Screen::Budget {
        app.set_status("Navigate to Budget and select a line first");
        return Ok(());
    }
    let Some((id, name)) = app
        .selected_line()
        .and_then(|l| l.id.map(|id| (id, l.item_name.clone())))
    else {
        app.set_status("No budget line selected");
        return Ok(());
    };
    app.ask_confirm(
        PendingAction::DeleteLine {
            id,
            name: name.clone(),
        },
        format!("Delete '{name}'?"),
    );
    Ok(())
}

fn cmd_filter(args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Budget;
    app.line_index = 0;
    app.line_scroll = 0;
    if args.is_empty() {
        app.category_filter = None;
        app.set_status("Showing all categories");
    } else {
        let category = canonical_category(args);
        app.set_status(format!("Filtered to {category}"));
        app.category_filter = Some(category);
    }
    app.recompute();
    Ok(())
}

// ── Savings months ───────────────────────────────────────────

/// Load the month named by the first argument, or a blank one if it is new.
fn month_for_edit(db: &Database, key: &str) -> anyhow::Result<FinanceMonth> {
    let date = forms::parse_month(key)?;
    Ok(db
        .get_finance_month(date)?
        .unwrap_or_else(|| FinanceMonth::new(date)))
}

fn save_month(app: &mut App, db: &mut Database, month: &FinanceMonth) -> anyhow::Result<()> {
    db.upsert_finance_month(month)?;
    app.screen = Screen::Savings;
    app.refresh_all(db)?;
    if let Some(pos) = app
        .overview
        .savings
        .iter()
        .position(|p| p.month_year == month.month_year)
    {
        app.month_index = pos;
    }
    app.set_status(format!(
        "{}: available {}",
        month.month_key(),
        format_amount(month.available_funds_month)
    ));
    Ok(())
}

fn cmd_month(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let parts: Vec<&str> = args.split_whitespace().collect();
    if parts.len() < 2 {
        app.set_status("Usage: :month <YYYY-MM> <salary> [bonus] [card_spent] [emi]");
        return Ok(());
    }
    let mut month = month_for_edit(db, parts[0])?;
    forms::apply_month_fields(&mut month, &parts[1..])?;
    save_month(app, db, &month)
}

fn cmd_loan(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let parts: Vec<&str> = args.split_whitespace().collect();
    if parts.len() != 4 {
        app.set_status("Usage: :loan <YYYY-MM> <amount> <annual rate %> <tenure months>");
        return Ok(());
    }
    let mut month = month_for_edit(db, parts[0])?;
    forms::apply_loan(&mut month, parts[1], parts[2], parts[3])?;
    save_month(app, db, &month)
}

fn cmd_cash(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let parts: Vec<&str> = args.split_whitespace().collect();
    if parts.len() < 2 || parts.len() > 3 {
        app.set_status("Usage: :cash <YYYY-MM> <holding 1> [holding 2]");
        return Ok(());
    }
    let mut month = month_for_edit(db, parts[0])?;
    forms::apply_cash(&mut month, parts[1], parts.get(2).copied())?;
    save_month(app, db, &month)
}

fn cmd_delete_month(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    if app.screen != Screen::Savings {
        app.set_status("Navigate to Savings and select a month first");
        return Ok(());
    }
    let Some((id, month)) = app
        .selected_month()
        .and_then(|m| m.id.map(|id| (id, m.month_key())))
    else {
        app.set_status("No month selected");
        return Ok(());
    };
    app.ask_confirm(
        PendingAction::DeleteMonth {
            id,
            month: month.clone(),
        },
        format!("Delete savings for {month}?"),
    );
    Ok(())
}

fn cmd_reconcile(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let fixed = db.refresh_cumulative_cache()?;
    app.refresh_all(db)?;
    app.set_status(format!("Reconciled {fixed} month(s)"));
    Ok(())
}

// ── Plan settings ────────────────────────────────────────────

fn cmd_target(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let mut settings = app.settings.clone();
    settings.total_budget_target = forms::parse_target_amount(args)?;
    db.save_settings(&settings)?;
    app.refresh_all(db)?;
    let msg = match settings.total_budget_target {
        Some(t) => format!("Budget target set to {}", format_amount(t)),
        None => format!(
            "Budget target follows grand budgeted ({})",
            format_amount(app.overview.budget_target)
        ),
    };
    app.set_status(msg);
    Ok(())
}

fn cmd_date(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let mut settings = app.settings.clone();
    settings.target_date = forms::parse_target_date(args)?;
    db.save_settings(&settings)?;
    app.refresh_all(db)?;
    let msg = match settings.target_date {
        Some(d) => format!("Wedding date set to {d}"),
        None => "Wedding date cleared".to_string(),
    };
    app.set_status(msg);
    Ok(())
}

// ── CSV ──────────────────────────────────────────────────────

fn cmd_import(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status("Usage: :import <file.csv>");
        return Ok(());
    }
    let path = shellexpand(args);
    let lines = LineCsv::read(Path::new(&path))?;
    let count = db.insert_budget_lines_batch(&lines)?;
    tracing::info!(count, path = %path, "imported budget lines");
    app.screen = Screen::Budget;
    app.refresh_all(db)?;
    app.set_status(format!("Imported {count} budget lines from {path}"));
    Ok(())
}

fn cmd_export(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let path = if args.is_empty() {
        default_export_path()
    } else {
        shellexpand(args)
    };
    let lines = db.get_budget_lines()?;
    if lines.is_empty() {
        app.set_status("No budget lines to export");
        return Ok(());
    }
    let count = LineCsv::write(Path::new(&path), &lines)?;
    app.set_status(format!("Exported {count} budget lines to {path}"));
    Ok(())
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
