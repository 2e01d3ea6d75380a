mod schema;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;

use crate::aggregate;
use crate::models::*;

pub(crate) struct Database {
    conn: Connection,
}

const LINE_COLUMNS: &str = "id, category, item_name, budgeted_amount, actual_amount, status, notes, vendor_name, payment_mode";

const MONTH_COLUMNS: &str = "id, month_year, monthly_salary, loan_amount, loan_interest_rate, loan_tenure_months,
     monthly_emi, cash_holding_1, cash_holding_2, credit_card_spent, bonus_income,
     available_funds_month, cumulative_available";

fn decimal_at(row: &Row, idx: usize) -> rusqlite::Result<Decimal> {
    let s: String = row.get(idx)?;
    Ok(Decimal::from_str(&s).unwrap_or_default())
}

fn date_at(row: &Row, idx: usize) -> rusqlite::Result<NaiveDate> {
    let s: String = row.get(idx)?;
    NaiveDate::parse_from_str(&s, "%Y-%m-%d").map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn line_from_row(row: &Row) -> rusqlite::Result<BudgetLine> {
    let status: String = row.get(5)?;
    let payment_mode: Option<String> = row.get(8)?;
    Ok(BudgetLine {
        id: Some(row.get(0)?),
        category: row.get(1)?,
        item_name: row.get(2)?,
        budgeted_amount: decimal_at(row, 3)?,
        actual_amount: decimal_at(row, 4)?,
        status: LineStatus::parse(&status).unwrap_or(LineStatus::Planned),
        notes: row.get(6)?,
        vendor_name: row.get(7)?,
        payment_mode: payment_mode.as_deref().map(PaymentMode::parse),
    })
}

fn month_from_row(row: &Row) -> rusqlite::Result<FinanceMonth> {
    Ok(FinanceMonth {
        id: Some(row.get(0)?),
        month_year: date_at(row, 1)?,
        monthly_salary: decimal_at(row, 2)?,
        loan_amount: decimal_at(row, 3)?,
        loan_interest_rate: decimal_at(row, 4)?,
        loan_tenure_months: row.get(5)?,
        monthly_emi: decimal_at(row, 6)?,
        cash_holding_1: decimal_at(row, 7)?,
        cash_holding_2: decimal_at(row, 8)?,
        credit_card_spent: decimal_at(row, 9)?,
        bonus_income: decimal_at(row, 10)?,
        available_funds_month: decimal_at(row, 11)?,
        cumulative_available: decimal_at(row, 12)?,
    })
}

fn month_key(date: NaiveDate) -> String {
    first_of_month(date).format("%Y-%m-%d").to_string()
}

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .context("Failed to set database pragmas")?;
        let db = Self { conn };
        db.create_schema().context("Failed to create database schema")?;
        tracing::info!(path = %path.display(), "database opened");
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.create_schema()?;
        Ok(db)
    }

    fn create_schema(&self) -> Result<()> {
        self.conn.execute_batch(schema::SCHEMA)?;
        Ok(())
    }

    // ── Budget lines ──────────────────────────────────────────

    pub(crate) fn insert_budget_line(&self, line: &BudgetLine) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO budget_lines (category, item_name, budgeted_amount, actual_amount, status, notes, vendor_name, payment_mode)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                line.category,
                line.item_name,
                line.budgeted_amount.to_string(),
                line.actual_amount.to_string(),
                line.status.as_str(),
                line.notes,
                line.vendor_name,
                line.payment_mode.map(|p| p.as_str()),
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::debug!(id, category = %line.category, item = %line.item_name, "budget line inserted");
        Ok(id)
    }

    pub(crate) fn insert_budget_lines_batch(&mut self, lines: &[BudgetLine]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        for line in lines {
            tx.execute(
                "INSERT INTO budget_lines (category, item_name, budgeted_amount, actual_amount, status, notes, vendor_name, payment_mode)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    line.category,
                    line.item_name,
                    line.budgeted_amount.to_string(),
                    line.actual_amount.to_string(),
                    line.status.as_str(),
                    line.notes,
                    line.vendor_name,
                    line.payment_mode.map(|p| p.as_str()),
                ],
            )?;
        }
        tx.commit()?;
        tracing::info!(count = lines.len(), "budget lines imported");
        Ok(lines.len())
    }

    /// All budget lines in entry order.
    pub(crate) fn get_budget_lines(&self) -> Result<Vec<BudgetLine>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {LINE_COLUMNS} FROM budget_lines ORDER BY id"))?;
        let rows = stmt.query_map([], line_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn get_budget_line_by_id(&self, id: i64) -> Result<Option<BudgetLine>> {
        Ok(self
            .conn
            .query_row(
                &format!("SELECT {LINE_COLUMNS} FROM budget_lines WHERE id = ?1"),
                params![id],
                line_from_row,
            )
            .optional()?)
    }

    pub(crate) fn update_budget_line(&self, line: &BudgetLine) -> Result<()> {
        let id = line
            .id
            .ok_or_else(|| anyhow::anyhow!("Cannot update a budget line without an id"))?;
        let changed = self.conn.execute(
            "UPDATE budget_lines
             SET category = ?1, item_name = ?2, budgeted_amount = ?3, actual_amount = ?4,
                 status = ?5, notes = ?6, vendor_name = ?7, payment_mode = ?8
             WHERE id = ?9",
            params![
                line.category,
                line.item_name,
                line.budgeted_amount.to_string(),
                line.actual_amount.to_string(),
                line.status.as_str(),
                line.notes,
                line.vendor_name,
                line.payment_mode.map(|p| p.as_str()),
                id,
            ],
        )?;
        if changed == 0 {
            anyhow::bail!("Budget line {id} not found");
        }
        tracing::debug!(id, "budget line updated");
        Ok(())
    }

    pub(crate) fn delete_budget_line(&self, id: i64) -> Result<()> {
        self.conn
            .execute("DELETE FROM budget_lines WHERE id = ?1", params![id])?;
        tracing::debug!(id, "budget line deleted");
        Ok(())
    }

    // ── Finance months ────────────────────────────────────────

    /// Insert or replace the month keyed by `month.month_year`. Available funds
    /// are recomputed from the month's fields and the cumulative cache is rebuilt.
    pub(crate) fn upsert_finance_month(&mut self, month: &FinanceMonth) -> Result<i64> {
        let mut month = month.clone();
        month.recompute_available();
        let key = month_key(month.month_year);

        self.conn.execute(
            "INSERT INTO finance_months (month_year, monthly_salary, loan_amount, loan_interest_rate,
                 loan_tenure_months, monthly_emi, cash_holding_1, cash_holding_2, credit_card_spent,
                 bonus_income, available_funds_month)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
             ON CONFLICT(month_year) DO UPDATE SET
                 monthly_salary = ?2, loan_amount = ?3, loan_interest_rate = ?4,
                 loan_tenure_months = ?5, monthly_emi = ?6, cash_holding_1 = ?7,
                 cash_holding_2 = ?8, credit_card_spent = ?9, bonus_income = ?10,
                 available_funds_month = ?11",
            params![
                key,
                month.monthly_salary.to_string(),
                month.loan_amount.to_string(),
                month.loan_interest_rate.to_string(),
                month.loan_tenure_months,
                month.monthly_emi.to_string(),
                month.cash_holding_1.to_string(),
                month.cash_holding_2.to_string(),
                month.credit_card_spent.to_string(),
                month.bonus_income.to_string(),
                month.available_funds_month.to_string(),
            ],
        )?;
        let id: i64 = self.conn.query_row(
            "SELECT id FROM finance_months WHERE month_year = ?1",
            params![key],
            |row| row.get(0),
        )?;
        tracing::info!(month = %key, available = %month.available_funds_month, "finance month saved");

        self.refresh_cumulative_cache()?;
        Ok(id)
    }

    /// All finance months, ascending by month.
    pub(crate) fn get_finance_months(&self) -> Result<Vec<FinanceMonth>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {MONTH_COLUMNS} FROM finance_months ORDER BY month_year"
        ))?;
        let rows = stmt.query_map([], month_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn get_finance_month(&self, month_year: NaiveDate) -> Result<Option<FinanceMonth>> {
        Ok(self
            .conn
            .query_row(
                &format!("SELECT {MONTH_COLUMNS} FROM finance_months WHERE month_year = ?1"),
                params![month_key(month_year)],
                month_from_row,
            )
            .optional()?)
    }

    pub(crate) fn delete_finance_month(&mut self, id: i64) -> Result<()> {
        self.conn
            .execute("DELETE FROM finance_months WHERE id = ?1", params![id])?;
        tracing::debug!(id, "finance month deleted");
        self.refresh_cumulative_cache()?;
        Ok(())
    }

    /// Rewrite the stored cumulative column from a fresh recomputation.
    /// Returns the number of rows whose cached value had drifted.
    pub(crate) fn refresh_cumulative_cache(&mut self) -> Result<usize> {
        let months = self.get_finance_months()?;
        let drift = aggregate::cumulative_drift(&months);
        if drift.is_empty() {
            return Ok(0);
        }

        let tx = self.conn.transaction()?;
        for d in &drift {
            tx.execute(
                "UPDATE finance_months SET cumulative_available = ?1 WHERE month_year = ?2",
                params![d.computed.to_string(), month_key(d.month_year)],
            )?;
        }
        tx.commit()?;
        tracing::debug!(rows = drift.len(), "cumulative cache refreshed");
        Ok(drift.len())
    }

    // ── Settings ──────────────────────────────────────────────

    fn get_setting(&self, key: &str) -> Result<Option<String>> {
        Ok(self
            .conn
            .query_row(
                "SELECT value FROM settings WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?)
    }

    fn put_setting(&self, key: &str, value: Option<String>) -> Result<()> {
        match value {
            Some(v) => self.conn.execute(
                "INSERT INTO settings (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = ?2",
                params![key, v],
            )?,
            None => self
                .conn
                .execute("DELETE FROM settings WHERE key = ?1", params![key])?,
        };
        Ok(())
    }

    pub(crate) fn get_settings(&self) -> Result<PlanSettings> {
        let total_budget_target = self
            .get_setting(schema::KEY_BUDGET_TARGET)?
            .and_then(|s| Decimal::from_str(&s).ok());
        let target_date = self
            .get_setting(schema::KEY_TARGET_DATE)?
            .and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok());
        Ok(PlanSettings {
            total_budget_target,
            target_date,
        })
    }

    pub(crate) fn save_settings(&self, settings: &PlanSettings) -> Result<()> {
        self.put_setting(
            schema::KEY_BUDGET_TARGET,
            settings.total_budget_target.map(|d| d.to_string()),
        )?;
        self.put_setting(
            schema::KEY_TARGET_DATE,
            settings
                .target_date
                .map(|d| d.format("%Y-%m-%d").to_string()),
        )?;
        tracing::info!(
            target = ?settings.total_budget_target,
            date = ?settings.target_date,
            "plan settings saved"
        );
        Ok(())
    }
}
