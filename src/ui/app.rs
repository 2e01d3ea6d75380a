use anyhow::Result;
use chrono::{Local, NaiveDate};

use crate::aggregate::{self, Overview};
use crate::db::Database;
use crate::models::{BudgetLine, FinanceMonth, PlanSettings};
use crate::ui::util::clamp_cursor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Dashboard,
    Budget,
    Savings,
}

impl Screen {
    pub(crate) fn all() -> &'static [Screen] {
        &[Self::Dashboard, Self::Budget, Self::Savings]
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dashboard => write!(f, "Dashboard"),
            Self::Budget => write!(f, "Budget"),
            Self::Savings => write!(f, "Savings"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Normal,
    Command,
    Confirm,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Command => write!(f, "COMMAND"),
            Self::Confirm => write!(f, "CONFIRM"),
        }
    }
}

/// Pending action that requires user confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PendingAction {
    DeleteLine { id: i64, name: String },
    DeleteMonth { id: i64, month: String },
}

pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) screen: Screen,
    pub(crate) input_mode: InputMode,
    pub(crate) command_input: String,
    pub(crate) status_message: String,
    pub(crate) show_help: bool,
    pub(crate) today: NaiveDate,

    // Snapshot of the store
    pub(crate) lines: Vec<BudgetLine>,
    pub(crate) months: Vec<FinanceMonth>,
    pub(crate) settings: PlanSettings,
    pub(crate) overview: Overview,

    // Budget screen
    pub(crate) category_filter: Option<String>,
    pub(crate) line_index: usize,
    pub(crate) line_scroll: usize,

    // Savings screen
    pub(crate) month_index: usize,
    pub(crate) month_scroll: usize,

    // Confirmation
    pub(crate) pending_action: Option<PendingAction>,
    pub(crate) confirm_message: String,

    // Layout (updated each render frame)
    pub(crate) visible_rows: usize,
}

impl App {
    pub(crate) fn new() -> Self {
        let today = Local::now().date_naive();
        let settings = PlanSettings::default();
        Self {
            running: true,
            screen: Screen::Dashboard,
            input_mode: InputMode::Normal,
            command_input: String::new(),
            status_message: String::new(),
            show_help: false,
            today,

            lines: Vec::new(),
            months: Vec::new(),
            overview: aggregate::overview(&[], &[], &settings, today),
            settings,

            category_filter: None,
            line_index: 0,
            line_scroll: 0,

            month_index: 0,
            month_scroll: 0,

            pending_action: None,
            confirm_message: String::new(),

            visible_rows: 20,
        }
    }

    /// Reload every record and recompute the derived views.
    pub(crate) fn refresh_all(&mut self, db: &Database) -> Result<()> {
        self.lines = db.get_budget_lines()?;
        self.months = db.get_finance_months()?;
        self.settings = db.get_settings()?;
        self.today = Local::now().date_naive();
        self.recompute();
        Ok(())
    }

    /// Recompute derived views from the records already loaded.
    pub(crate) fn recompute(&mut self) {
        self.overview = aggregate::overview(&self.lines, &self.months, &self.settings, self.today);
        let line_count = self.visible_lines().len();
        clamp_cursor(&mut self.line_index, &mut self.line_scroll, line_count);
        let month_count = self.overview.savings.len();
        clamp_cursor(&mut self.month_index, &mut self.month_scroll, month_count);
    }

    /// Lines shown on the Budget screen, after the category filter.
    pub(crate) fn visible_lines(&self) -> Vec<&BudgetLine> {
        self.lines
            .iter()
            .filter(|l| match &self.category_filter {
                Some(c) => l.category.eq_ignore_ascii_case(c),
                None => true,
            })
            .collect()
    }

    pub(crate) fn selected_line(&self) -> Option<&BudgetLine> {
        self.visible_lines().get(self.line_index).copied()
    }

    /// Month under the cursor on the Savings screen, matched back to its record.
    pub(crate) fn selected_month(&self) -> Option<&FinanceMonth> {
        let point = self.overview.savings.get(self.month_index)?;
        self.months.iter().find(|m| m.month_year == point.month_year)
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }

    pub(crate) fn ask_confirm(&mut self, action: PendingAction, message: String) {
        self.pending_action = Some(action);
        self.confirm_message = message;
        self.input_mode = InputMode::Confirm;
    }
}

#[cfg(test)]
#[path = "app_tests.rs"]
mod tests;
