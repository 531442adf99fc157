//! Shared test utilities for the household budget ledger.
//!
//! This module provides helpers for setting up test databases, building
//! command inputs with sensible defaults, and constructing entity models for
//! the pure calculation tests.

#![allow(clippy::unwrap_used)]

use crate::{
    core::{
        catalog::IncomeSource, category_budget::CategoryBudgetInput, expense::ExpenseInput,
        income::IncomeInput, period::MonthKey, recurring_expense::RecurringExpenseInput,
        recurring_income::RecurringIncomeInput,
    },
    entities::{category_budget, expense, income, recurring_expense, recurring_income, savings_tracker},
    errors::Result,
};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Parses a `YYYY-MM` month key.
pub fn month(key: &str) -> MonthKey {
    key.parse().unwrap()
}

/// Noon UTC on a `YYYY-MM-DD` date.
pub fn date_time(date: &str) -> DateTime<Utc> {
    let day = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
    Utc.from_utc_datetime(&day.and_hms_opt(12, 0, 0).unwrap())
}

/// Fixed creation timestamp for model builders.
fn created_at() -> DateTime<Utc> {
    date_time("2024-05-01")
}

/// Expense input dated on `date`.
///
/// # Defaults
/// * `description`: None
pub fn expense_input(category: &str, amount: f64, date: &str) -> ExpenseInput {
    ExpenseInput {
        amount,
        category: category.to_string(),
        description: None,
        date: date_time(date),
    }
}

/// Active recurring expense input without description.
pub fn recurring_expense_input(category: &str, amount: f64) -> RecurringExpenseInput {
    RecurringExpenseInput {
        amount,
        category: category.to_string(),
        description: None,
        is_active: true,
    }
}

/// Income input for `month_key`.
///
/// # Defaults
/// * `source`: salary
/// * `date`: the 1st of the month
pub fn income_input(month_key: &str, amount: f64) -> IncomeInput {
    let month = month(month_key);
    IncomeInput {
        month,
        amount,
        source: IncomeSource::Salary,
        description: None,
        date: month.start_utc(),
    }
}

/// Active salary template.
pub fn recurring_income_input(amount: f64) -> RecurringIncomeInput {
    RecurringIncomeInput {
        amount,
        source: IncomeSource::Salary,
        description: None,
        is_active: true,
    }
}

/// Non-recurring category ceiling.
pub fn category_budget_input(month_key: &str, category: &str, amount: f64) -> CategoryBudgetInput {
    CategoryBudgetInput {
        month: month(month_key),
        category: category.to_string(),
        amount,
        is_recurring: false,
    }
}

/// Hand-entered salary income model.
pub fn income_model(id: i64, month_key: &str, amount: f64) -> income::Model {
    income::Model {
        id,
        month: month_key.to_string(),
        amount,
        source: IncomeSource::Salary.as_str().to_string(),
        description: None,
        is_recurring: false,
        source_template_id: None,
        date: month(month_key).start_utc(),
        created_at: created_at(),
    }
}

/// Recurring expense template model.
pub fn recurring_expense_model(id: i64, amount: f64, is_active: bool) -> recurring_expense::Model {
    recurring_expense::Model {
        id,
        amount,
        category: "housing".to_string(),
        description: None,
        is_active,
        created_at: created_at(),
    }
}

/// Recurring income template model with a raw source string.
pub fn recurring_income_model(
    id: i64,
    source: &str,
    amount: f64,
    is_active: bool,
) -> recurring_income::Model {
    recurring_income::Model {
        id,
        amount,
        source: source.to_string(),
        description: None,
        is_active,
        created_at: created_at(),
    }
}

/// Non-recurring category budget model.
pub fn category_budget_model(
    id: i64,
    month_key: &str,
    category: &str,
    amount: f64,
) -> category_budget::Model {
    category_budget::Model {
        id,
        month: month_key.to_string(),
        category: category.to_string(),
        amount,
        is_recurring: false,
        created_at: created_at(),
    }
}

/// Expense model dated 2024-05-10, attached to budget 1.
pub fn expense_model(id: i64, category: &str, amount: f64) -> expense::Model {
    expense::Model {
        id,
        budget_id: 1,
        amount,
        category: category.to_string(),
        description: None,
        date: date_time("2024-05-10"),
        created_at: created_at(),
    }
}

/// Savings tracker with a target and nothing saved yet.
pub fn savings_tracker_model(month_key: &str, target_amount: f64) -> savings_tracker::Model {
    savings_tracker::Model {
        id: 1,
        month: month_key.to_string(),
        target_amount,
        actual_saved: 0.0,
        total_accumulated: 0.0,
        updated_at: created_at(),
    }
}
