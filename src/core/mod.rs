//! Core business logic.
//!
//! Repositories for every ledger record type, the pure calculation layers and
//! the rollover engine. Nothing in here knows about the [`crate::store`]
//! snapshot; functions take a connection or plain slices.

/// Per-period analytics: top expenses, breakdown, comparison, burn rate, trend
pub mod analytics;
/// Monthly budget persistence
pub mod budget;
/// Static expense category and income source catalog
pub mod catalog;
/// Category ceiling persistence
pub mod category_budget;
/// Expense persistence
pub mod expense;
/// Income persistence
pub mod income;
/// Budget metrics, category progress and alerts
pub mod metrics;
/// Month keys
pub mod period;
/// Recurring expense templates
pub mod recurring_expense;
/// Recurring income templates
pub mod recurring_income;
/// Dashboard assembly and text rendering
pub mod report;
/// Recurring income materialization and category budget carry-over
pub mod rollover;
/// Savings targets and running totals
pub mod savings;
