//! Remote change notifications.
//!
//! In shared mode other members write to the same backend. Their writes
//! arrive as [`ChangeEvent`]s and are patched into the local snapshot without
//! a full reload. Only records that belong to the snapshot's month are kept;
//! recurring templates are not month-scoped and always apply.

use crate::{
    core::period::MonthKey,
    entities::{
        BudgetModel, CategoryBudgetModel, ExpenseModel, IncomeModel, RecurringExpenseModel,
        RecurringIncomeModel, SavingsTrackerModel,
    },
    store::snapshot::Snapshot,
};
use serde::{Deserialize, Serialize};

/// Kind of write that happened remotely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeEventType {
    /// A record was created
    Insert,
    /// A record was modified
    Update,
    /// A record was removed
    Delete,
}

/// The record a change refers to, tagged by table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "table", content = "record", rename_all = "snake_case")]
pub enum LedgerRecord {
    /// Row of `budgets`
    Budget(BudgetModel),
    /// Row of `expenses`
    Expense(ExpenseModel),
    /// Row of `recurring_expenses`
    RecurringExpense(RecurringExpenseModel),
    /// Row of `incomes`
    Income(IncomeModel),
    /// Row of `recurring_incomes`
    RecurringIncome(RecurringIncomeModel),
    /// Row of `category_budgets`
    CategoryBudget(CategoryBudgetModel),
    /// Row of `savings_trackers`
    SavingsTracker(SavingsTrackerModel),
}

/// A remote write notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeEvent {
    /// What happened to the record
    pub event_type: ChangeEventType,
    /// The record after the change, or as it was before a delete
    pub record: LedgerRecord,
}

/// Applies `event` to `snapshot`'s records. Returns whether anything changed.
///
/// Totals are not recomputed here.
pub(crate) fn apply_to_snapshot(snapshot: &mut Snapshot, event: ChangeEvent) -> bool {
    let month = snapshot.month;
    let kind = event.event_type;

    match event.record {
        LedgerRecord::Budget(budget) => {
            apply_single(&mut snapshot.budget, budget, kind, |b| in_month(&b.month, month))
        }
        LedgerRecord::SavingsTracker(tracker) => {
            apply_single(&mut snapshot.savings, tracker, kind, |t| in_month(&t.month, month))
        }
        LedgerRecord::Expense(expense) => {
            let member = month.contains(&expense.date);
            let changed = apply_to_list(&mut snapshot.expenses, expense, kind, member, |e| e.id);
            snapshot
                .expenses
                .sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id)));
            changed
        }
        LedgerRecord::Income(income) => {
            let member = in_month(&income.month, month);
            let changed = apply_to_list(&mut snapshot.incomes, income, kind, member, |i| i.id);
            snapshot
                .incomes
                .sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));
            changed
        }
        LedgerRecord::CategoryBudget(budget) => {
            let member = in_month(&budget.month, month);
            apply_to_list(&mut snapshot.category_budgets, budget, kind, member, |b| b.id)
        }
        LedgerRecord::RecurringExpense(template) => {
            apply_to_list(&mut snapshot.recurring_expenses, template, kind, true, |t| t.id)
        }
        LedgerRecord::RecurringIncome(template) => {
            apply_to_list(&mut snapshot.recurring_incomes, template, kind, true, |t| t.id)
        }
    }
}

fn in_month(key: &str, month: MonthKey) -> bool {
    key.parse::<MonthKey>().is_ok_and(|k| k == month)
}

/// Patches a month-scoped collection.
///
/// A record that moved out of the month is removed; a duplicate insert
/// replaces the held copy.
fn apply_to_list<T, F>(
    records: &mut Vec<T>,
    record: T,
    kind: ChangeEventType,
    member: bool,
    id: F,
) -> bool
where
    F: Fn(&T) -> i64,
{
    let record_id = id(&record);
    let position = records.iter().position(|r| id(r) == record_id);

    match (kind, position) {
        (ChangeEventType::Delete, Some(index)) => {
            records.remove(index);
            true
        }
        (ChangeEventType::Delete, None) => false,
        (_, Some(index)) if member => {
            records[index] = record;
            true
        }
        (_, Some(index)) => {
            records.remove(index);
            true
        }
        (_, None) if member => {
            records.push(record);
            true
        }
        (_, None) => false,
    }
}

fn apply_single<T, F>(slot: &mut Option<T>, record: T, kind: ChangeEventType, member: F) -> bool
where
    F: Fn(&T) -> bool,
{
    if !member(&record) {
        return false;
    }
    if kind == ChangeEventType::Delete {
        return slot.take().is_some();
    }
    *slot = Some(record);
    true
}
