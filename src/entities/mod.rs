//! Entity module - Contains all SeaORM entity definitions for the ledger.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod budget;
pub mod category_budget;
pub mod expense;
pub mod income;
pub mod recurring_expense;
pub mod recurring_income;
pub mod savings_tracker;

// Re-export specific types to avoid conflicts
pub use budget::{Column as BudgetColumn, Entity as Budget, Model as BudgetModel};
pub use category_budget::{
    Column as CategoryBudgetColumn, Entity as CategoryBudget, Model as CategoryBudgetModel,
};
pub use expense::{Column as ExpenseColumn, Entity as Expense, Model as ExpenseModel};
pub use income::{Column as IncomeColumn, Entity as Income, Model as IncomeModel};
pub use recurring_expense::{
    Column as RecurringExpenseColumn, Entity as RecurringExpense, Model as RecurringExpenseModel,
};
pub use recurring_income::{
    Column as RecurringIncomeColumn, Entity as RecurringIncome, Model as RecurringIncomeModel,
};
pub use savings_tracker::{
    Column as SavingsTrackerColumn, Entity as SavingsTracker, Model as SavingsTrackerModel,
};
