//! Budget metrics.
//!
//! Pure functions that turn one period's record sets into the derived
//! financial summary: available budget, buffer, category progress and alerts.
//! Nothing here performs I/O or filters by month; the caller passes records
//! that already belong to the evaluated period. Invalid numbers are not
//! rejected and propagate as `NaN`.

use crate::core::catalog::{self, CategoryInfo};
use crate::entities::{category_budget, expense, income, recurring_expense, savings_tracker};

/// Percentage at which a category is considered close to its limit.
pub const NEAR_LIMIT_PERCENT: f64 = 80.0;

/// Derived summary for one period.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BudgetCalculation {
    /// Sum of all income amounts
    pub total_revenue: f64,
    /// Sum of active recurring expense amounts
    pub total_recurring: f64,
    /// Revenue minus recurring obligations, may be negative
    pub available_for_budget: f64,
    /// Sum of all category budgets, duplicates included
    pub total_budgeted: f64,
    /// Savings target, 0 when no tracker exists
    pub target_savings: f64,
    /// Unallocated money after category budgets and savings target, may be negative
    pub buffer: f64,
    /// Sum of all expense amounts
    pub total_spent: f64,
    /// Available money minus spending, may be negative
    pub actual_savings: f64,
}

/// Computes the period summary from already-loaded records.
#[must_use]
pub fn calculate_budget_metrics(
    incomes: &[income::Model],
    recurring_expenses: &[recurring_expense::Model],
    category_budgets: &[category_budget::Model],
    expenses: &[expense::Model],
    savings_tracker: Option<&savings_tracker::Model>,
) -> BudgetCalculation {
    let total_revenue: f64 = incomes.iter().map(|i| i.amount).sum();
    let total_recurring: f64 = recurring_expenses
        .iter()
        .filter(|r| r.is_active)
        .map(|r| r.amount)
        .sum();
    let available_for_budget = total_revenue - total_recurring;
    let total_budgeted: f64 = category_budgets.iter().map(|b| b.amount).sum();
    let target_savings = savings_tracker.map_or(0.0, |s| s.target_amount);
    let buffer = available_for_budget - total_budgeted - target_savings;
    let total_spent = total_spent(expenses);
    let actual_savings = available_for_budget - total_spent;

    BudgetCalculation {
        total_revenue,
        total_recurring,
        available_for_budget,
        total_budgeted,
        target_savings,
        buffer,
        total_spent,
        actual_savings,
    }
}

/// Sum of expense amounts.
#[must_use]
pub fn total_spent(expenses: &[expense::Model]) -> f64 {
    expenses.iter().map(|e| e.amount).sum()
}

/// Money the household can spend this period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AvailableBudget {
    /// Amount available before spending
    pub available: f64,
    /// `available - total_spent`, negative when over budget
    pub remaining: f64,
    /// True when no income was recorded and the manual budget was used
    pub uses_manual_budget: bool,
}

impl Default for AvailableBudget {
    /// An empty period: no income and no manual budget.
    fn default() -> Self {
        Self {
            available: 0.0,
            remaining: 0.0,
            uses_manual_budget: true,
        }
    }
}

/// Picks the spendable amount for the period.
///
/// With income on record this is revenue minus recurring obligations. Without
/// any income the manually set monthly budget applies, or 0 when none is set.
#[must_use]
pub fn resolve_available_budget(
    metrics: &BudgetCalculation,
    has_income: bool,
    manual_budget: Option<f64>,
) -> AvailableBudget {
    let (available, uses_manual_budget) = if has_income {
        (metrics.available_for_budget, false)
    } else {
        (manual_budget.unwrap_or(0.0), true)
    };

    AvailableBudget {
        available,
        remaining: available - metrics.total_spent,
        uses_manual_budget,
    }
}

/// Spending progress for a single category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryProgress {
    /// Sum of expenses in the category
    pub spent: f64,
    /// Ceiling from the first matching category budget, 0 when none
    pub budget: f64,
    /// `spent / budget * 100`, 0 when the budget is 0
    pub percentage: f64,
}

/// Progress of one category against its budget.
///
/// Only the first category budget matching `category_id` is used, whereas
/// [`calculate_budget_metrics`] sums every row. The two agree as long as a
/// month has at most one budget per category, which the schema enforces.
#[must_use]
pub fn get_category_budget_progress(
    category_id: &str,
    category_budgets: &[category_budget::Model],
    expenses: &[expense::Model],
) -> CategoryProgress {
    let budget = category_budgets
        .iter()
        .find(|b| b.category == category_id)
        .map_or(0.0, |b| b.amount);
    let spent = spent_in_category(category_id, expenses);

    CategoryProgress {
        spent,
        budget,
        percentage: percentage_of(spent, budget),
    }
}

fn spent_in_category(category_id: &str, expenses: &[expense::Model]) -> f64 {
    expenses
        .iter()
        .filter(|e| e.category == category_id)
        .map(|e| e.amount)
        .sum()
}

fn percentage_of(spent: f64, budget: f64) -> f64 {
    if budget == 0.0 {
        return 0.0;
    }
    spent * 100.0 / budget
}

/// A category budget with its spending state attached.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryBudgetStatus {
    /// The underlying category budget
    pub budget: category_budget::Model,
    /// Catalog entry, `None` for categories no longer offered
    pub info: Option<&'static CategoryInfo>,
    /// Amount spent in the category
    pub spent: f64,
    /// Spent as a percentage of the budget
    pub percentage: f64,
    /// Budget minus spent, negative when over budget
    pub remaining: f64,
    /// `spent > budget`
    pub is_over_budget: bool,
    /// `80% <= percentage < 100%`
    pub is_near_limit: bool,
}

impl CategoryBudgetStatus {
    fn new(budget: category_budget::Model, expenses: &[expense::Model]) -> Self {
        let spent = spent_in_category(&budget.category, expenses);
        let percentage = percentage_of(spent, budget.amount);

        Self {
            info: catalog::find_category(&budget.category),
            remaining: budget.amount - spent,
            is_over_budget: spent > budget.amount,
            is_near_limit: (NEAR_LIMIT_PERCENT..100.0).contains(&percentage),
            spent,
            percentage,
            budget,
        }
    }

    /// Whether the category should raise an alert.
    #[must_use]
    pub const fn needs_alert(&self) -> bool {
        self.is_near_limit || self.is_over_budget
    }
}

/// Severity shown by the category alert banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertLevel {
    /// Spending passed the ceiling
    OverBudget,
    /// Spending is at or above 80% of the ceiling
    NearLimit,
}

impl AlertLevel {
    /// Derives the alert for a status; presentation must use this instead of
    /// re-deriving the thresholds.
    #[must_use]
    pub const fn for_status(status: &CategoryBudgetStatus) -> Option<Self> {
        if status.is_over_budget {
            Some(Self::OverBudget)
        } else if status.is_near_limit {
            Some(Self::NearLimit)
        } else {
            None
        }
    }
}

/// Attaches spending state to every category budget.
#[must_use]
pub fn enrich_category_budgets(
    category_budgets: &[category_budget::Model],
    expenses: &[expense::Model],
) -> Vec<CategoryBudgetStatus> {
    category_budgets
        .iter()
        .cloned()
        .map(|budget| CategoryBudgetStatus::new(budget, expenses))
        .collect()
}

/// Orders statuses for display: over budget first, then near the limit
/// (highest percentage first), then everything else by budget amount
/// (largest first). The sort is stable.
pub fn sort_category_budgets(statuses: &mut [CategoryBudgetStatus]) {
    statuses.sort_by(|a, b| {
        let tier = |s: &CategoryBudgetStatus| {
            if s.is_over_budget {
                0
            } else if s.is_near_limit {
                1
            } else {
                2
            }
        };

        tier(a).cmp(&tier(b)).then_with(|| match tier(a) {
            1 => b.percentage.total_cmp(&a.percentage),
            2 => b.budget.amount.total_cmp(&a.budget.amount),
            _ => std::cmp::Ordering::Equal,
        })
    });
}

/// Categories that are near or over their limit, in input order.
#[must_use]
pub fn get_categories_needing_alert(
    statuses: &[CategoryBudgetStatus],
) -> Vec<&CategoryBudgetStatus> {
    statuses.iter().filter(|s| s.needs_alert()).collect()
}
