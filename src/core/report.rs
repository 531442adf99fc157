//! Dashboard assembly and text rendering.
//!
//! [`build_dashboard`] gathers every derived view of a month (totals, category
//! gauges, alerts, top expenses, breakdown, comparison and burn rate) into one
//! [`Dashboard`]. The `format_*` functions render it as plain text for the
//! binary; they never recompute thresholds themselves.

use crate::{
    core::{
        analytics::{
            self, CategoryBreakdown, DailyBurnRate, MonthComparison, PeriodChange, TopExpense,
        },
        catalog,
        metrics::{
            self, AlertLevel, AvailableBudget, BudgetCalculation, CategoryBudgetStatus,
        },
        period::MonthKey,
    },
    entities::{category_budget, expense},
};
use chrono::{Duration, NaiveDate};
use std::fmt::Write;

/// Records and totals a dashboard is built from.
#[derive(Debug, Clone, Copy)]
pub struct DashboardSource<'a> {
    /// Month being shown
    pub month: MonthKey,
    /// Totals already computed for the month
    pub metrics: &'a BudgetCalculation,
    /// Spendable amount for the month
    pub available: &'a AvailableBudget,
    /// Category ceilings of the month
    pub category_budgets: &'a [category_budget::Model],
    /// Expenses of the month
    pub expenses: &'a [expense::Model],
    /// Total spent in the previous month
    pub previous_expenses: f64,
    /// Total income of the previous month
    pub previous_income: f64,
}

/// Everything the dashboard screen shows for one month.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    /// Month being shown
    pub month: MonthKey,
    /// Period totals
    pub metrics: BudgetCalculation,
    /// Spendable and remaining amounts
    pub available: AvailableBudget,
    /// Category gauges, alerts first
    pub category_statuses: Vec<CategoryBudgetStatus>,
    /// Categories near or over their ceiling, in display order
    pub alerts: Vec<CategoryBudgetStatus>,
    /// Largest expenses of the month
    pub top_expenses: Vec<TopExpense>,
    /// Spending per category
    pub breakdown: Vec<CategoryBreakdown>,
    /// Comparison with the previous month
    pub comparison: MonthComparison,
    /// Daily spending pace
    pub burn_rate: DailyBurnRate,
    /// Share of income left after spending
    pub savings_rate: f64,
}

/// Builds the dashboard of `source.month` as seen on `today`.
#[must_use]
pub fn build_dashboard(
    source: DashboardSource<'_>,
    top_expenses_limit: usize,
    today: NaiveDate,
) -> Dashboard {
    let mut category_statuses =
        metrics::enrich_category_budgets(source.category_budgets, source.expenses);
    metrics::sort_category_budgets(&mut category_statuses);
    let alerts = metrics::get_categories_needing_alert(&category_statuses)
        .into_iter()
        .cloned()
        .collect();

    let spent = source.metrics.total_spent;
    let income = source.metrics.total_revenue;

    Dashboard {
        month: source.month,
        metrics: *source.metrics,
        available: *source.available,
        alerts,
        category_statuses,
        top_expenses: analytics::get_top_expenses(source.expenses, top_expenses_limit),
        breakdown: analytics::get_category_breakdown(source.expenses),
        comparison: analytics::get_month_comparison(
            spent,
            source.previous_expenses,
            income,
            source.previous_income,
        ),
        burn_rate: analytics::get_daily_burn_rate(
            spent,
            source.previous_expenses,
            burn_rate_reference(source.month, today),
        ),
        savings_rate: analytics::get_savings_rate(income, spent),
    }
}

/// Day the burn rate of `month` is measured at.
///
/// The current month uses `today`, a past month its last day and a future
/// month its first day.
#[must_use]
pub fn burn_rate_reference(month: MonthKey, today: NaiveDate) -> NaiveDate {
    let current = MonthKey::from_date(&today);
    if month == current {
        today
    } else if month < current {
        month.first_day() + Duration::days(i64::from(month.days_in_month() - 1))
    } else {
        month.first_day()
    }
}

/// Generates a progress bar string for visual representation.
///
/// Creates a text-based progress bar like: `[████████░░] 80.0%`
///
/// # Arguments
/// * `progress_percent` - Progress percentage, shown unclamped in the label
/// * `bar_length` - Length of the progress bar in characters (default 10)
#[must_use]
pub fn format_progress_bar(progress_percent: f64, bar_length: Option<usize>) -> String {
    let length = bar_length.unwrap_or(10);
    let clamped_progress = progress_percent.clamp(0.0, 100.0);

    // Cast safety: clamped_progress ∈ [0, 100] and length is small, so the
    // product is in [0, length].
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    let filled = ((clamped_progress / 100.0) * length as f64).round() as usize;
    let empty = length.saturating_sub(filled);

    format!(
        "[{}{}] {progress_percent:.1}%",
        "█".repeat(filled),
        "░".repeat(empty)
    )
}

/// Formats an amount with the currency symbol, e.g. `$12.50` or `-$3.00`.
#[must_use]
pub fn format_amount(amount: f64, currency: &str) -> String {
    if amount < 0.0 {
        format!("-{currency}{:.2}", amount.abs())
    } else {
        format!("{currency}{amount:.2}")
    }
}

/// Formats a month-over-month change as a signed percentage.
#[must_use]
pub fn format_change(change: &PeriodChange) -> String {
    format!("{:+.1}%", change.percent_change)
}

/// One gauge line for a category budget.
#[must_use]
pub fn format_category_line(status: &CategoryBudgetStatus, currency: &str) -> String {
    let category = &status.budget.category;
    format!(
        "{} {category:<14} {} {} / {}",
        catalog::category_icon(category),
        format_progress_bar(status.percentage, None),
        format_amount(status.spent, currency),
        format_amount(status.budget.amount, currency),
    )
}

/// Alert text for a category, `None` when it needs no alert.
#[must_use]
pub fn format_alert_line(status: &CategoryBudgetStatus, currency: &str) -> Option<String> {
    let category = &status.budget.category;
    match AlertLevel::for_status(status)? {
        AlertLevel::OverBudget => Some(format!(
            "🚨 {category} is over budget by {}",
            format_amount(-status.remaining, currency)
        )),
        AlertLevel::NearLimit => Some(format!(
            "⚠️ {category} has used {:.1}% of its budget",
            status.percentage
        )),
    }
}

/// Renders the whole dashboard as text.
#[must_use]
pub fn format_dashboard_summary(dashboard: &Dashboard, currency: &str) -> String {
    let m = &dashboard.metrics;
    let mut out = String::new();

    // Writing into a String cannot fail
    let _ = writeln!(out, "📅 Budget for {}", dashboard.month);
    let _ = writeln!(out, "Income:      {}", format_amount(m.total_revenue, currency));
    let _ = writeln!(out, "Recurring:   {}", format_amount(m.total_recurring, currency));
    let _ = write!(
        out,
        "Available:   {}",
        format_amount(dashboard.available.available, currency)
    );
    if dashboard.available.uses_manual_budget {
        out.push_str(" (manual budget)");
    }
    out.push('\n');
    let _ = writeln!(out, "Spent:       {}", format_amount(m.total_spent, currency));
    let _ = writeln!(
        out,
        "Remaining:   {}",
        format_amount(dashboard.available.remaining, currency)
    );
    let _ = writeln!(out, "Budgeted:    {}", format_amount(m.total_budgeted, currency));
    let _ = writeln!(out, "Savings goal: {}", format_amount(m.target_savings, currency));
    let _ = writeln!(out, "Buffer:      {}", format_amount(m.buffer, currency));

    if !dashboard.category_statuses.is_empty() {
        out.push_str("\nCategories\n");
        for status in &dashboard.category_statuses {
            let _ = writeln!(out, "{}", format_category_line(status, currency));
        }
    }

    let alerts: Vec<String> = dashboard
        .alerts
        .iter()
        .filter_map(|s| format_alert_line(s, currency))
        .collect();
    if !alerts.is_empty() {
        out.push_str("\nAlerts\n");
        for alert in alerts {
            let _ = writeln!(out, "{alert}");
        }
    }

    if !dashboard.top_expenses.is_empty() {
        out.push_str("\nTop expenses\n");
        for top in &dashboard.top_expenses {
            let e = &top.expense;
            let _ = writeln!(
                out,
                "{} {} {}{}",
                catalog::category_icon(&e.category),
                format_amount(e.amount, currency),
                e.category,
                e.description
                    .as_deref()
                    .map(|d| format!(" ({d})"))
                    .unwrap_or_default()
            );
        }
    }

    let c = &dashboard.comparison;
    let burn = &dashboard.burn_rate;
    out.push_str("\nTrend\n");
    let _ = writeln!(
        out,
        "Expenses vs last month: {}  Income: {}  Savings: {}",
        format_change(&c.expenses),
        format_change(&c.income),
        format_change(&c.savings)
    );
    let _ = writeln!(
        out,
        "Daily average {} (last month {}), projected {} over {} days",
        format_amount(burn.current_daily_avg, currency),
        format_amount(burn.previous_daily_avg, currency),
        format_amount(burn.projected_month_total, currency),
        burn.days_in_month
    );
    let _ = write!(out, "Savings rate: {:.1}%", dashboard.savings_rate);

    out
}
