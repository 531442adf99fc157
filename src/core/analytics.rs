//! Analytics aggregation.
//!
//! Historical and comparative statistics built from plain record slices:
//! top expenses, category breakdown, month-over-month comparison, daily burn
//! rate, and a multi-month trend. Like [`crate::core::metrics`], these
//! functions are pure and never fail; division by zero yields 0.

use crate::core::catalog::{self, CategoryInfo};
use crate::core::period::MonthKey;
use crate::entities::{expense, income};
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;

/// Number of entries [`get_top_expenses`] returns by default.
pub const DEFAULT_TOP_EXPENSES: usize = 5;

/// An expense together with its catalog entry.
#[derive(Debug, Clone, PartialEq)]
pub struct TopExpense {
    /// The expense record
    pub expense: expense::Model,
    /// Catalog entry, `None` when the category is no longer offered
    pub info: Option<&'static CategoryInfo>,
}

/// The largest expenses, biggest first, truncated to `limit`.
#[must_use]
pub fn get_top_expenses(expenses: &[expense::Model], limit: usize) -> Vec<TopExpense> {
    let mut sorted: Vec<&expense::Model> = expenses.iter().collect();
    sorted.sort_by(|a, b| b.amount.total_cmp(&a.amount));

    sorted
        .into_iter()
        .take(limit)
        .map(|e| TopExpense {
            info: catalog::find_category(&e.category),
            expense: e.clone(),
        })
        .collect()
}

/// Spending in one category and its share of the total.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryBreakdown {
    /// Category id
    pub category: String,
    /// Catalog entry, `None` when the category is no longer offered
    pub info: Option<&'static CategoryInfo>,
    /// Total spent in the category
    pub amount: f64,
    /// Share of all spending, 0 when nothing was spent
    pub percentage: f64,
}

/// Groups expenses by category, largest category first.
///
/// Categories whose accumulated amount is not positive are dropped. Equal
/// amounts are ordered by category id.
#[must_use]
pub fn get_category_breakdown(expenses: &[expense::Model]) -> Vec<CategoryBreakdown> {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for e in expenses {
        *totals.entry(e.category.as_str()).or_insert(0.0) += e.amount;
    }
    let total: f64 = totals.values().sum();

    let mut breakdown: Vec<CategoryBreakdown> = totals
        .into_iter()
        .filter(|(_, amount)| *amount > 0.0)
        .map(|(category, amount)| CategoryBreakdown {
            category: category.to_string(),
            info: catalog::find_category(category),
            amount,
            percentage: percent_of(amount, total),
        })
        .collect();
    breakdown.sort_by(|a, b| b.amount.total_cmp(&a.amount));
    breakdown
}

/// Change of a value between two periods.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PeriodChange {
    /// Value in the current period
    pub current: f64,
    /// Value in the previous period
    pub previous: f64,
    /// `current - previous`
    pub difference: f64,
    /// `difference / previous * 100`, 0 when `previous` is 0
    pub percent_change: f64,
}

impl PeriodChange {
    /// Compares two values.
    ///
    /// Growth from 0 reports 0% rather than an infinite change, so a jump from
    /// nothing to something is understated.
    #[must_use]
    pub fn between(current: f64, previous: f64) -> Self {
        let difference = current - previous;
        Self {
            current,
            previous,
            difference,
            percent_change: percent_of(difference, previous),
        }
    }
}

/// Month-over-month comparison of spending, income and savings.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MonthComparison {
    /// Expense totals
    pub expenses: PeriodChange,
    /// Income totals
    pub income: PeriodChange,
    /// Income minus expenses
    pub savings: PeriodChange,
}

/// Compares this month's totals with last month's.
#[must_use]
pub fn get_month_comparison(
    current_expenses: f64,
    previous_expenses: f64,
    current_income: f64,
    previous_income: f64,
) -> MonthComparison {
    MonthComparison {
        expenses: PeriodChange::between(current_expenses, previous_expenses),
        income: PeriodChange::between(current_income, previous_income),
        savings: PeriodChange::between(
            current_income - current_expenses,
            previous_income - previous_expenses,
        ),
    }
}

/// Average daily spending and a month-end projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyBurnRate {
    /// Spending so far divided by days elapsed
    pub current_daily_avg: f64,
    /// Last month's total divided by this month's length
    pub previous_daily_avg: f64,
    /// Linear extrapolation of the current average to the whole month
    pub projected_month_total: f64,
    /// Day of month of the reference date
    pub days_elapsed: u32,
    /// Length of the reference month
    pub days_in_month: u32,
}

/// Burn rate for the month containing `reference_date`.
///
/// The projection assumes spending continues at the current daily average;
/// it is not a forecast and ignores recurring bills that have not posted yet.
#[must_use]
pub fn get_daily_burn_rate(
    current_expenses: f64,
    previous_expenses_total: f64,
    reference_date: NaiveDate,
) -> DailyBurnRate {
    let days_in_month = MonthKey::from_date(&reference_date).days_in_month();
    let days_elapsed = reference_date.day();

    let current_daily_avg = if days_elapsed == 0 {
        0.0
    } else {
        current_expenses / f64::from(days_elapsed)
    };
    let previous_daily_avg = previous_expenses_total / f64::from(days_in_month);

    DailyBurnRate {
        current_daily_avg,
        previous_daily_avg,
        projected_month_total: current_daily_avg * f64::from(days_in_month),
        days_elapsed,
        days_in_month,
    }
}

/// Totals for one month of a trend chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthlyTotals {
    /// The month
    pub month: MonthKey,
    /// Income received
    pub income: f64,
    /// Money spent
    pub expenses: f64,
    /// Income minus expenses
    pub savings: f64,
}

/// Builds per-month totals for `months`, filling gaps with zeroes.
///
/// `expenses_by_month` and `incomes_by_month` hold one total per month;
/// months missing from either map count as 0.
#[must_use]
pub fn get_monthly_trend(
    months: &[MonthKey],
    expenses_by_month: &BTreeMap<MonthKey, f64>,
    incomes_by_month: &BTreeMap<MonthKey, f64>,
) -> Vec<MonthlyTotals> {
    months
        .iter()
        .map(|&month| {
            let income = incomes_by_month.get(&month).copied().unwrap_or(0.0);
            let expenses = expenses_by_month.get(&month).copied().unwrap_or(0.0);
            MonthlyTotals {
                month,
                income,
                expenses,
                savings: income - expenses,
            }
        })
        .collect()
}

/// Sums expense amounts per month of their date.
#[must_use]
pub fn expenses_by_month(expenses: &[expense::Model]) -> BTreeMap<MonthKey, f64> {
    let mut totals = BTreeMap::new();
    for e in expenses {
        *totals.entry(MonthKey::from_date(&e.date)).or_insert(0.0) += e.amount;
    }
    totals
}

/// Sums income amounts per month key. Rows with a malformed month are skipped.
#[must_use]
pub fn incomes_by_month(incomes: &[income::Model]) -> BTreeMap<MonthKey, f64> {
    let mut totals = BTreeMap::new();
    for i in incomes {
        if let Ok(month) = i.month.parse::<MonthKey>() {
            *totals.entry(month).or_insert(0.0) += i.amount;
        }
    }
    totals
}

/// Share of income left after expenses, as a percentage. 0 when there is no income.
#[must_use]
pub fn get_savings_rate(income: f64, expenses: f64) -> f64 {
    percent_of(income - expenses, income)
}

fn percent_of(part: f64, whole: f64) -> f64 {
    if whole == 0.0 {
        return 0.0;
    }
    part * 100.0 / whole
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_top_expenses_sorted_and_truncated() {
        let expenses: Vec<expense::Model> = [40.0, 10.0, 90.0, 60.0, 20.0, 75.0, 5.0]
            .iter()
            .enumerate()
            .map(|(i, amount)| expense_model(i64::try_from(i).unwrap(), "food", *amount))
            .collect();

        let top = get_top_expenses(&expenses, DEFAULT_TOP_EXPENSES);

        let amounts: Vec<f64> = top.iter().map(|t| t.expense.amount).collect();
        assert_eq!(amounts, vec![90.0, 75.0, 60.0, 40.0, 20.0]);
        assert!(top.iter().all(|t| t.info.is_some()));
    }

    #[test]
    fn test_top_expenses_with_unknown_category() {
        let expenses = vec![expense_model(1, "retired-category", 12.0)];
        let top = get_top_expenses(&expenses, 3);
        assert_eq!(top.len(), 1);
        assert!(top[0].info.is_none());
    }

    #[test]
    fn test_top_expenses_empty() {
        assert!(get_top_expenses(&[], 5).is_empty());
    }

    #[test]
    fn test_category_breakdown() {
        let expenses = vec![
            expense_model(1, "food", 100.0),
            expense_model(2, "travel", 250.0),
            expense_model(3, "food", 50.0),
            expense_model(4, "health", 100.0),
        ];

        let breakdown = get_category_breakdown(&expenses);

        assert_eq!(breakdown.len(), 3);
        assert_eq!(breakdown[0].category, "travel");
        assert_eq!(breakdown[0].amount, 250.0);
        assert_eq!(breakdown[0].percentage, 50.0);
        assert_eq!(breakdown[1].category, "food");
        assert_eq!(breakdown[1].percentage, 30.0);
        assert_eq!(breakdown[2].category, "health");
        assert_eq!(breakdown[2].percentage, 20.0);
    }

    #[test]
    fn test_category_breakdown_drops_non_positive_totals() {
        let expenses = vec![expense_model(1, "food", 0.0), expense_model(2, "travel", 40.0)];
        let breakdown = get_category_breakdown(&expenses);
        assert_eq!(breakdown.len(), 1);
        assert_eq!(breakdown[0].category, "travel");
        assert_eq!(breakdown[0].percentage, 100.0);
    }

    #[test]
    fn test_category_breakdown_empty() {
        assert!(get_category_breakdown(&[]).is_empty());
    }

    #[test]
    fn test_month_comparison() {
        let comparison = get_month_comparison(1200.0, 1000.0, 3000.0, 2500.0);

        assert_eq!(comparison.expenses.difference, 200.0);
        assert_eq!(comparison.expenses.percent_change, 20.0);
        assert_eq!(comparison.income.difference, 500.0);
        assert_eq!(comparison.income.percent_change, 20.0);
        assert_eq!(comparison.savings.current, 1800.0);
        assert_eq!(comparison.savings.previous, 1500.0);
        assert_eq!(comparison.savings.percent_change, 20.0);
    }

    #[test]
    fn test_month_comparison_from_zero_reports_zero_percent() {
        let comparison = get_month_comparison(500.0, 0.0, 0.0, 0.0);

        assert_eq!(comparison.expenses.difference, 500.0);
        assert_eq!(comparison.expenses.percent_change, 0.0);
        assert_eq!(comparison.income.percent_change, 0.0);
        assert!(comparison.savings.percent_change.is_finite());
    }

    #[test]
    fn test_daily_burn_rate_mid_month() {
        let reference = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();

        let burn = get_daily_burn_rate(450.0, 900.0, reference);

        assert_eq!(burn.days_in_month, 30);
        assert_eq!(burn.days_elapsed, 15);
        assert_eq!(burn.current_daily_avg, 30.0);
        assert_eq!(burn.previous_daily_avg, 30.0);
        assert_eq!(burn.projected_month_total, 900.0);
    }

    #[test]
    fn test_daily_burn_rate_first_day_of_leap_february() {
        let reference = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();

        let burn = get_daily_burn_rate(29.0, 0.0, reference);

        assert_eq!(burn.days_in_month, 29);
        assert_eq!(burn.current_daily_avg, 29.0);
        assert_eq!(burn.previous_daily_avg, 0.0);
        assert_eq!(burn.projected_month_total, 841.0);
    }

    #[test]
    fn test_monthly_trend_fills_gaps() {
        let months = MonthKey::new(2024, 3).unwrap().trailing(3);
        let mut expenses = BTreeMap::new();
        expenses.insert(MonthKey::new(2024, 1).unwrap(), 400.0);
        expenses.insert(MonthKey::new(2024, 3).unwrap(), 250.0);
        let mut incomes = BTreeMap::new();
        incomes.insert(MonthKey::new(2024, 3).unwrap(), 1000.0);

        let trend = get_monthly_trend(&months, &expenses, &incomes);

        assert_eq!(trend.len(), 3);
        assert_eq!(trend[0].savings, -400.0);
        assert_eq!(trend[1].expenses, 0.0);
        assert_eq!(trend[1].income, 0.0);
        assert_eq!(trend[2].savings, 750.0);
    }

    #[test]
    fn test_expenses_by_month_uses_expense_date() {
        let mut january = expense_model(1, "food", 10.0);
        january.date = Utc.with_ymd_and_hms(2024, 1, 31, 22, 0, 0).unwrap();
        let mut february = expense_model(2, "food", 5.0);
        february.date = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();

        let totals = expenses_by_month(&[january, february]);

        assert_eq!(totals[&MonthKey::new(2024, 1).unwrap()], 10.0);
        assert_eq!(totals[&MonthKey::new(2024, 2).unwrap()], 5.0);
    }

    #[test]
    fn test_incomes_by_month_groups_by_key() {
        let malformed = income::Model {
            id: 4,
            month: "garbage".into(),
            ..income_model(4, "2024-05", 99.0)
        };
        let incomes = vec![
            income_model(1, "2024-04", 1000.0),
            income_model(2, "2024-05", 2000.0),
            income_model(3, "2024-05", 250.0),
            malformed,
        ];

        let totals = incomes_by_month(&incomes);

        assert_eq!(totals.len(), 2);
        assert_eq!(totals[&MonthKey::new(2024, 4).unwrap()], 1000.0);
        assert_eq!(totals[&MonthKey::new(2024, 5).unwrap()], 2250.0);
    }

    #[test]
    fn test_savings_rate() {
        assert_eq!(get_savings_rate(2000.0, 1500.0), 25.0);
        assert_eq!(get_savings_rate(0.0, 100.0), 0.0);
        assert_eq!(get_savings_rate(1000.0, 1500.0), -50.0);
    }
}
