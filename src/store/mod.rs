//! The ledger store.
//!
//! [`Store`] owns the database connection and an in-memory [`Snapshot`] of one
//! month. Every command follows the same path: validate, persist through the
//! repositories in [`crate::core`], reload the affected collections, then
//! recompute the totals. Commands are not transactional across collections.
//!
//! [`Store::refresh`] reloads the whole month and materializes recurring
//! incomes. It is guarded by a per-store [`RefreshGate`]: a refresh requested
//! while another is in flight is skipped.

/// Remote change notifications
pub mod changes;
/// Refresh re-entrancy guard
pub mod gate;
/// In-memory view of one month
pub mod snapshot;

pub use changes::{ChangeEvent, ChangeEventType, LedgerRecord};
pub use gate::{RefreshGate, RefreshGuard, RefreshOutcome, RefreshState};
pub use snapshot::{Snapshot, Totals};

use crate::{
    config::settings::{AccountMode, StoreSettings},
    core::{
        analytics::{self, MonthlyTotals},
        budget, category_budget,
        category_budget::CategoryBudgetInput,
        expense::{self, ExpenseInput},
        income::{self, IncomeInput},
        period::MonthKey,
        recurring_expense::{self, RecurringExpenseInput},
        recurring_income::{self, RecurringIncomeInput},
        report::{self, Dashboard, DashboardSource},
        rollover, savings,
    },
    entities::{
        BudgetModel, CategoryBudgetModel, ExpenseModel, IncomeModel, RecurringExpenseModel,
        RecurringIncomeModel, SavingsTrackerModel,
    },
    errors::Result,
};
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::DatabaseConnection;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Collections a command may need to reload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Collection {
    Budget,
    Expenses,
    RecurringExpenses,
    RecurringIncomes,
    Incomes,
    CategoryBudgets,
    Savings,
}

/// State container for one household ledger.
#[derive(Debug)]
pub struct Store {
    db: DatabaseConnection,
    settings: StoreSettings,
    top_expenses_limit: usize,
    gate: RefreshGate,
    snapshot: RwLock<Snapshot>,
}

impl Store {
    /// Opens a store on the current month.
    pub async fn open(
        db: DatabaseConnection,
        settings: StoreSettings,
        top_expenses_limit: usize,
    ) -> Result<Self> {
        Self::open_for_month(db, settings, top_expenses_limit, MonthKey::current()).await
    }

    /// Opens a store on `month` and loads its records.
    ///
    /// No recurring incomes are materialized until the first refresh.
    pub async fn open_for_month(
        db: DatabaseConnection,
        settings: StoreSettings,
        top_expenses_limit: usize,
        month: MonthKey,
    ) -> Result<Self> {
        let snapshot = Snapshot::load(&db, month).await?;
        info!(
            "Opened {:?} ledger for {} ({} expenses, {} incomes)",
            settings.mode,
            month,
            snapshot.expenses.len(),
            snapshot.incomes.len()
        );
        Ok(Self {
            db,
            settings,
            top_expenses_limit,
            gate: RefreshGate::new(),
            snapshot: RwLock::new(snapshot),
        })
    }

    /// The underlying database connection.
    #[must_use]
    pub const fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Store behaviour settings.
    #[must_use]
    pub const fn settings(&self) -> StoreSettings {
        self.settings
    }

    /// The refresh gate of this store.
    #[must_use]
    pub const fn gate(&self) -> &RefreshGate {
        &self.gate
    }

    /// A copy of the current snapshot.
    pub async fn snapshot(&self) -> Snapshot {
        self.snapshot.read().await.clone()
    }

    /// Month the snapshot currently holds.
    pub async fn month(&self) -> MonthKey {
        self.snapshot.read().await.month
    }

    /// Current derived totals.
    pub async fn totals(&self) -> Totals {
        self.snapshot.read().await.totals
    }

    // --- Refresh ---

    /// Refreshes the store for the month of the current time.
    pub async fn refresh(&self) -> Result<RefreshOutcome> {
        self.refresh_at(Utc::now()).await
    }

    /// Refreshes the store as if the current time were `now`.
    ///
    /// Loads every collection of `now`'s month, materializes the missing
    /// recurring incomes and replaces the snapshot. When the month changed
    /// since the last refresh the store rolls over to the new month.
    pub async fn refresh_at(&self, now: DateTime<Utc>) -> Result<RefreshOutcome> {
        let Some(_guard) = self.gate.try_begin() else {
            warn!("Refresh already in progress, skipping");
            return Ok(RefreshOutcome::Skipped);
        };

        let month = MonthKey::from_date(&now);
        debug!("Refreshing ledger for {}", month);

        let mut fresh = Snapshot::load(&self.db, month).await?;
        let result = rollover::materialize_recurring_incomes(
            &self.db,
            month,
            self.settings.income_dedup,
            now,
        )
        .await?;
        let materialized = result.created.len();
        fresh.incomes = result.incomes;

        let mut snapshot = self.snapshot.write().await;
        if snapshot.month != month {
            info!("Rolling ledger over from {} to {}", snapshot.month, month);
        }
        fresh.version = snapshot.version;
        fresh.recompute();
        *snapshot = fresh;

        info!(
            "Refresh complete for {}: {} recurring incomes materialized",
            month, materialized
        );
        Ok(RefreshOutcome::Completed {
            month,
            materialized,
        })
    }

    // --- Budget ---

    /// Sets the manual budget of the snapshot month.
    pub async fn set_budget(&self, amount: f64) -> Result<BudgetModel> {
        let month = self.month().await;
        let budget = budget::set_budget(&self.db, month, amount).await?;
        info!("Set budget for {} to {:.2}", month, amount);
        self.reload(&[Collection::Budget]).await?;
        Ok(budget)
    }

    // --- Expenses ---

    /// Records an expense, creating its month's budget row if needed.
    pub async fn add_expense(&self, input: ExpenseInput) -> Result<ExpenseModel> {
        let expense = expense::create_expense(&self.db, input).await?;
        info!(
            "Added expense {} of {:.2} in '{}'",
            expense.id, expense.amount, expense.category
        );
        self.reload(&[Collection::Budget, Collection::Expenses]).await?;
        Ok(expense)
    }

    /// Edits an expense.
    pub async fn update_expense(&self, expense_id: i64, input: ExpenseInput) -> Result<ExpenseModel> {
        let expense = expense::update_expense(&self.db, expense_id, input).await?;
        info!("Updated expense {}", expense_id);
        self.reload(&[Collection::Budget, Collection::Expenses]).await?;
        Ok(expense)
    }

    /// Deletes an expense.
    pub async fn delete_expense(&self, expense_id: i64) -> Result<()> {
        expense::delete_expense(&self.db, expense_id).await?;
        info!("Deleted expense {}", expense_id);
        self.reload(&[Collection::Expenses]).await
    }

    // --- Recurring expenses ---

    /// Creates a recurring expense template.
    ///
    /// In shared mode an active template is also posted as a dated expense
    /// of the snapshot month, which is returned alongside the template.
    pub async fn add_recurring_expense(
        &self,
        input: RecurringExpenseInput,
    ) -> Result<(RecurringExpenseModel, Option<ExpenseModel>)> {
        let (template, instance) = match self.settings.mode {
            AccountMode::Personal => (
                recurring_expense::create_recurring_expense(&self.db, input).await?,
                None,
            ),
            AccountMode::Shared => {
                let date = self.instance_date(Utc::now()).await;
                recurring_expense::create_recurring_expense_with_instance(&self.db, input, date)
                    .await?
            }
        };
        info!(
            "Added recurring expense {} of {:.2} in '{}'",
            template.id, template.amount, template.category
        );

        if instance.is_some() {
            self.reload(&[
                Collection::RecurringExpenses,
                Collection::Budget,
                Collection::Expenses,
            ])
            .await?;
        } else {
            self.reload(&[Collection::RecurringExpenses]).await?;
        }
        Ok((template, instance))
    }

    /// Edits a recurring expense template.
    pub async fn update_recurring_expense(
        &self,
        template_id: i64,
        input: RecurringExpenseInput,
    ) -> Result<RecurringExpenseModel> {
        let template =
            recurring_expense::update_recurring_expense(&self.db, template_id, input).await?;
        info!("Updated recurring expense {}", template_id);
        self.reload(&[Collection::RecurringExpenses]).await?;
        Ok(template)
    }

    /// Deletes a recurring expense template.
    pub async fn delete_recurring_expense(&self, template_id: i64) -> Result<()> {
        recurring_expense::delete_recurring_expense(&self.db, template_id).await?;
        info!("Deleted recurring expense {}", template_id);
        self.reload(&[Collection::RecurringExpenses]).await
    }

    // --- Incomes ---

    /// Records a hand-entered income.
    pub async fn add_income(&self, input: IncomeInput) -> Result<IncomeModel> {
        let income = income::create_income(&self.db, input.into()).await?;
        info!(
            "Added income {} of {:.2} from {} for {}",
            income.id, income.amount, income.source, income.month
        );
        self.reload(&[Collection::Incomes]).await?;
        Ok(income)
    }

    /// Edits an income.
    pub async fn update_income(&self, income_id: i64, input: IncomeInput) -> Result<IncomeModel> {
        let income = income::update_income(&self.db, income_id, input).await?;
        info!("Updated income {}", income_id);
        self.reload(&[Collection::Incomes]).await?;
        Ok(income)
    }

    /// Deletes an income.
    pub async fn delete_income(&self, income_id: i64) -> Result<()> {
        income::delete_income(&self.db, income_id).await?;
        info!("Deleted income {}", income_id);
        self.reload(&[Collection::Incomes]).await
    }

    // --- Recurring incomes ---

    /// Creates a recurring income template. It materializes on the next refresh.
    pub async fn add_recurring_income(
        &self,
        input: RecurringIncomeInput,
    ) -> Result<RecurringIncomeModel> {
        let template = recurring_income::create_recurring_income(&self.db, input).await?;
        info!(
            "Added recurring income {} of {:.2} from {}",
            template.id, template.amount, template.source
        );
        self.reload(&[Collection::RecurringIncomes]).await?;
        Ok(template)
    }

    /// Edits a recurring income template.
    pub async fn update_recurring_income(
        &self,
        template_id: i64,
        input: RecurringIncomeInput,
    ) -> Result<RecurringIncomeModel> {
        let template =
            recurring_income::update_recurring_income(&self.db, template_id, input).await?;
        info!("Updated recurring income {}", template_id);
        self.reload(&[Collection::RecurringIncomes]).await?;
        Ok(template)
    }

    /// Deletes a recurring income template.
    pub async fn delete_recurring_income(&self, template_id: i64) -> Result<()> {
        recurring_income::delete_recurring_income(&self.db, template_id).await?;
        info!("Deleted recurring income {}", template_id);
        self.reload(&[Collection::RecurringIncomes]).await
    }

    // --- Category budgets ---

    /// Sets a category ceiling.
    pub async fn set_category_budget(
        &self,
        input: CategoryBudgetInput,
    ) -> Result<CategoryBudgetModel> {
        let budget = category_budget::set_category_budget(&self.db, input).await?;
        info!(
            "Set '{}' budget for {} to {:.2}",
            budget.category, budget.month, budget.amount
        );
        self.reload(&[Collection::CategoryBudgets]).await?;
        Ok(budget)
    }

    /// Deletes a category ceiling.
    pub async fn delete_category_budget(&self, category_budget_id: i64) -> Result<()> {
        category_budget::delete_category_budget(&self.db, category_budget_id).await?;
        info!("Deleted category budget {}", category_budget_id);
        self.reload(&[Collection::CategoryBudgets]).await
    }

    /// Copies the recurring category budgets of the snapshot month into the
    /// following month.
    pub async fn roll_category_budgets_forward(&self) -> Result<Vec<CategoryBudgetModel>> {
        let month = self.month().await;
        rollover::clone_recurring_category_budgets(&self.db, month, month.next()).await
    }

    // --- Savings ---

    /// Sets the savings target of the snapshot month.
    pub async fn set_savings_target(&self, target_amount: f64) -> Result<SavingsTrackerModel> {
        let month = self.month().await;
        let tracker = savings::set_savings_target(&self.db, month, target_amount).await?;
        info!("Set savings target for {} to {:.2}", month, target_amount);
        self.reload(&[Collection::Savings]).await?;
        Ok(tracker)
    }

    /// Records the snapshot month's remaining money as its actual savings.
    pub async fn record_month_savings(&self) -> Result<SavingsTrackerModel> {
        let (month, remaining) = {
            let snapshot = self.snapshot.read().await;
            (snapshot.month, snapshot.totals.available.remaining)
        };
        let tracker = savings::record_actual_savings(&self.db, month, remaining).await?;
        info!(
            "Recorded {:.2} saved in {} (total {:.2})",
            tracker.actual_saved, month, tracker.total_accumulated
        );
        self.reload(&[Collection::Savings]).await?;
        Ok(tracker)
    }

    // --- Remote changes ---

    /// Patches the snapshot with a change made elsewhere and recomputes the
    /// totals. Returns whether the snapshot changed.
    pub async fn apply_change(&self, event: ChangeEvent) -> bool {
        let mut snapshot = self.snapshot.write().await;
        let event_type = event.event_type;
        let changed = changes::apply_to_snapshot(&mut snapshot, event);
        if changed {
            snapshot.recompute();
            debug!("Applied remote {:?} to {}", event_type, snapshot.month);
        }
        changed
    }

    // --- Views ---

    /// Dashboard of the snapshot month as of today.
    pub async fn dashboard(&self) -> Result<Dashboard> {
        self.dashboard_on(Utc::now().date_naive()).await
    }

    /// Dashboard of the snapshot month as seen on `today`.
    pub async fn dashboard_on(&self, today: NaiveDate) -> Result<Dashboard> {
        let previous = self.month().await.previous();
        let previous_expenses = expense::get_expenses_by_month(&self.db, previous).await?;
        let previous_incomes = income::get_incomes_by_month(&self.db, previous).await?;

        let snapshot = self.snapshot.read().await;

        Ok(report::build_dashboard(
            DashboardSource {
                month: snapshot.month,
                metrics: &snapshot.totals.metrics,
                available: &snapshot.totals.available,
                category_budgets: &snapshot.category_budgets,
                expenses: &snapshot.expenses,
                previous_expenses: previous_expenses.iter().map(|e| e.amount).sum(),
                previous_income: previous_incomes.iter().map(|i| i.amount).sum(),
            },
            self.top_expenses_limit,
            today,
        ))
    }

    /// Income, spending and savings for the `months` months ending with the
    /// snapshot month, oldest first.
    pub async fn monthly_trend(&self, months: usize) -> Result<Vec<MonthlyTotals>> {
        let month = self.month().await;
        let expenses = expense::get_all_expenses(&self.db).await?;
        let incomes = income::get_all_incomes(&self.db).await?;

        Ok(analytics::get_monthly_trend(
            &month.trailing(months),
            &analytics::expenses_by_month(&expenses),
            &analytics::incomes_by_month(&incomes),
        ))
    }

    // --- Internals ---

    /// Date a shared-mode recurring expense is posted on: `now` when it falls
    /// in the snapshot month, otherwise the start of that month.
    async fn instance_date(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let month = self.month().await;
        if month.contains(&now) {
            now
        } else {
            month.start_utc()
        }
    }

    /// Reloads `collections` for the snapshot month and recomputes the totals.
    async fn reload(&self, collections: &[Collection]) -> Result<()> {
        let mut snapshot = self.snapshot.write().await;
        let month = snapshot.month;

        for collection in collections {
            match collection {
                Collection::Budget => {
                    snapshot.budget = budget::get_budget_by_month(&self.db, month).await?;
                }
                Collection::Expenses => {
                    snapshot.expenses = expense::get_expenses_by_month(&self.db, month).await?;
                }
                Collection::RecurringExpenses => {
                    snapshot.recurring_expenses =
                        recurring_expense::get_all_recurring_expenses(&self.db).await?;
                }
                Collection::RecurringIncomes => {
                    snapshot.recurring_incomes =
                        recurring_income::get_all_recurring_incomes(&self.db).await?;
                }
                Collection::Incomes => {
                    snapshot.incomes = income::get_incomes_by_month(&self.db, month).await?;
                }
                Collection::CategoryBudgets => {
                    snapshot.category_budgets =
                        category_budget::get_category_budgets_by_month(&self.db, month).await?;
                }
                Collection::Savings => {
                    snapshot.savings = savings::get_savings_tracker(&self.db, month).await?;
                }
            }
        }

        snapshot.recompute();
        debug!(
            "Snapshot for {} at version {} after reloading {:?}",
            month, snapshot.version, collections
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::config::database;
    use crate::core::rollover::DedupStrategy;
    use crate::errors::Error;
    use crate::test_utils::*;
    use sea_orm::ConnectionTrait;

    async fn open_store(mode: AccountMode, income_dedup: DedupStrategy) -> Result<Store> {
        let db = setup_test_db().await?;
        Store::open_for_month(
            db,
            StoreSettings { mode, income_dedup },
            analytics::DEFAULT_TOP_EXPENSES,
            month("2024-05"),
        )
        .await
    }

    async fn personal_store() -> Result<Store> {
        open_store(AccountMode::Personal, DedupStrategy::TemplateId).await
    }

    #[tokio::test]
    async fn test_full_month_totals() -> Result<()> {
        let store = personal_store().await?;

        store.add_income(income_input("2024-05", 3000.0)).await?;
        store
            .add_recurring_expense(recurring_expense_input("housing", 800.0))
            .await?;
        store
            .set_category_budget(category_budget_input("2024-05", "food", 600.0))
            .await?;
        store
            .set_category_budget(category_budget_input("2024-05", "entertainment", 300.0))
            .await?;
        store.set_savings_target(200.0).await?;
        store.add_expense(expense_input("food", 50.0, "2024-05-03")).await?;
        store.add_expense(expense_input("food", 120.0, "2024-05-09")).await?;

        let totals = store.totals().await;
        assert_eq!(totals.metrics.available_for_budget, 2200.0);
        assert_eq!(totals.metrics.total_budgeted, 900.0);
        assert_eq!(totals.metrics.buffer, 1100.0);
        assert_eq!(totals.metrics.total_spent, 170.0);
        assert_eq!(totals.metrics.actual_savings, 2030.0);
        assert_eq!(totals.available.remaining, 2030.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_manual_budget_applies_without_income() -> Result<()> {
        let store = personal_store().await?;

        store.set_budget(1500.0).await?;
        store.add_expense(expense_input("food", 900.0, "2024-05-02")).await?;
        store.add_expense(expense_input("travel", 700.0, "2024-05-20")).await?;

        let totals = store.totals().await;
        assert!(totals.available.uses_manual_budget);
        assert_eq!(totals.available.available, 1500.0);
        assert_eq!(totals.available.remaining, -100.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_expense_lazily_creates_budget_row() -> Result<()> {
        let store = personal_store().await?;
        assert!(store.snapshot().await.budget.is_none());

        store.add_expense(expense_input("food", 10.0, "2024-05-02")).await?;

        let snapshot = store.snapshot().await;
        assert_eq!(snapshot.budget.as_ref().map(|b| b.amount), Some(0.0));
        assert_eq!(snapshot.expenses.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_expense_of_other_month_stays_out_of_snapshot() -> Result<()> {
        let store = personal_store().await?;

        let june = store.add_expense(expense_input("food", 10.0, "2024-06-02")).await?;
        assert!(store.snapshot().await.expenses.is_empty());

        // Moving it into May brings it in
        store
            .update_expense(june.id, expense_input("food", 10.0, "2024-05-30"))
            .await?;
        assert_eq!(store.snapshot().await.expenses.len(), 1);

        store.delete_expense(june.id).await?;
        assert!(store.snapshot().await.expenses.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_refresh_materializes_once() -> Result<()> {
        let store = personal_store().await?;
        store
            .add_recurring_income(recurring_income_input(3000.0))
            .await?;
        assert!(!store.snapshot().await.has_income());

        let first = store.refresh_at(date_time("2024-05-02")).await?;
        let second = store.refresh_at(date_time("2024-05-03")).await?;

        assert_eq!(
            first,
            RefreshOutcome::Completed {
                month: month("2024-05"),
                materialized: 1
            }
        );
        assert_eq!(
            second,
            RefreshOutcome::Completed {
                month: month("2024-05"),
                materialized: 0
            }
        );
        let snapshot = store.snapshot().await;
        assert_eq!(snapshot.incomes.len(), 1);
        assert!(snapshot.incomes[0].is_recurring);
        assert_eq!(snapshot.totals.metrics.total_revenue, 3000.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_refresh_skipped_while_gate_held() -> Result<()> {
        let store = personal_store().await?;
        store
            .add_recurring_income(recurring_income_input(3000.0))
            .await?;
        let version = store.snapshot().await.version;

        let guard = store.gate().try_begin().unwrap();
        let outcome = store.refresh_at(date_time("2024-05-02")).await?;

        assert_eq!(outcome, RefreshOutcome::Skipped);
        assert_eq!(store.snapshot().await.version, version);
        assert!(income::get_all_incomes(store.connection()).await?.is_empty());

        drop(guard);
        let outcome = store.refresh_at(date_time("2024-05-02")).await?;
        assert!(matches!(outcome, RefreshOutcome::Completed { materialized: 1, .. }));
        assert_eq!(store.gate().state(), RefreshState::Idle);

        Ok(())
    }

    #[tokio::test]
    async fn test_failed_refresh_releases_gate() -> Result<()> {
        let store = personal_store().await?;
        store
            .add_recurring_income(recurring_income_input(3000.0))
            .await?;
        store
            .connection()
            .execute_unprepared("DROP TABLE incomes")
            .await?;

        let result = store.refresh_at(date_time("2024-05-02")).await;

        assert!(matches!(result, Err(Error::Database(_))));
        assert_eq!(store.gate().state(), RefreshState::Idle);

        database::create_tables(store.connection()).await?;
        let outcome = store.refresh_at(date_time("2024-05-02")).await?;
        assert!(matches!(outcome, RefreshOutcome::Completed { materialized: 1, .. }));
        assert_eq!(store.snapshot().await.incomes.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_refresh_rolls_over_to_new_month() -> Result<()> {
        let store = personal_store().await?;
        store
            .add_recurring_income(recurring_income_input(2500.0))
            .await?;
        store.add_expense(expense_input("food", 40.0, "2024-05-10")).await?;

        let outcome = store.refresh_at(date_time("2024-06-01")).await?;

        assert!(matches!(outcome, RefreshOutcome::Completed { materialized: 1, .. }));
        let snapshot = store.snapshot().await;
        assert_eq!(snapshot.month, month("2024-06"));
        assert!(snapshot.expenses.is_empty());
        assert_eq!(snapshot.incomes.len(), 1);
        assert_eq!(snapshot.incomes[0].month, "2024-06");

        Ok(())
    }

    #[tokio::test]
    async fn test_content_dedup_collapses_identical_templates() -> Result<()> {
        let store = open_store(AccountMode::Personal, DedupStrategy::Content).await?;
        store
            .add_recurring_income(recurring_income_input(2000.0))
            .await?;
        store
            .add_recurring_income(recurring_income_input(2000.0))
            .await?;

        store.refresh_at(date_time("2024-05-02")).await?;

        assert_eq!(store.snapshot().await.incomes.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_shared_mode_posts_recurring_expense() -> Result<()> {
        let store = open_store(AccountMode::Shared, DedupStrategy::TemplateId).await?;

        let (template, instance) = store
            .add_recurring_expense(recurring_expense_input("subscriptions", 15.0))
            .await?;

        let instance = instance.unwrap();
        assert_eq!(instance.amount, template.amount);
        assert_eq!(MonthKey::from_date(&instance.date), month("2024-05"));
        let totals = store.totals().await;
        assert_eq!(totals.metrics.total_recurring, 15.0);
        assert_eq!(totals.metrics.total_spent, 15.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_personal_mode_does_not_post_recurring_expense() -> Result<()> {
        let store = personal_store().await?;

        let (_, instance) = store
            .add_recurring_expense(recurring_expense_input("subscriptions", 15.0))
            .await?;

        assert!(instance.is_none());
        assert!(store.snapshot().await.expenses.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_deactivating_recurring_expense_updates_totals() -> Result<()> {
        let store = personal_store().await?;
        store.add_income(income_input("2024-05", 1000.0)).await?;
        let (rent, _) = store
            .add_recurring_expense(recurring_expense_input("housing", 400.0))
            .await?;
        assert_eq!(store.totals().await.metrics.available_for_budget, 600.0);

        let mut input = recurring_expense_input("housing", 400.0);
        input.is_active = false;
        store.update_recurring_expense(rent.id, input).await?;
        assert_eq!(store.totals().await.metrics.available_for_budget, 1000.0);

        store.delete_recurring_expense(rent.id).await?;
        assert!(store.snapshot().await.recurring_expenses.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_income_and_template_commands() -> Result<()> {
        let store = personal_store().await?;

        let bonus = store.add_income(income_input("2024-05", 500.0)).await?;
        store
            .update_income(bonus.id, income_input("2024-05", 650.0))
            .await?;
        assert_eq!(store.totals().await.metrics.total_revenue, 650.0);
        store.delete_income(bonus.id).await?;
        assert!(!store.snapshot().await.has_income());

        let template = store
            .add_recurring_income(recurring_income_input(100.0))
            .await?;
        store
            .update_recurring_income(template.id, recurring_income_input(120.0))
            .await?;
        assert_eq!(store.snapshot().await.recurring_incomes[0].amount, 120.0);
        store.delete_recurring_income(template.id).await?;
        assert!(store.snapshot().await.recurring_incomes.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_command_leaves_snapshot_untouched() -> Result<()> {
        let store = personal_store().await?;
        let before = store.snapshot().await;

        let result = store.add_expense(expense_input("food", -3.0, "2024-05-02")).await;
        assert!(matches!(result, Err(Error::InvalidAmount { .. })));

        let result = store.delete_category_budget(99).await;
        assert!(matches!(result, Err(Error::RecordNotFound { .. })));

        assert_eq!(store.snapshot().await, before);
        Ok(())
    }

    #[tokio::test]
    async fn test_category_budget_commands_and_roll_forward() -> Result<()> {
        let store = personal_store().await?;
        let mut food = category_budget_input("2024-05", "food", 400.0);
        food.is_recurring = true;
        let food = store.set_category_budget(food).await?;
        let gifts = store
            .set_category_budget(category_budget_input("2024-05", "gifts", 50.0))
            .await?;
        assert_eq!(store.totals().await.metrics.total_budgeted, 450.0);

        store.delete_category_budget(gifts.id).await?;
        assert_eq!(store.totals().await.metrics.total_budgeted, 400.0);

        let carried = store.roll_category_budgets_forward().await?;
        assert_eq!(carried.len(), 1);
        assert_eq!(carried[0].month, "2024-06");
        assert_eq!(carried[0].amount, food.amount);

        Ok(())
    }

    #[tokio::test]
    async fn test_record_month_savings() -> Result<()> {
        let store = personal_store().await?;
        store.add_income(income_input("2024-05", 2000.0)).await?;
        store.add_expense(expense_input("food", 500.0, "2024-05-02")).await?;
        store.set_savings_target(300.0).await?;

        let tracker = store.record_month_savings().await?;

        assert_eq!(tracker.actual_saved, 1500.0);
        assert_eq!(tracker.total_accumulated, 1500.0);
        assert_eq!(tracker.target_amount, 300.0);
        assert_eq!(store.totals().await.metrics.target_savings, 300.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_apply_change_recomputes_totals() -> Result<()> {
        let store = personal_store().await?;
        let version = store.snapshot().await.version;

        let applied = store
            .apply_change(ChangeEvent {
                event_type: ChangeEventType::Insert,
                record: LedgerRecord::Income(income_model(41, "2024-05", 1200.0)),
            })
            .await;
        let ignored = store
            .apply_change(ChangeEvent {
                event_type: ChangeEventType::Insert,
                record: LedgerRecord::Income(income_model(42, "2024-04", 900.0)),
            })
            .await;

        assert!(applied);
        assert!(!ignored);
        let snapshot = store.snapshot().await;
        assert_eq!(snapshot.version, version + 1);
        assert_eq!(snapshot.totals.metrics.total_revenue, 1200.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_dashboard_compares_with_previous_month() -> Result<()> {
        let store = personal_store().await?;
        let db = store.connection();
        income::create_income(db, income_input("2024-04", 2000.0).into()).await?;
        expense::create_expense(db, expense_input("food", 400.0, "2024-04-12")).await?;

        store.add_income(income_input("2024-05", 2000.0)).await?;
        store
            .set_category_budget(category_budget_input("2024-05", "food", 500.0))
            .await?;
        store.add_expense(expense_input("food", 450.0, "2024-05-04")).await?;
        store.add_expense(expense_input("travel", 150.0, "2024-05-08")).await?;

        let dashboard = store
            .dashboard_on(NaiveDate::from_ymd_opt(2024, 5, 15).unwrap())
            .await?;

        assert_eq!(dashboard.month, month("2024-05"));
        assert_eq!(dashboard.alerts.len(), 1);
        assert_eq!(dashboard.alerts[0].budget.category, "food");
        assert_eq!(dashboard.top_expenses[0].expense.amount, 450.0);
        assert_eq!(dashboard.comparison.expenses.previous, 400.0);
        assert_eq!(dashboard.comparison.expenses.percent_change, 50.0);
        assert_eq!(dashboard.burn_rate.current_daily_avg, 40.0);
        assert_eq!(dashboard.savings_rate, 70.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_monthly_trend() -> Result<()> {
        let store = personal_store().await?;
        store.add_income(income_input("2024-05", 1000.0)).await?;
        store.add_income(income_input("2024-03", 800.0)).await?;
        store.add_expense(expense_input("food", 300.0, "2024-05-04")).await?;

        let trend = store.monthly_trend(3).await?;

        assert_eq!(trend.len(), 3);
        assert_eq!(trend[0].month, month("2024-03"));
        assert_eq!(trend[0].savings, 800.0);
        assert_eq!(trend[1].income, 0.0);
        assert_eq!(trend[2].savings, 700.0);

        Ok(())
    }
}
