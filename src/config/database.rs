//! Database configuration module.
//!
//! This module handles the database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the schema always matches the Rust
//! structs. The same code serves the local `SQLite` file used in personal mode
//! and any other `SeaORM` backend used as the shared remote store.

use crate::entities::{
    Budget, CategoryBudget, Expense, Income, RecurringExpense, RecurringIncome, SavingsTracker,
    category_budget,
};
use crate::errors::Result;
use sea_orm::sea_query::Index;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema};
use tracing::{debug, info};

/// Default local database used when neither the environment nor the config file set one.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/household_budget.sqlite?mode=rwc";

/// Gets the database URL, preferring the `DATABASE_URL` environment variable
/// over the configured value.
#[must_use]
pub fn get_database_url(configured: Option<&str>) -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| {
        configured.map_or_else(|| DEFAULT_DATABASE_URL.to_string(), ToString::to_string)
    })
}

/// Establishes a connection to the database at `database_url`.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    info!("Connecting to database");
    debug!("Database URL: {}", database_url);
    Database::connect(database_url).await.map_err(Into::into)
}

/// Creates all ledger tables and their indexes, skipping any that already exist.
///
/// Budgets and savings trackers are unique per month through their column
/// definitions; category budgets are unique per `(month, category)` through
/// an explicit index.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    create_table(db, &schema, Budget).await?;
    create_table(db, &schema, Expense).await?;
    create_table(db, &schema, RecurringExpense).await?;
    create_table(db, &schema, Income).await?;
    create_table(db, &schema, RecurringIncome).await?;
    create_table(db, &schema, CategoryBudget).await?;
    create_table(db, &schema, SavingsTracker).await?;

    let category_month_index = Index::create()
        .name("idx_category_budgets_month_category")
        .table(CategoryBudget)
        .col(category_budget::Column::Month)
        .col(category_budget::Column::Category)
        .unique()
        .if_not_exists()
        .to_owned();
    db.execute(builder.build(&category_month_index)).await?;

    Ok(())
}

async fn create_table<E>(db: &DatabaseConnection, schema: &Schema, entity: E) -> Result<()>
where
    E: EntityTrait,
{
    let builder = db.get_database_backend();
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(builder.build(&statement)).await?;
    Ok(())
}
