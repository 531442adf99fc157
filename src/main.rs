use dotenvy::dotenv;
use household_budget::{
    config::{database, settings},
    core::report,
    errors::Result,
    store::{RefreshOutcome, Store},
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file, non-fatal since env vars can be set externally
    dotenv().ok();

    // 3. Load config.toml, or defaults when it is absent
    let app_settings = settings::load_default_config()
        .inspect_err(|e| error!("Failed to load configuration: {}", e))?;

    // 4. Connect and make sure the schema exists
    let database_url = database::get_database_url(app_settings.database.url.as_deref());
    let db = database::create_connection(&database_url)
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 5. Open the ledger and bring the current month up to date
    let store = Store::open(
        db,
        app_settings.store,
        app_settings.analytics.top_expenses_limit,
    )
    .await?;
    match store.refresh().await? {
        RefreshOutcome::Completed {
            month,
            materialized,
        } => info!("Ledger ready for {} ({} new recurring incomes)", month, materialized),
        RefreshOutcome::Skipped => info!("Refresh skipped"),
    }

    // 6. Print the dashboard
    let dashboard = store.dashboard().await?;
    println!(
        "{}",
        report::format_dashboard_summary(&dashboard, &app_settings.display.currency_symbol)
    );

    Ok(())
}
