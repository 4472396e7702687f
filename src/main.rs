use dotenvy::dotenv;
use tailor_billing::{
    config::{billing, database},
    core::invoice::reconcile_all_invoices,
    errors::{Error, Result},
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: tailor-billing [bootstrap|reconcile]";

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();

    let command = std::env::args().nth(1).unwrap_or_else(|| "bootstrap".to_string());
    if !matches!(command.as_str(), "bootstrap" | "reconcile") {
        error!("Unknown command {command:?}; {USAGE}");
        return Err(Error::Config {
            message: format!("unknown command {command:?}"),
        });
    }

    // 3. Load the billing configuration
    let config = billing::load_default_config()
        .inspect_err(|e| error!("Failed to load billing configuration: {e}"))?;
    info!(issuer = %config.business.name, "Billing configuration loaded");

    // 4. Connect and make sure the schema exists
    let database_url = database::get_database_url();
    let db = database::create_connection(&database_url)
        .await
        .inspect_err(|e| error!("Failed to connect to {database_url}: {e}"))?;
    database::create_tables(&db)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to create tables: {e}"))?;

    // 5. Optional maintenance pass
    if command == "reconcile" {
        let count = reconcile_all_invoices(&db)
            .await
            .inspect_err(|e| error!("Reconciliation failed: {e}"))?;
        info!("Recomputed {count} invoice(s)");
    }

    Ok(())
}
