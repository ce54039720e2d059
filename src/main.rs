use dotenvy::dotenv;
use order_desk::{
    config::{self, Settings},
    core::{order, product},
    errors::Result,
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file (non-fatal, env vars can be set externally)
    dotenv().ok();
    let settings = Settings::from_env();
    info!(catalog = %settings.catalog_path.display(), "Loaded settings");

    // 3. Connect and make sure the schema exists
    let db = config::database::create_connection(&settings.database_url)
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    config::database::create_tables(&db)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to initialize database: {}", e))?;

    // 4. Seed the product catalog, if there is one
    if settings.catalog_path.exists() {
        let catalog = config::catalog::load_catalog(&settings.catalog_path)
            .inspect_err(|e| error!("Failed to load product catalog: {}", e))?;
        let created = product::seed_products(&db, &catalog.products).await?;
        info!(created, "Product catalog seeded.");
    } else {
        warn!(
            "No product catalog at {}, skipping seeding",
            settings.catalog_path.display()
        );
    }

    // 5. Report what the store holds
    let products = product::list_products(&db).await?;
    let orders = order::list_orders(&db).await?;
    info!(
        products = products.len(),
        orders = orders.len(),
        "Order desk ready"
    );
    for order in &orders {
        info!(lines = order.details.len(), total = order.total(), "{order}");
    }

    Ok(())
}
