use anyhow::Result;
use tracing::{info, warn};

use course_tracker_api::{app, config, middleware, services};
use persistence::repositories::CredentialRepository;
use persistence::Gateway;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = config::Config::load()?;

    middleware::logging::init_logging(&config.logging);

    info!("Starting Course Tracker v{}", env!("CARGO_PKG_VERSION"));
    if config.uses_dev_secret() {
        warn!("SECURITY: using the development secret key; set SECRET_KEY before deploying");
    }

    let pool = persistence::db::create_pool(&config.database.pool_config()).await?;
    info!(
        host = %config.database.host,
        database = %config.database.name,
        "Connected to database"
    );

    info!("Running database migrations...");
    sqlx::migrate!("../persistence/src/migrations")
        .run(&pool)
        .await?;
    info!("Migrations completed");

    let credentials = CredentialRepository::new(Gateway::new(pool.clone()));
    services::bootstrap::bootstrap_accounts(&credentials, &config.bootstrap).await?;

    let addr = config.socket_addr()?;
    let app = app::create_app(config, pool)?;

    info!("Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
