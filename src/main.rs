use dotenvy::dotenv;
use registrar::{
    config::{app, database},
    core::department,
    errors::Result,
    web::{self, AppState},
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file, env vars can also be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load the application configuration
    let app_config = app::load_default_config()
        .inspect_err(|e| error!("Critical error loading application configuration: {}", e))?;
    let addr = app_config.addr()?;
    let seed = app_config.seed_departments()?;

    // 4. Connect and make sure every table exists
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|()| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to initialize database: {}", e))?;

    // 5. Seed the configured departments
    department::seed_departments(&db, &seed)
        .await
        .inspect(|created| info!(created, "Departments seeded."))
        .inspect_err(|e| error!("Failed to seed departments: {}", e))?;

    // 6. Serve
    web::serve(addr, AppState::new(db)).await
}
