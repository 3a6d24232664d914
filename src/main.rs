use authgate::{api, observability, storage, AppConfig, Result, APP_NAME, VERSION};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (optional - won't fail if missing)
    // This must happen before any config is read from environment
    if let Err(e) = dotenvy::dotenv() {
        if !e.to_string().contains("not found") {
            eprintln!("Warning: Error loading .env file: {}", e);
        }
    }

    let config = AppConfig::from_env()?;
    config.validate()?;

    observability::init_tracing(&config.observability)?;
    info!(app_name = APP_NAME, version = VERSION, "Starting authgate API server");
    info!(
        port = config.server.port,
        request_timeout_ms = config.server.request_timeout_ms,
        force_credentials = config.auth.force_credentials,
        "Loaded configuration from environment"
    );

    let pool = storage::create_pool(&config.database).await?;
    storage::run_migrations(&pool).await?;

    api::start(config, pool).await
}
