use std::env;

use bonus_engine::api::{AppState, create_router};
use bonus_engine::config::ConfigLoader;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_target(false)
        .init();

    let config_dir =
        env::var("BONUS_ENGINE_CONFIG").unwrap_or_else(|_| "./config/default".to_string());
    let addr = env::var("BONUS_ENGINE_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

    let config = ConfigLoader::load(&config_dir)?;
    info!(
        config_dir = %config_dir,
        policy = %config.policy().name,
        version = %config.policy().version,
        "Loaded bonus policy"
    );

    let app = create_router(AppState::new(config));
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(addr = %addr, engine_version = env!("CARGO_PKG_VERSION"), "Bonus engine listening");

    axum::serve(listener, app).await?;

    Ok(())
}
