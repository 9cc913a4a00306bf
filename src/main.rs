use std::sync::Arc;

use outfitlab_api::{
    config::Config,
    db::{
        create_pool, PgClothingRepository, PgOutfitRepository, PgStyleRepository,
        PgUserRepository, PgWeatherRepository,
    },
    routes::{create_router, AppSettings, AppState, Repositories},
    services::recommendation::GeminiClient,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "outfitlab_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let pool = create_pool(&config.database_url, config.database_max_connections).await?;
    tracing::info!("Connected to database");

    let repositories = Repositories {
        users: Arc::new(PgUserRepository::new(pool.clone())),
        clothing: Arc::new(PgClothingRepository::new(pool.clone())),
        outfits: Arc::new(PgOutfitRepository::new(pool.clone())),
        weather: Arc::new(PgWeatherRepository::new(pool.clone())),
        styles: Arc::new(PgStyleRepository::new(pool)),
    };

    let gemini = GeminiClient::new(
        config.gemini_api_key.clone(),
        config.gemini_api_url.clone(),
        config.gemini_model.clone(),
        config.recommendation_timeout(),
    )?;
    tracing::info!(model = %config.gemini_model, "Recommendation client configured");

    let state = Arc::new(AppState::new(
        repositories,
        Arc::new(gemini),
        AppSettings::from(&config),
    ));
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
