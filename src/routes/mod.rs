use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    middleware,
    routing::{delete, get},
    Json, Router,
};
use serde_json::{json, Value};
use std::{sync::Arc, time::Duration};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    config::Config,
    db::{
        ClothingRepository, OutfitRepository, StyleRepository, UserRepository, WeatherRepository,
    },
    middleware::{make_span_with_request_id, request_id_middleware},
    services::{recommendation::RecommendationClient, ClothingService, OutfitRecommender, OutfitService},
};

pub mod auth;
pub mod clothing;
pub mod outfits;
pub mod recommendations;
pub mod styles;
pub mod weather;

/// Storage collaborators the handlers are built on
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub clothing: Arc<dyn ClothingRepository>,
    pub outfits: Arc<dyn OutfitRepository>,
    pub weather: Arc<dyn WeatherRepository>,
    pub styles: Arc<dyn StyleRepository>,
}

/// Request-independent settings needed by handlers
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub jwt_secret: String,
    pub media_base_url: String,
    pub cors_allowed_origins: Vec<String>,
    pub recommendation_timeout: Duration,
    pub restrict_recommendations_to_inventory: bool,
}

impl From<&Config> for AppSettings {
    fn from(config: &Config) -> Self {
        Self {
            jwt_secret: config.jwt_secret.clone(),
            media_base_url: config.media_base_url.clone(),
            cors_allowed_origins: config.cors_allowed_origins.clone(),
            recommendation_timeout: config.recommendation_timeout(),
            restrict_recommendations_to_inventory: config.restrict_recommendations_to_inventory,
        }
    }
}

/// Shared application state. Everything in it is immutable after startup.
pub struct AppState {
    pub settings: AppSettings,
    pub users: Arc<dyn UserRepository>,
    pub weather: Arc<dyn WeatherRepository>,
    pub styles: Arc<dyn StyleRepository>,
    pub clothing: Arc<ClothingService>,
    pub outfits: Arc<OutfitService>,
    pub recommender: Arc<OutfitRecommender>,
}

impl AppState {
    pub fn new(
        repositories: Repositories,
        recommendation_client: Arc<dyn RecommendationClient>,
        settings: AppSettings,
    ) -> Self {
        let outfits = Arc::new(OutfitService::new(repositories.outfits));
        let clothing = Arc::new(ClothingService::new(repositories.clothing.clone()));
        let recommender = OutfitRecommender::new(
            repositories.clothing,
            repositories.weather.clone(),
            recommendation_client,
            settings.recommendation_timeout,
        )
        .restrict_to_inventory(settings.restrict_recommendations_to_inventory);

        Self {
            settings,
            users: repositories.users,
            weather: repositories.weather,
            styles: repositories.styles,
            clothing,
            outfits,
            recommender: Arc::new(recommender),
        }
    }
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.settings.cors_allowed_origins);

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes())
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(cors)
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id)),
        )
}

/// API routes under /api
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/me", get(auth::me))
        .route("/recommend-outfit", get(recommendations::recommend_outfit))
        .route(
            "/clothing-items",
            get(clothing::list_mine).post(clothing::create),
        )
        .route("/clothing-items/me", get(clothing::list_mine))
        .route(
            "/clothing-items/:id",
            get(clothing::detail).delete(clothing::remove),
        )
        .route("/outfits", get(outfits::list).post(outfits::create))
        .route(
            "/outfits/:id/items/:item_id",
            delete(outfits::remove_item),
        )
        .route("/weather", get(weather::list))
        .route("/weather/:id", get(weather::detail))
        .route("/styles", get(styles::list))
        .route("/styles/:id", get(styles::detail))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .max_age(Duration::from_secs(3600))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
