use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    middleware::AuthUser,
    models::{Paginated, Weather, WeatherFilter, WeatherId, WeatherQuery},
    routes::AppState,
};

/// GET /api/weather
pub async fn list(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Query(query): Query<WeatherQuery>,
) -> AppResult<Json<Paginated<Weather>>> {
    let page = state.weather.list(WeatherFilter::from(query)).await?;
    Ok(Json(page))
}

/// GET /api/weather/:id
pub async fn detail(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(id): Path<WeatherId>,
) -> AppResult<Json<Weather>> {
    state
        .weather
        .find(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Weather {}", id)))
}
