use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    middleware::AuthUser,
    models::{Paginated, Style, StyleFilter, StyleId, StyleQuery},
    routes::AppState,
};

/// GET /api/styles
pub async fn list(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Query(query): Query<StyleQuery>,
) -> AppResult<Json<Paginated<Style>>> {
    let page = state.styles.list(StyleFilter::from(query)).await?;
    Ok(Json(page))
}

/// GET /api/styles/:id
pub async fn detail(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(id): Path<StyleId>,
) -> AppResult<Json<Style>> {
    state
        .styles
        .find(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Style {}", id)))
}
