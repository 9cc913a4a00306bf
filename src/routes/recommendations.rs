use axum::{extract::State, Extension, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::{AuthUser, RequestId},
    models::ClothingItemId,
    routes::AppState,
};

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub recommended_ids: Vec<ClothingItemId>,
}

/// Handler for the outfit recommendation endpoint
pub async fn recommend_outfit(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    AuthUser(user): AuthUser,
) -> AppResult<Json<RecommendationResponse>> {
    tracing::info!(
        request_id = %request_id,
        user_id = user.id,
        "Processing outfit recommendation request"
    );

    let recommended_ids = state.recommender.recommend(user.id).await?;

    Ok(Json(RecommendationResponse { recommended_ids }))
}
