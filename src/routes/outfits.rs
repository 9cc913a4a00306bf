use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::AuthUser,
    models::{ClothingItemId, NewOutfit, Outfit, OutfitDetails, OutfitId},
    routes::{
        clothing::{ClothingItemResponse, UserResponse},
        AppState,
    },
};

#[derive(Debug, Serialize)]
pub struct OutfitListItem {
    pub id: OutfitId,
    pub name: Option<String>,
    pub user: UserResponse,
    pub clothing_items: Vec<ClothingItemResponse>,
}

impl OutfitListItem {
    fn new(outfit: OutfitDetails, media_base_url: &str) -> Self {
        let user = outfit.user;
        Self {
            id: outfit.id,
            name: outfit.name,
            user: UserResponse::from(&user),
            clothing_items: outfit
                .clothing_items
                .into_iter()
                .map(|item| ClothingItemResponse::new(item, &user, media_base_url))
                .collect(),
        }
    }
}

/// POST /api/outfits
pub async fn create(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Json(request): Json<NewOutfit>,
) -> AppResult<(StatusCode, Json<Outfit>)> {
    let outfit = state.outfits.create(user.id, request).await?;
    Ok((StatusCode::CREATED, Json(outfit)))
}

/// GET /api/outfits
pub async fn list(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> AppResult<Json<Vec<OutfitListItem>>> {
    let outfits = state.outfits.list(user.id).await?;
    let media = &state.settings.media_base_url;

    Ok(Json(
        outfits
            .into_iter()
            .map(|outfit| OutfitListItem::new(outfit, media))
            .collect(),
    ))
}

/// DELETE /api/outfits/:id/items/:item_id
pub async fn remove_item(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path((outfit_id, item_id)): Path<(OutfitId, ClothingItemId)>,
) -> AppResult<Json<Value>> {
    let outfit_deleted = state.outfits.remove_item(user.id, outfit_id, item_id).await?;
    Ok(Json(json!({ "outfit_deleted": outfit_deleted })))
}
