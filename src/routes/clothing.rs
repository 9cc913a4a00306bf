use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::AuthUser,
    models::{ClothingItem, ClothingItemId, ClothingType, NewClothingItem, Photo, User},
    routes::AppState,
};

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i32,
    pub email: String,
    pub name: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PhotoResponse {
    pub id: i32,
    pub file: String,
    pub thumbnail: Option<String>,
    pub original_name: String,
}

impl PhotoResponse {
    fn new(photo: &Photo, media_base_url: &str) -> Self {
        Self {
            id: photo.id,
            file: media_url(media_base_url, &photo.file),
            thumbnail: photo
                .thumbnail
                .as_deref()
                .map(|path| media_url(media_base_url, path)),
            original_name: photo.original_name.clone(),
        }
    }
}

/// Clothing item with its type, photo URLs and owner resolved
#[derive(Debug, Serialize)]
pub struct ClothingItemResponse {
    pub id: ClothingItemId,
    #[serde(rename = "type")]
    pub clothing_type: ClothingType,
    pub last_used: Option<NaiveDate>,
    pub height: Option<f64>,
    pub width: Option<f64>,
    pub formality: Option<String>,
    pub main_color: Option<String>,
    pub secondary_colors: Vec<String>,
    pub photo: Option<PhotoResponse>,
    pub user: UserResponse,
}

impl ClothingItemResponse {
    pub fn new(item: ClothingItem, owner: &User, media_base_url: &str) -> Self {
        Self {
            photo: item
                .photo
                .as_ref()
                .map(|photo| PhotoResponse::new(photo, media_base_url)),
            id: item.id,
            clothing_type: item.clothing_type,
            last_used: item.last_used,
            height: item.height,
            width: item.width,
            formality: item.formality,
            main_color: item.main_color,
            secondary_colors: item.secondary_colors,
            user: UserResponse::from(owner),
        }
    }
}

/// Resolves a stored media path against the public media base URL
fn media_url(base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// GET /api/clothing-items/me
pub async fn list_mine(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> AppResult<Json<Vec<ClothingItemResponse>>> {
    let items = state.clothing.list(user.id).await?;
    let media = &state.settings.media_base_url;

    Ok(Json(
        items
            .into_iter()
            .map(|item| ClothingItemResponse::new(item, &user, media))
            .collect(),
    ))
}

/// GET /api/clothing-items/:id
pub async fn detail(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(item_id): Path<ClothingItemId>,
) -> AppResult<Json<ClothingItemResponse>> {
    let item = state.clothing.get(user.id, item_id).await?;
    Ok(Json(ClothingItemResponse::new(
        item,
        &user,
        &state.settings.media_base_url,
    )))
}

/// POST /api/clothing-items
pub async fn create(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Json(request): Json<NewClothingItem>,
) -> AppResult<(StatusCode, Json<ClothingItemResponse>)> {
    let item = state.clothing.create(user.id, request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ClothingItemResponse::new(
            item,
            &user,
            &state.settings.media_base_url,
        )),
    ))
}

/// DELETE /api/clothing-items/:id
pub async fn remove(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(item_id): Path<ClothingItemId>,
) -> AppResult<StatusCode> {
    state.clothing.delete(user.id, item_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
