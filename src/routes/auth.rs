use axum::Json;

use crate::{middleware::AuthUser, routes::clothing::UserResponse};

/// GET /api/auth/me
pub async fn me(AuthUser(user): AuthUser) -> Json<UserResponse> {
    Json(UserResponse::from(&user))
}
