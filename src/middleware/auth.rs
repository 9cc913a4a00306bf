//! Bearer-token authentication.
//!
//! Access tokens are issued by the account service as HS256 JWTs in the
//! SimpleJWT layout: `user_id` (number or numeric string), `token_type`,
//! `exp`, `iat`, `jti`. This service only validates them.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    error::AppError,
    models::{User, UserId},
    routes::AppState,
};

/// `user_id` claim as written by different issuers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserIdClaim {
    Number(i64),
    Text(String),
}

impl UserIdClaim {
    pub fn user_id(&self) -> Option<UserId> {
        match self {
            UserIdClaim::Number(id) => UserId::try_from(*id).ok(),
            UserIdClaim::Text(id) => id.trim().parse().ok(),
        }
    }
}

/// JWT claims of an access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: UserIdClaim,
    #[serde(default)]
    pub token_type: Option<String>,
    pub exp: i64,
    #[serde(default)]
    pub iat: Option<i64>,
    #[serde(default)]
    pub jti: Option<String>,
}

/// Validates signature, expiry and token type, returning the user id
pub fn validate_access_token(token: &str, secret: &str) -> Result<UserId, AppError> {
    let validation = Validation::new(Algorithm::HS256);
    let data = decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map_err(|e| {
            tracing::debug!(error = %e, "Rejected access token");
            AppError::Unauthorized("Invalid or expired token".to_string())
        })?;

    if let Some(token_type) = data.claims.token_type.as_deref() {
        if token_type != "access" {
            return Err(AppError::Unauthorized(
                "Token is not an access token".to_string(),
            ));
        }
    }

    data.claims.user_id.user_id().ok_or_else(|| {
        AppError::Unauthorized("Token contained no recognizable user identification".to_string())
    })
}

/// The authenticated, active user making the request
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".to_string()))?;

        let token = header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".to_string(),
            )
        })?;

        let user_id = validate_access_token(token.trim(), &state.settings.jwt_secret)?;

        let user = state
            .users
            .find_by_id(user_id)
            .await?
            .filter(|user| user.is_active)
            .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))?;

        Ok(AuthUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    const SECRET: &str = "test-secret-that-is-long-enough-for-hmac";

    fn sign(claims: serde_json::Value, secret: &str) -> String {
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn in_one_hour() -> i64 {
        chrono::Utc::now().timestamp() + 3600
    }

    #[test]
    fn test_string_user_id_is_accepted() {
        let token = sign(
            json!({ "token_type": "access", "user_id": "1", "exp": in_one_hour(), "jti": "abc" }),
            SECRET,
        );
        assert_eq!(validate_access_token(&token, SECRET).unwrap(), 1);
    }

    #[test]
    fn test_numeric_user_id_is_accepted() {
        let token = sign(json!({ "user_id": 42, "exp": in_one_hour() }), SECRET);
        assert_eq!(validate_access_token(&token, SECRET).unwrap(), 42);
    }

    #[test]
    fn test_refresh_token_is_rejected() {
        let token = sign(
            json!({ "token_type": "refresh", "user_id": "1", "exp": in_one_hour() }),
            SECRET,
        );
        assert!(matches!(
            validate_access_token(&token, SECRET),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        // Well past the default 60-second leeway
        let exp = chrono::Utc::now().timestamp() - 600;
        let token = sign(json!({ "user_id": 1, "exp": exp }), SECRET);
        assert!(validate_access_token(&token, SECRET).is_err());
    }

    #[test]
    fn test_foreign_secret_is_rejected() {
        let token = sign(json!({ "user_id": 1, "exp": in_one_hour() }), "another-secret");
        assert!(validate_access_token(&token, SECRET).is_err());
    }

    #[test]
    fn test_unparsable_user_id_is_rejected() {
        let token = sign(json!({ "user_id": "me", "exp": in_one_hour() }), SECRET);
        match validate_access_token(&token, SECRET) {
            Err(AppError::Unauthorized(msg)) => assert!(msg.contains("user identification")),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
