use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::services::recommendation::CoverageReport;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("You need at least one top and one bottom.")]
    Coverage(CoverageReport),

    #[error("Recommendation service error: {0}")]
    RecommendationService(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AppError::RecommendationService(format!("request timed out: {}", err))
        } else {
            AppError::RecommendationService(err.to_string())
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::Coverage(report) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "detail": self.to_string(),
                    "debug": {
                        "total_items": report.total_items,
                        "has_top": report.has_top,
                        "has_bottom": report.has_bottom,
                    }
                }),
            ),
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, json!({ "detail": msg })),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, json!({ "detail": msg })),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "detail": msg })),
            AppError::RecommendationService(_) => {
                tracing::error!(error = %self, "Outfit recommendation failed");
                (
                    StatusCode::BAD_GATEWAY,
                    json!({ "detail": "Recommendation service unavailable" }),
                )
            }
            AppError::Database(_) | AppError::Internal(_) => {
                tracing::error!(error = %self, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "detail": "Internal server error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_coverage_error_carries_debug_counts() {
        let err = AppError::Coverage(CoverageReport {
            total_items: 1,
            has_top: true,
            has_bottom: false,
        });

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["detail"], "You need at least one top and one bottom.");
        assert_eq!(body["debug"]["total_items"], 1);
        assert_eq!(body["debug"]["has_top"], true);
        assert_eq!(body["debug"]["has_bottom"], false);
    }

    #[tokio::test]
    async fn test_recommendation_service_error_is_bad_gateway() {
        let response = AppError::RecommendationService("connection reset".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        // Upstream details stay in the logs
        let body = body_json(response).await;
        assert_eq!(body["detail"], "Recommendation service unavailable");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::Unauthorized("x".into()).into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::NotFound("x".into()).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::InvalidInput("x".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Internal("x".into()).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
