use crate::error::AppResult;

/// Generative text backend used to pick outfits
///
/// Implementations send one prompt and return the model's raw text. The
/// output is not trusted: callers parse it with
/// [`super::parse_recommended_ids`]. Transport failures must be reported as
/// [`crate::error::AppError::RecommendationService`], and implementations
/// must not retry.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RecommendationClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> AppResult<String>;

    /// Provider name for logging
    fn name(&self) -> &'static str;
}
