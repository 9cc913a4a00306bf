//! Outfit recommendation pipeline
//!
//! Collects the user's inventory, refuses early when it lacks a top or a
//! bottom, describes the latest weather, asks the generative model for a
//! combination, and parses the answer into clothing ids.

use std::{collections::HashSet, sync::Arc, time::Duration};

use crate::{
    db::{ClothingRepository, WeatherRepository},
    error::{AppError, AppResult},
    models::{ClothingItemId, UserId, FALLBACK_WEATHER},
};

pub mod client;
pub mod coverage;
pub mod gemini;
pub mod parser;
pub mod prompt;

pub use client::RecommendationClient;
pub use coverage::{CoverageReport, CoverageRules, ItemMatcher};
pub use gemini::GeminiClient;
pub use parser::parse_recommended_ids;
pub use prompt::build_prompt;

pub struct OutfitRecommender {
    clothing: Arc<dyn ClothingRepository>,
    weather: Arc<dyn WeatherRepository>,
    client: Arc<dyn RecommendationClient>,
    rules: CoverageRules,
    timeout: Duration,
    restrict_to_inventory: bool,
}

impl OutfitRecommender {
    pub fn new(
        clothing: Arc<dyn ClothingRepository>,
        weather: Arc<dyn WeatherRepository>,
        client: Arc<dyn RecommendationClient>,
        timeout: Duration,
    ) -> Self {
        Self {
            clothing,
            weather,
            client,
            rules: CoverageRules::default(),
            timeout,
            restrict_to_inventory: false,
        }
    }

    pub fn with_rules(mut self, rules: CoverageRules) -> Self {
        self.rules = rules;
        self
    }

    /// Drop ids the model returned that are not in the user's inventory
    pub fn restrict_to_inventory(mut self, restrict: bool) -> Self {
        self.restrict_to_inventory = restrict;
        self
    }

    /// Description of the most recent weather, or [`FALLBACK_WEATHER`]
    pub async fn current_weather(&self) -> AppResult<String> {
        Ok(self
            .weather
            .latest()
            .await?
            .map(|weather| weather.describe())
            .unwrap_or_else(|| FALLBACK_WEATHER.to_string()))
    }

    /// Runs the pipeline for one user
    ///
    /// Fails with [`AppError::Coverage`] before contacting the model when the
    /// inventory lacks a top or a bottom. An unparsable model answer yields
    /// an empty list.
    pub async fn recommend(&self, user_id: UserId) -> AppResult<Vec<ClothingItemId>> {
        let items = self.clothing.list_for_user(user_id).await?;

        let report = self.rules.check(&items);
        tracing::debug!(
            user_id = user_id,
            total_items = report.total_items,
            has_top = report.has_top,
            has_bottom = report.has_bottom,
            "Inventory coverage checked"
        );
        if !report.is_covered() {
            return Err(AppError::Coverage(report));
        }

        let weather = self.current_weather().await?;
        let prompt = build_prompt(&weather, &items);

        let raw = tokio::time::timeout(self.timeout, self.client.complete(&prompt))
            .await
            .map_err(|_| {
                AppError::RecommendationService(format!(
                    "{} did not answer within {:?}",
                    self.client.name(),
                    self.timeout
                ))
            })??;

        let mut ids = parse_recommended_ids(&raw);

        if self.restrict_to_inventory {
            let owned: HashSet<ClothingItemId> = items.iter().map(|item| item.id).collect();
            let before = ids.len();
            ids.retain(|id| owned.contains(id));
            if ids.len() != before {
                tracing::warn!(
                    user_id = user_id,
                    dropped = before - ids.len(),
                    "Model recommended items outside the user's inventory"
                );
            }
        }

        tracing::info!(
            user_id = user_id,
            weather = %weather,
            provider = self.client.name(),
            recommended = ids.len(),
            "Outfit recommendation completed"
        );

        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::clothing::MockClothingRepository;
    use crate::db::weather::MockWeatherRepository;
    use crate::models::Weather;
    use client::MockRecommendationClient;
    use coverage::tests::item;
    use tokio_test::assert_err;

    fn wardrobe() -> Vec<crate::models::ClothingItem> {
        vec![item(1, "T-shirt", "Top"), item(2, "Jeans", "Bottom")]
    }

    fn clothing_returning(items: Vec<crate::models::ClothingItem>) -> MockClothingRepository {
        let mut clothing = MockClothingRepository::new();
        clothing
            .expect_list_for_user()
            .returning(move |_| Ok(items.clone()));
        clothing
    }

    fn no_weather() -> MockWeatherRepository {
        let mut weather = MockWeatherRepository::new();
        weather.expect_latest().returning(|| Ok(None));
        weather
    }

    fn answering(text: &'static str) -> MockRecommendationClient {
        let mut client = MockRecommendationClient::new();
        client
            .expect_complete()
            .times(1)
            .returning(move |_| Ok(text.to_string()));
        client.expect_name().return_const("mock");
        client
    }

    fn recommender(
        clothing: MockClothingRepository,
        weather: MockWeatherRepository,
        client: MockRecommendationClient,
    ) -> OutfitRecommender {
        OutfitRecommender::new(
            Arc::new(clothing),
            Arc::new(weather),
            Arc::new(client),
            Duration::from_secs(5),
        )
    }

    #[tokio::test]
    async fn test_missing_bottom_never_calls_model() {
        let mut client = MockRecommendationClient::new();
        client.expect_complete().never();

        let mut weather = MockWeatherRepository::new();
        weather.expect_latest().never();

        let recommender = recommender(
            clothing_returning(vec![item(1, "Jacket", "Top")]),
            weather,
            client,
        );

        match recommender.recommend(1).await {
            Err(AppError::Coverage(report)) => {
                assert_eq!(report.total_items, 1);
                assert!(report.has_top);
                assert!(!report.has_bottom);
            }
            other => panic!("expected coverage error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_top_never_calls_model() {
        let mut client = MockRecommendationClient::new();
        client.expect_complete().never();

        let recommender = recommender(
            clothing_returning(vec![item(2, "Cargo Pants", "Bottom")]),
            no_weather(),
            client,
        );

        match recommender.recommend(1).await {
            Err(AppError::Coverage(report)) => {
                assert!(!report.has_top);
                assert!(report.has_bottom);
            }
            other => panic!("expected coverage error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_inventory_fails_coverage() {
        let mut client = MockRecommendationClient::new();
        client.expect_complete().never();

        let recommender = recommender(clothing_returning(vec![]), no_weather(), client);
        let result = recommender.recommend(1).await;
        assert!(matches!(
            result,
            Err(AppError::Coverage(CoverageReport {
                total_items: 0,
                has_top: false,
                has_bottom: false
            }))
        ));
    }

    #[tokio::test]
    async fn test_fallback_weather_reaches_prompt() {
        let mut client = MockRecommendationClient::new();
        client
            .expect_complete()
            .withf(|prompt: &str| {
                prompt.contains(FALLBACK_WEATHER)
                    && prompt.contains(r#""type":"T-shirt""#)
                    && prompt.contains(r#""type":"Jeans""#)
            })
            .times(1)
            .returning(|_| Ok("[1, 2]".to_string()));
        client.expect_name().return_const("mock");

        let recommender = recommender(clothing_returning(wardrobe()), no_weather(), client);
        assert_eq!(recommender.recommend(1).await.unwrap(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_latest_weather_reaches_prompt() {
        let mut weather = MockWeatherRepository::new();
        weather.expect_latest().returning(|| {
            Ok(Some(Weather {
                id: 9,
                date: chrono::NaiveDate::from_ymd_opt(2025, 10, 11),
                temperature: Some(48.5),
                feels_like: None,
                humidity: None,
                wind: None,
                conditions: Some("Light rain".to_string()),
                precipitation_prob: Some(0.8),
                cloudiness: None,
                uv_index: None,
                created_at: chrono::Utc::now(),
            }))
        });

        let mut client = MockRecommendationClient::new();
        client
            .expect_complete()
            .withf(|prompt: &str| prompt.contains("Light rain, 48.5°F") && !prompt.contains(FALLBACK_WEATHER))
            .times(1)
            .returning(|_| Ok("[2]".to_string()));
        client.expect_name().return_const("mock");

        let recommender = recommender(clothing_returning(wardrobe()), weather, client);
        assert_eq!(recommender.recommend(1).await.unwrap(), vec![2]);
    }

    #[tokio::test]
    async fn test_malformed_answer_is_empty_recommendation() {
        let recommender = recommender(
            clothing_returning(wardrobe()),
            no_weather(),
            answering("I suggest the blue T-shirt."),
        );
        assert!(recommender.recommend(1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_foreign_ids_returned_verbatim_by_default() {
        let recommender = recommender(clothing_returning(wardrobe()), no_weather(), answering("[1, 42]"));
        assert_eq!(recommender.recommend(1).await.unwrap(), vec![1, 42]);
    }

    #[tokio::test]
    async fn test_foreign_ids_dropped_when_restricted() {
        let recommender = recommender(clothing_returning(wardrobe()), no_weather(), answering("[1, 42]"))
            .restrict_to_inventory(true);
        assert_eq!(recommender.recommend(1).await.unwrap(), vec![1]);
    }

    #[tokio::test]
    async fn test_client_failure_propagates() {
        let mut client = MockRecommendationClient::new();
        client
            .expect_complete()
            .times(1)
            .returning(|_| Err(AppError::RecommendationService("connection refused".to_string())));
        client.expect_name().return_const("mock");

        let recommender = recommender(clothing_returning(wardrobe()), no_weather(), client);
        let err = assert_err!(recommender.recommend(1).await);
        assert!(matches!(err, AppError::RecommendationService(_)));
    }

    struct StalledClient;

    #[async_trait::async_trait]
    impl RecommendationClient for StalledClient {
        async fn complete(&self, _prompt: &str) -> AppResult<String> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok("[1, 2]".to_string())
        }

        fn name(&self) -> &'static str {
            "stalled"
        }
    }

    #[tokio::test]
    async fn test_stalled_client_is_bounded_by_timeout() {
        let recommender = OutfitRecommender::new(
            Arc::new(clothing_returning(wardrobe())),
            Arc::new(no_weather()),
            Arc::new(StalledClient),
            Duration::from_millis(50),
        );

        let err = recommender.recommend(1).await.unwrap_err();
        match err {
            AppError::RecommendationService(msg) => assert!(msg.contains("stalled")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_custom_rules_are_used() {
        let rules = CoverageRules::new(
            vec![ItemMatcher::type_name("camisa")],
            vec![ItemMatcher::type_name("falda")],
        );
        let recommender = recommender(
            clothing_returning(vec![item(1, "Camisa", "Superior"), item(2, "Falda", "Inferior")]),
            no_weather(),
            answering("[1, 2]"),
        )
        .with_rules(rules);

        assert_eq!(recommender.recommend(1).await.unwrap(), vec![1, 2]);
    }
}
