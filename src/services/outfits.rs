use std::{collections::HashSet, sync::Arc};

use crate::{
    db::{CreateOutcome, OutfitRepository, UnlinkOutcome},
    error::{AppError, AppResult},
    models::{ClothingItemId, NewOutfit, Outfit, OutfitDetails, OutfitId, UserId},
};

/// Outfit bookkeeping
///
/// Every outfit keeps at least one clothing link. The repository deletes an
/// outfit in the same transaction that removes its last link and reports it
/// as [`UnlinkOutcome::OutfitDeleted`].
pub struct OutfitService {
    outfits: Arc<dyn OutfitRepository>,
}

impl OutfitService {
    pub fn new(outfits: Arc<dyn OutfitRepository>) -> Self {
        Self { outfits }
    }

    pub async fn create(&self, user_id: UserId, request: NewOutfit) -> AppResult<Outfit> {
        let clothing_ids = normalize_clothing_ids(&request.clothing_ids)?;

        match self.outfits.create(user_id, request.name, clothing_ids).await? {
            CreateOutcome::Created(outfit) => Ok(outfit),
            CreateOutcome::MissingItems(missing) => {
                let missing: Vec<String> = missing.iter().map(|id| id.to_string()).collect();
                Err(AppError::InvalidInput(format!(
                    "Some clothing items do not exist or do not belong to the user: {}",
                    missing.join(", ")
                )))
            }
        }
    }

    pub async fn list(&self, user_id: UserId) -> AppResult<Vec<OutfitDetails>> {
        self.outfits.list_for_user(user_id).await
    }

    /// Removes one item from an outfit. Returns whether the outfit itself was deleted.
    pub async fn remove_item(
        &self,
        user_id: UserId,
        outfit_id: OutfitId,
        clothing_id: ClothingItemId,
    ) -> AppResult<bool> {
        match self.outfits.unlink_item(user_id, outfit_id, clothing_id).await? {
            UnlinkOutcome::OutfitNotFound => Err(AppError::NotFound(format!("Outfit {}", outfit_id))),
            UnlinkOutcome::ItemNotLinked => Err(AppError::NotFound(format!(
                "Clothing item {} is not part of outfit {}",
                clothing_id, outfit_id
            ))),
            UnlinkOutcome::Unlinked { .. } => Ok(false),
            UnlinkOutcome::OutfitDeleted => {
                tracing::info!(
                    user_id = user_id,
                    outfit_id = outfit_id,
                    "Deleted outfit left without clothing"
                );
                Ok(true)
            }
        }
    }
}

/// Validates requested ids and removes duplicates, keeping first occurrences
fn normalize_clothing_ids(raw: &[i64]) -> AppResult<Vec<ClothingItemId>> {
    if raw.is_empty() {
        return Err(AppError::InvalidInput(
            "clothing_ids must contain at least one item".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    let mut ids = Vec::with_capacity(raw.len());
    for &value in raw {
        let id = ClothingItemId::try_from(value)
            .ok()
            .filter(|id| *id >= 1)
            .ok_or_else(|| AppError::InvalidInput(format!("Invalid clothing id: {}", value)))?;
        if seen.insert(id) {
            ids.push(id);
        }
    }

    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::outfits::MockOutfitRepository;
    use mockall::predicate::eq;

    fn service(outfits: MockOutfitRepository) -> OutfitService {
        OutfitService::new(Arc::new(outfits))
    }

    #[test]
    fn test_normalize_deduplicates_in_order() {
        assert_eq!(normalize_clothing_ids(&[5, 9, 5, 12, 9]).unwrap(), vec![5, 9, 12]);
    }

    #[test]
    fn test_normalize_rejects_empty_and_non_positive() {
        assert!(normalize_clothing_ids(&[]).is_err());
        assert!(normalize_clothing_ids(&[1, 0]).is_err());
        assert!(normalize_clothing_ids(&[-3]).is_err());
        assert!(normalize_clothing_ids(&[i64::MAX]).is_err());
    }

    #[tokio::test]
    async fn test_create_rejects_foreign_items() {
        let mut outfits = MockOutfitRepository::new();
        outfits
            .expect_create()
            .with(eq(7), eq(Some("Outfit de invierno".to_string())), eq(vec![5, 9, 12]))
            .times(1)
            .returning(|_, _, _| Ok(CreateOutcome::MissingItems(vec![9])));

        let err = service(outfits)
            .create(
                7,
                NewOutfit {
                    name: Some("Outfit de invierno".to_string()),
                    clothing_ids: vec![5, 9, 12],
                },
            )
            .await
            .unwrap_err();

        match err {
            AppError::InvalidInput(msg) => assert!(msg.ends_with(": 9")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_passes_deduplicated_ids() {
        let mut outfits = MockOutfitRepository::new();
        outfits
            .expect_create()
            .with(eq(7), eq(Some("Verano".to_string())), eq(vec![10, 11]))
            .times(1)
            .returning(|user_id, name, clothing_ids| {
                Ok(CreateOutcome::Created(Outfit {
                    id: 4,
                    name,
                    user_id,
                    clothing_ids,
                }))
            });

        let outfit = service(outfits)
            .create(
                7,
                NewOutfit {
                    name: Some("Verano".to_string()),
                    clothing_ids: vec![10, 11, 10],
                },
            )
            .await
            .unwrap();

        assert_eq!(outfit.id, 4);
        assert_eq!(outfit.clothing_ids, vec![10, 11]);
    }

    #[tokio::test]
    async fn test_invalid_ids_never_reach_repository() {
        let mut outfits = MockOutfitRepository::new();
        outfits.expect_create().never();

        let err = service(outfits)
            .create(
                7,
                NewOutfit {
                    name: None,
                    clothing_ids: vec![],
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_removing_last_item_deletes_outfit() {
        let mut outfits = MockOutfitRepository::new();
        outfits
            .expect_unlink_item()
            .with(eq(1), eq(3), eq(8))
            .times(1)
            .returning(|_, _, _| Ok(UnlinkOutcome::OutfitDeleted));

        let deleted = service(outfits).remove_item(1, 3, 8).await.unwrap();
        assert!(deleted);
    }

    #[tokio::test]
    async fn test_removing_non_last_item_keeps_outfit() {
        let mut outfits = MockOutfitRepository::new();
        outfits
            .expect_unlink_item()
            .returning(|_, _, _| Ok(UnlinkOutcome::Unlinked { remaining: 2 }));

        let deleted = service(outfits).remove_item(1, 3, 8).await.unwrap();
        assert!(!deleted);
    }

    #[tokio::test]
    async fn test_failed_unlink_reports_error_without_follow_up_writes() {
        // Unlink and cascade commit together; there is nothing to follow up on
        let mut outfits = MockOutfitRepository::new();
        outfits
            .expect_unlink_item()
            .times(1)
            .returning(|_, _, _| Err(AppError::Database(sqlx::Error::PoolTimedOut)));
        outfits.expect_list_for_user().never();
        outfits.expect_create().never();

        let err = service(outfits).remove_item(1, 3, 8).await.unwrap_err();
        assert!(matches!(err, AppError::Database(sqlx::Error::PoolTimedOut)));
    }

    #[tokio::test]
    async fn test_remove_from_unknown_outfit_is_not_found() {
        let mut outfits = MockOutfitRepository::new();
        outfits
            .expect_unlink_item()
            .returning(|_, _, _| Ok(UnlinkOutcome::OutfitNotFound));

        let err = service(outfits).remove_item(1, 3, 8).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_remove_unlinked_item_is_not_found() {
        let mut outfits = MockOutfitRepository::new();
        outfits
            .expect_unlink_item()
            .returning(|_, _, _| Ok(UnlinkOutcome::ItemNotLinked));

        let err = service(outfits).remove_item(1, 3, 8).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
