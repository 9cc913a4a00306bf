use std::sync::Arc;

use crate::{
    db::ClothingRepository,
    error::{AppError, AppResult},
    models::{ClothingItem, ClothingItemId, NewClothingItem, OutfitId, UserId},
};

/// Clothing inventory operations scoped to the requesting user
pub struct ClothingService {
    clothing: Arc<dyn ClothingRepository>,
}

impl ClothingService {
    pub fn new(clothing: Arc<dyn ClothingRepository>) -> Self {
        Self { clothing }
    }

    pub async fn list(&self, user_id: UserId) -> AppResult<Vec<ClothingItem>> {
        self.clothing.list_for_user(user_id).await
    }

    pub async fn get(&self, user_id: UserId, item_id: ClothingItemId) -> AppResult<ClothingItem> {
        self.clothing
            .find_for_user(user_id, item_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Clothing item {}", item_id)))
    }

    pub async fn create(&self, user_id: UserId, item: NewClothingItem) -> AppResult<ClothingItem> {
        for (field, value) in [("height", item.height), ("width", item.width)] {
            if value.is_some_and(|v| !v.is_finite() || v < 0.0) {
                return Err(AppError::InvalidInput(format!(
                    "{} must be a non-negative number",
                    field
                )));
            }
        }

        let created = self.clothing.create(user_id, item).await?;
        tracing::info!(user_id = user_id, item_id = created.id, "Clothing item created");
        Ok(created)
    }

    /// Deletes an item. Returns the outfits that were deleted because the
    /// item was their last piece of clothing.
    pub async fn delete(&self, user_id: UserId, item_id: ClothingItemId) -> AppResult<Vec<OutfitId>> {
        let removal = self
            .clothing
            .delete(user_id, item_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Clothing item {}", item_id)))?;

        tracing::info!(
            user_id = user_id,
            item_id = item_id,
            outfits_affected = removal.unlinked_outfits.len(),
            outfits_deleted = ?removal.deleted_outfits,
            "Clothing item deleted"
        );

        Ok(removal.deleted_outfits)
    }
}
