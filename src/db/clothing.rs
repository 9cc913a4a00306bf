use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;

use super::outfits::delete_emptied;
use crate::{
    error::{AppError, AppResult},
    models::{ClothingItem, ClothingItemId, ClothingType, NewClothingItem, OutfitId, Photo, UserId},
};

/// Columns and joins shared by every query that resolves a full clothing item
pub(crate) const CLOTHING_ITEM_SELECT: &str = r#"
    SELECT ci.id, ci.user_id,
           ct.id AS type_id, ct.name AS type_name, ct.category AS type_category,
           p.id AS photo_id, p.file AS photo_file, p.thumbnail AS photo_thumbnail,
           p.original_name AS photo_original_name,
           ci.last_used, ci.height, ci.width, ci.formality, ci.main_color,
           ci.secondary_colors, ci.created_at, ci.updated_at
    FROM clothing_item ci
    JOIN clothing_type ct ON ct.id = ci.type_id
    LEFT JOIN photo p ON p.id = ci.photo_id
"#;

/// Flat row produced by [`CLOTHING_ITEM_SELECT`]
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ClothingItemRow {
    id: ClothingItemId,
    user_id: UserId,
    type_id: i32,
    type_name: Option<String>,
    type_category: Option<String>,
    photo_id: Option<i32>,
    photo_file: Option<String>,
    photo_thumbnail: Option<String>,
    photo_original_name: Option<String>,
    last_used: Option<NaiveDate>,
    height: Option<f64>,
    width: Option<f64>,
    formality: Option<String>,
    main_color: Option<String>,
    secondary_colors: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ClothingItemRow> for ClothingItem {
    fn from(row: ClothingItemRow) -> Self {
        let photo = match (row.photo_id, row.photo_file) {
            (Some(id), Some(file)) => Some(Photo {
                id,
                file,
                thumbnail: row.photo_thumbnail.filter(|t| !t.is_empty()),
                original_name: row.photo_original_name.unwrap_or_default(),
            }),
            _ => None,
        };

        ClothingItem {
            id: row.id,
            user_id: row.user_id,
            clothing_type: ClothingType {
                id: row.type_id,
                name: row.type_name,
                category: row.type_category,
            },
            photo,
            last_used: row.last_used,
            height: row.height,
            width: row.width,
            formality: row.formality,
            main_color: row.main_color,
            secondary_colors: row.secondary_colors,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Outfits touched by deleting a clothing item
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemRemoval {
    /// Outfits that lost a link to the item
    pub unlinked_outfits: Vec<OutfitId>,
    /// Those of `unlinked_outfits` that were left empty and deleted
    pub deleted_outfits: Vec<OutfitId>,
}

/// Read/write access to users' clothing inventories
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ClothingRepository: Send + Sync {
    /// All items owned by the user with type and photo resolved, ordered by id
    async fn list_for_user(&self, user_id: UserId) -> AppResult<Vec<ClothingItem>>;

    /// A single item, only if the user owns it
    async fn find_for_user(
        &self,
        user_id: UserId,
        item_id: ClothingItemId,
    ) -> AppResult<Option<ClothingItem>>;

    async fn create(&self, user_id: UserId, item: NewClothingItem) -> AppResult<ClothingItem>;

    /// Deletes the item, its outfit links and any outfit left without links,
    /// in one transaction. Returns `None` when the user owns no such item.
    async fn delete(
        &self,
        user_id: UserId,
        item_id: ClothingItemId,
    ) -> AppResult<Option<ItemRemoval>>;
}

pub struct PgClothingRepository {
    pool: PgPool,
}

impl PgClothingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ClothingRepository for PgClothingRepository {
    async fn list_for_user(&self, user_id: UserId) -> AppResult<Vec<ClothingItem>> {
        let sql = format!("{} WHERE ci.user_id = $1 ORDER BY ci.id", CLOTHING_ITEM_SELECT);
        let rows: Vec<ClothingItemRow> = sqlx::query_as(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(ClothingItem::from).collect())
    }

    async fn find_for_user(
        &self,
        user_id: UserId,
        item_id: ClothingItemId,
    ) -> AppResult<Option<ClothingItem>> {
        let sql = format!("{} WHERE ci.user_id = $1 AND ci.id = $2", CLOTHING_ITEM_SELECT);
        let row: Option<ClothingItemRow> = sqlx::query_as(&sql)
            .bind(user_id)
            .bind(item_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(ClothingItem::from))
    }

    async fn create(&self, user_id: UserId, item: NewClothingItem) -> AppResult<ClothingItem> {
        let type_exists: Option<(i32,)> = sqlx::query_as("SELECT id FROM clothing_type WHERE id = $1")
            .bind(item.type_id)
            .fetch_optional(&self.pool)
            .await?;

        if type_exists.is_none() {
            return Err(AppError::InvalidInput(format!(
                "Clothing type {} does not exist",
                item.type_id
            )));
        }

        let (id,): (ClothingItemId,) = sqlx::query_as(
            r#"
            INSERT INTO clothing_item
                (type_id, user_id, last_used, height, width, formality, main_color,
                 secondary_colors, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, now(), now())
            RETURNING id
            "#,
        )
        .bind(item.type_id)
        .bind(user_id)
        .bind(item.last_used)
        .bind(item.height)
        .bind(item.width)
        .bind(&item.formality)
        .bind(&item.main_color)
        .bind(&item.secondary_colors)
        .fetch_one(&self.pool)
        .await?;

        self.find_for_user(user_id, id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("Clothing item {} vanished after insert", id)))
    }

    async fn delete(
        &self,
        user_id: UserId,
        item_id: ClothingItemId,
    ) -> AppResult<Option<ItemRemoval>> {
        let mut tx = self.pool.begin().await?;

        let owned: Option<(ClothingItemId,)> = sqlx::query_as(
            "SELECT id FROM clothing_item WHERE id = $1 AND user_id = $2 FOR UPDATE",
        )
        .bind(item_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        if owned.is_none() {
            return Ok(None);
        }

        let unlinked: Vec<(OutfitId,)> =
            sqlx::query_as("DELETE FROM outfit_clothing WHERE clothing_id = $1 RETURNING outfit_id")
                .bind(item_id)
                .fetch_all(&mut *tx)
                .await?;
        let unlinked_outfits: Vec<OutfitId> = unlinked.into_iter().map(|(id,)| id).collect();

        sqlx::query("DELETE FROM clothing_item WHERE id = $1")
            .bind(item_id)
            .execute(&mut *tx)
            .await?;

        let deleted_outfits = delete_emptied(&mut *tx, &unlinked_outfits).await?;

        tx.commit().await?;

        Ok(Some(ItemRemoval {
            unlinked_outfits,
            deleted_outfits,
        }))
    }
}
