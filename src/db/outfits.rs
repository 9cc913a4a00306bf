use sqlx::{PgConnection, PgPool};
use std::collections::{HashMap, HashSet};

use super::clothing::{ClothingItemRow, CLOTHING_ITEM_SELECT};
use crate::{
    error::{AppError, AppResult},
    models::{ClothingItem, ClothingItemId, Outfit, OutfitDetails, OutfitId, User, UserId},
};

/// Result of inserting an outfit
#[derive(Debug, Clone, PartialEq)]
pub enum CreateOutcome {
    Created(Outfit),
    /// Requested ids the user does not own; nothing was written
    MissingItems(Vec<ClothingItemId>),
}

/// Result of removing one clothing link from an outfit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnlinkOutcome {
    /// The user owns no outfit with that id
    OutfitNotFound,
    /// The outfit exists but does not contain the item
    ItemNotLinked,
    /// The link was removed; `remaining` links are left on the outfit
    Unlinked { remaining: i64 },
    /// The last link was removed and the outfit deleted with it
    OutfitDeleted,
}

/// Outfit rows and their `outfit_clothing` join rows
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait OutfitRepository: Send + Sync {
    /// Checks ownership of every item, then inserts the outfit and its links,
    /// all in one transaction
    async fn create(
        &self,
        user_id: UserId,
        name: Option<String>,
        clothing_ids: Vec<ClothingItemId>,
    ) -> AppResult<CreateOutcome>;

    async fn list_for_user(&self, user_id: UserId) -> AppResult<Vec<OutfitDetails>>;

    /// Removes one link. An outfit losing its last link is deleted in the
    /// same transaction.
    async fn unlink_item(
        &self,
        user_id: UserId,
        outfit_id: OutfitId,
        clothing_id: ClothingItemId,
    ) -> AppResult<UnlinkOutcome>;
}

/// Deletes those of `outfit_ids` that have no links left, returning their ids.
///
/// Runs on the caller's connection so it commits together with the link
/// removal that emptied the outfits.
pub(crate) async fn delete_emptied(
    conn: &mut PgConnection,
    outfit_ids: &[OutfitId],
) -> Result<Vec<OutfitId>, sqlx::Error> {
    if outfit_ids.is_empty() {
        return Ok(vec![]);
    }

    let deleted: Vec<(OutfitId,)> = sqlx::query_as(DELETE_EMPTIED_SQL)
        .bind(outfit_ids)
        .fetch_all(conn)
        .await?;

    Ok(deleted.into_iter().map(|(id,)| id).collect())
}

const DELETE_EMPTIED_SQL: &str = r#"
    DELETE FROM outfit o
    WHERE o.id = ANY($1)
      AND NOT EXISTS (SELECT 1 FROM outfit_clothing oc WHERE oc.outfit_id = o.id)
    RETURNING o.id
"#;

#[derive(sqlx::FromRow)]
struct OutfitRow {
    id: OutfitId,
    name: Option<String>,
}

#[derive(sqlx::FromRow)]
struct OutfitItemRow {
    outfit_id: OutfitId,
    #[sqlx(flatten)]
    item: ClothingItemRow,
}

pub struct PgOutfitRepository {
    pool: PgPool,
}

impl PgOutfitRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl OutfitRepository for PgOutfitRepository {
    async fn create(
        &self,
        user_id: UserId,
        name: Option<String>,
        clothing_ids: Vec<ClothingItemId>,
    ) -> AppResult<CreateOutcome> {
        let mut tx = self.pool.begin().await?;

        // Share locks keep the items from being deleted before the links land
        let owned: HashSet<ClothingItemId> = sqlx::query_as::<_, (ClothingItemId,)>(
            "SELECT id FROM clothing_item WHERE user_id = $1 AND id = ANY($2) FOR SHARE",
        )
        .bind(user_id)
        .bind(&clothing_ids)
        .fetch_all(&mut *tx)
        .await?
        .into_iter()
        .map(|(id,)| id)
        .collect();

        let missing: Vec<ClothingItemId> = clothing_ids
            .iter()
            .copied()
            .filter(|id| !owned.contains(id))
            .collect();
        if !missing.is_empty() {
            tx.rollback().await?;
            return Ok(CreateOutcome::MissingItems(missing));
        }

        let (id,): (OutfitId,) =
            sqlx::query_as("INSERT INTO outfit (name, user_id) VALUES ($1, $2) RETURNING id")
                .bind(&name)
                .bind(user_id)
                .fetch_one(&mut *tx)
                .await?;

        sqlx::query(
            r#"
            INSERT INTO outfit_clothing (outfit_id, clothing_id)
            SELECT $1, clothing_id FROM UNNEST($2::int[]) AS t(clothing_id)
            "#,
        )
        .bind(id)
        .bind(&clothing_ids)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            outfit_id = id,
            user_id = user_id,
            items = clothing_ids.len(),
            "Outfit created"
        );

        Ok(CreateOutcome::Created(Outfit {
            id,
            name,
            user_id,
            clothing_ids,
        }))
    }

    async fn list_for_user(&self, user_id: UserId) -> AppResult<Vec<OutfitDetails>> {
        let user: User =
            sqlx::query_as("SELECT id, email, name, is_active FROM myapi_user WHERE id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("User {}", user_id)))?;

        let outfits: Vec<OutfitRow> =
            sqlx::query_as("SELECT id, name FROM outfit WHERE user_id = $1 ORDER BY id")
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?;

        let outfit_ids: Vec<OutfitId> = outfits.iter().map(|o| o.id).collect();
        let sql = format!(
            r#"
            SELECT oc.outfit_id, q.*
            FROM outfit_clothing oc
            JOIN ({}) q ON q.id = oc.clothing_id
            WHERE oc.outfit_id = ANY($1)
            ORDER BY oc.id
            "#,
            CLOTHING_ITEM_SELECT
        );
        let item_rows: Vec<OutfitItemRow> = sqlx::query_as(&sql)
            .bind(&outfit_ids)
            .fetch_all(&self.pool)
            .await?;

        let mut items_by_outfit: HashMap<OutfitId, Vec<ClothingItem>> = HashMap::new();
        for row in item_rows {
            items_by_outfit
                .entry(row.outfit_id)
                .or_default()
                .push(ClothingItem::from(row.item));
        }

        Ok(outfits
            .into_iter()
            .map(|outfit| OutfitDetails {
                clothing_items: items_by_outfit.remove(&outfit.id).unwrap_or_default(),
                id: outfit.id,
                name: outfit.name,
                user: user.clone(),
            })
            .collect())
    }

    async fn unlink_item(
        &self,
        user_id: UserId,
        outfit_id: OutfitId,
        clothing_id: ClothingItemId,
    ) -> AppResult<UnlinkOutcome> {
        let mut tx = self.pool.begin().await?;

        let outfit: Option<(OutfitId,)> =
            sqlx::query_as("SELECT id FROM outfit WHERE id = $1 AND user_id = $2 FOR UPDATE")
                .bind(outfit_id)
                .bind(user_id)
                .fetch_optional(&mut *tx)
                .await?;

        if outfit.is_none() {
            return Ok(UnlinkOutcome::OutfitNotFound);
        }

        let deleted = sqlx::query(
            "DELETE FROM outfit_clothing WHERE outfit_id = $1 AND clothing_id = $2",
        )
        .bind(outfit_id)
        .bind(clothing_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if deleted == 0 {
            return Ok(UnlinkOutcome::ItemNotLinked);
        }

        let (remaining,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM outfit_clothing WHERE outfit_id = $1")
                .bind(outfit_id)
                .fetch_one(&mut *tx)
                .await?;

        let outcome = if remaining == 0 {
            delete_emptied(&mut *tx, &[outfit_id]).await?;
            UnlinkOutcome::OutfitDeleted
        } else {
            UnlinkOutcome::Unlinked { remaining }
        };

        tx.commit().await?;

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delete_emptied_only_targets_linkless_outfits() {
        let sql = DELETE_EMPTIED_SQL.split_whitespace().collect::<Vec<_>>().join(" ");
        assert!(sql.starts_with("DELETE FROM outfit o WHERE o.id = ANY($1)"));
        assert!(sql.contains(
            "NOT EXISTS (SELECT 1 FROM outfit_clothing oc WHERE oc.outfit_id = o.id)"
        ));
        assert!(sql.ends_with("RETURNING o.id"));
    }
}
