use serde::{Deserialize, Serialize};

use super::{ClothingItem, ClothingItemId, OutfitId, User, UserId};

/// An outfit and the ids of its linked clothing items, in link order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outfit {
    pub id: OutfitId,
    pub name: Option<String>,
    pub user_id: UserId,
    pub clothing_ids: Vec<ClothingItemId>,
}

/// An outfit with its owner and clothing items resolved, for listings
#[derive(Debug, Clone)]
pub struct OutfitDetails {
    pub id: OutfitId,
    pub name: Option<String>,
    pub user: User,
    pub clothing_items: Vec<ClothingItem>,
}

/// Payload for creating an outfit
#[derive(Debug, Clone, Deserialize)]
pub struct NewOutfit {
    #[serde(default)]
    pub name: Option<String>,
    pub clothing_ids: Vec<i64>,
}
