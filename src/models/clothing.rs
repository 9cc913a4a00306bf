use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{ClothingItemId, UserId};

/// Shared reference data describing what kind of garment an item is
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClothingType {
    pub id: i32,
    /// e.g. "T-shirt", "Jeans", "Jacket"
    pub name: Option<String>,
    /// e.g. "Top", "Bottom", "Accessory"
    pub category: Option<String>,
}

/// Stored photo attached to a clothing item
///
/// `file` and `thumbnail` are storage paths relative to the media root.
#[derive(Debug, Clone, PartialEq)]
pub struct Photo {
    pub id: i32,
    pub file: String,
    pub thumbnail: Option<String>,
    pub original_name: String,
}

/// A single garment owned by one user
#[derive(Debug, Clone, PartialEq)]
pub struct ClothingItem {
    pub id: ClothingItemId,
    pub user_id: UserId,
    pub clothing_type: ClothingType,
    pub photo: Option<Photo>,
    pub last_used: Option<NaiveDate>,
    pub height: Option<f64>,
    pub width: Option<f64>,
    pub formality: Option<String>,
    pub main_color: Option<String>,
    pub secondary_colors: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ClothingItem {
    pub fn type_name(&self) -> Option<&str> {
        self.clothing_type.name.as_deref()
    }

    pub fn category(&self) -> Option<&str> {
        self.clothing_type.category.as_deref()
    }
}

/// Payload for creating a clothing item
#[derive(Debug, Clone, Deserialize)]
pub struct NewClothingItem {
    pub type_id: i32,
    #[serde(default)]
    pub last_used: Option<NaiveDate>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub formality: Option<String>,
    #[serde(default)]
    pub main_color: Option<String>,
    #[serde(default)]
    pub secondary_colors: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clothing_item_optional_fields() {
        let item: NewClothingItem = serde_json::from_str(r#"{"type_id": 3}"#).unwrap();
        assert_eq!(item.type_id, 3);
        assert!(item.secondary_colors.is_empty());
        assert_eq!(item.main_color, None);
    }

    #[test]
    fn test_new_clothing_item_full_payload() {
        let json = r#"{
            "type_id": 1,
            "last_used": "2025-10-02",
            "height": 1.0,
            "width": 2.0,
            "formality": "formal",
            "main_color": "blue",
            "secondary_colors": ["white", "verde"]
        }"#;

        let item: NewClothingItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.last_used, NaiveDate::from_ymd_opt(2025, 10, 2));
        assert_eq!(item.formality.as_deref(), Some("formal"));
        assert_eq!(item.secondary_colors, vec!["white", "verde"]);
    }
}
