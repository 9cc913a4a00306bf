use serde::Serialize;

use crate::models::{ClothingItem, ClothingItemId};

/// The view of a clothing item the model gets to see
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimplifiedItem<'a> {
    pub id: ClothingItemId,
    #[serde(rename = "type")]
    pub type_name: Option<&'a str>,
    pub main_color: Option<&'a str>,
    pub formality: Option<&'a str>,
    pub category: Option<&'a str>,
}

impl<'a> From<&'a ClothingItem> for SimplifiedItem<'a> {
    fn from(item: &'a ClothingItem) -> Self {
        Self {
            id: item.id,
            type_name: item.type_name(),
            main_color: item.main_color.as_deref(),
            formality: item.formality.as_deref(),
            category: item.category(),
        }
    }
}

/// Builds the outfit instruction sent to the generative model.
///
/// The output depends only on the arguments. The closing instructions
/// (one item per category, bare JSON array of ids) are what
/// [`super::parse_recommended_ids`] relies on.
pub fn build_prompt(weather: &str, items: &[ClothingItem]) -> String {
    let simplified: Vec<SimplifiedItem<'_>> = items.iter().map(SimplifiedItem::from).collect();
    // Serializing plain structs of strings and integers cannot fail
    let items_json = serde_json::to_string(&simplified).unwrap_or_else(|_| "[]".to_string());

    format!(
        "You are a fashion assistant. Based on the following weather info:\n\
         {weather}\n\
         and the following clothing items:\n\
         {items_json}\n\
         Recommend an outfit. Consider colors (they should match), formality, and weather.\n\
         Return ONLY ONE OF EACH CATEGORY (e.g. one TOP, one BOTTOM, etc.) if available.\n\
         Return ONLY a JSON array with the IDs of the recommended clothing items, with no other text.\n\
         Example: [1, 3]\n"
    )
}
