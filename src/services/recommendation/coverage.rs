use serde::Serialize;

use crate::models::ClothingItem;

/// A single test that classifies a clothing item into a slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemMatcher {
    /// Type category equals the value, ignoring case
    CategoryEquals(String),
    /// Type name contains the value, ignoring case
    TypeNameContains(String),
}

impl ItemMatcher {
    pub fn category(value: &str) -> Self {
        Self::CategoryEquals(value.to_lowercase())
    }

    pub fn type_name(value: &str) -> Self {
        Self::TypeNameContains(value.to_lowercase())
    }

    pub fn matches(&self, item: &ClothingItem) -> bool {
        match self {
            Self::CategoryEquals(expected) => item
                .category()
                .is_some_and(|category| category.to_lowercase() == *expected),
            Self::TypeNameContains(needle) => item
                .type_name()
                .is_some_and(|name| name.to_lowercase().contains(needle.as_str())),
        }
    }
}

/// Predicates deciding what counts as a top and what counts as a bottom
///
/// An item belongs to a slot when any of the slot's matchers accept it.
#[derive(Debug, Clone)]
pub struct CoverageRules {
    top: Vec<ItemMatcher>,
    bottom: Vec<ItemMatcher>,
}

impl Default for CoverageRules {
    fn default() -> Self {
        Self {
            top: vec![
                ItemMatcher::category("top"),
                ItemMatcher::type_name("shirt"),
                ItemMatcher::type_name("t-shirt"),
            ],
            bottom: vec![
                ItemMatcher::category("bottom"),
                ItemMatcher::type_name("pants"),
                ItemMatcher::type_name("jeans"),
            ],
        }
    }
}

impl CoverageRules {
    pub fn new(top: Vec<ItemMatcher>, bottom: Vec<ItemMatcher>) -> Self {
        Self { top, bottom }
    }

    pub fn with_top(mut self, matcher: ItemMatcher) -> Self {
        self.top.push(matcher);
        self
    }

    pub fn with_bottom(mut self, matcher: ItemMatcher) -> Self {
        self.bottom.push(matcher);
        self
    }

    pub fn is_top(&self, item: &ClothingItem) -> bool {
        self.top.iter().any(|m| m.matches(item))
    }

    pub fn is_bottom(&self, item: &ClothingItem) -> bool {
        self.bottom.iter().any(|m| m.matches(item))
    }

    /// Checks an entire inventory for top and bottom coverage
    pub fn check(&self, items: &[ClothingItem]) -> CoverageReport {
        CoverageReport {
            total_items: items.len(),
            has_top: items.iter().any(|item| self.is_top(item)),
            has_bottom: items.iter().any(|item| self.is_bottom(item)),
        }
    }
}

/// Outcome of a coverage check, reported back to the client on failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CoverageReport {
    pub total_items: usize,
    pub has_top: bool,
    pub has_bottom: bool,
}

impl CoverageReport {
    pub fn is_covered(&self) -> bool {
        self.has_top && self.has_bottom
    }
}
