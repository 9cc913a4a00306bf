use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Display;

use super::{Page, StyleId};

pub const STYLE_PAGE_SIZE: u32 = 30;

/// Named look such as "Business casual", with a suggested colour palette
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Style {
    pub id: StyleId,
    pub name: Option<String>,
    /// Free-form JSON as stored, usually a list of colour names or hex codes
    pub color_palette: Option<Value>,
    /// e.g. "wedding", "work", "party"
    pub event_type: Option<String>,
}

/// Raw query string of the style listing endpoint
#[derive(Debug, Default, Deserialize)]
pub struct StyleQuery {
    pub search: Option<String>,
    pub ordering: Option<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleSortField {
    Name,
    Id,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleOrdering {
    pub field: StyleSortField,
    pub descending: bool,
}

impl Default for StyleOrdering {
    fn default() -> Self {
        Self {
            field: StyleSortField::Name,
            descending: false,
        }
    }
}

impl StyleOrdering {
    /// Accepts `name`, `id`, `-name` or `-id`
    pub fn parse(raw: &str) -> Option<Self> {
        let (descending, field) = match raw.trim().strip_prefix('-') {
            Some(field) => (true, field),
            None => (false, raw.trim()),
        };
        let field = match field {
            "name" => StyleSortField::Name,
            "id" => StyleSortField::Id,
            _ => return None,
        };
        Some(Self { field, descending })
    }
}

impl Display for StyleOrdering {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let column = match self.field {
            StyleSortField::Name => "name",
            StyleSortField::Id => "id",
        };
        let direction = if self.descending { "DESC" } else { "ASC" };
        write!(f, "{} {} NULLS LAST", column, direction)
    }
}

/// Validated style listing criteria
#[derive(Debug, Clone, PartialEq)]
pub struct StyleFilter {
    /// Each term must appear in the name or the event type
    pub search_terms: Vec<String>,
    pub ordering: StyleOrdering,
    pub page: Page,
}

impl Default for StyleFilter {
    fn default() -> Self {
        Self {
            search_terms: vec![],
            ordering: StyleOrdering::default(),
            page: Page::from_query(None, None, STYLE_PAGE_SIZE),
        }
    }
}

impl From<StyleQuery> for StyleFilter {
    fn from(query: StyleQuery) -> Self {
        let search_terms = query
            .search
            .as_deref()
            .map(|search| {
                search
                    .split(|c: char| c.is_whitespace() || c == ',')
                    .filter(|term| !term.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Self {
            search_terms,
            ordering: query
                .ordering
                .as_deref()
                .and_then(StyleOrdering::parse)
                .unwrap_or_default(),
            page: Page::from_query(
                query.page.as_deref(),
                query.page_size.as_deref(),
                STYLE_PAGE_SIZE,
            ),
        }
    }
}
