use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

use super::{Page, WeatherId};

/// Substituted for the weather description when no record exists
pub const FALLBACK_WEATHER: &str = "Sunny, 75°F";

pub const WEATHER_PAGE_SIZE: u32 = 20;

/// A recorded weather observation. Rows are appended by an external ingester.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Weather {
    pub id: WeatherId,
    pub date: Option<NaiveDate>,
    pub temperature: Option<f64>,
    pub feels_like: Option<f64>,
    pub humidity: Option<f64>,
    pub wind: Option<f64>,
    pub conditions: Option<String>,
    pub precipitation_prob: Option<f64>,
    pub cloudiness: Option<i32>,
    pub uv_index: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl Weather {
    /// Short description used in recommendation prompts, e.g. "Rainy, 54.5°F"
    pub fn describe(&self) -> String {
        let conditions = self.conditions.as_deref().unwrap_or("Unknown conditions");
        match self.temperature {
            Some(temperature) => format!("{}, {}°F", conditions, temperature),
            None => conditions.to_string(),
        }
    }
}

/// Raw query string of the weather listing endpoint
///
/// Everything is accepted as text so malformed values can be ignored
/// instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct WeatherQuery {
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub condition: Option<String>,
    pub min_temp: Option<String>,
    pub max_temp: Option<String>,
    pub ordering: Option<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherSortField {
    Date,
    Temperature,
    FeelsLike,
    Humidity,
    Wind,
    Cloudiness,
    UvIndex,
    CreatedAt,
}

impl WeatherSortField {
    fn parse(field: &str) -> Option<Self> {
        match field {
            "date" => Some(Self::Date),
            "temperature" => Some(Self::Temperature),
            "feels_like" => Some(Self::FeelsLike),
            "humidity" => Some(Self::Humidity),
            "wind" => Some(Self::Wind),
            "cloudiness" => Some(Self::Cloudiness),
            "uv_index" => Some(Self::UvIndex),
            "created_at" => Some(Self::CreatedAt),
            _ => None,
        }
    }

    pub fn column(&self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Temperature => "temperature",
            Self::FeelsLike => "feels_like",
            Self::Humidity => "humidity",
            Self::Wind => "wind",
            Self::Cloudiness => "cloudiness",
            Self::UvIndex => "uv_index",
            Self::CreatedAt => "created_at",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeatherOrdering {
    pub field: WeatherSortField,
    pub descending: bool,
}

impl Default for WeatherOrdering {
    fn default() -> Self {
        Self {
            field: WeatherSortField::Date,
            descending: true,
        }
    }
}

impl WeatherOrdering {
    /// Parses `temperature` or `-date` style orderings. Unknown fields yield `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let (descending, field) = match raw.strip_prefix('-') {
            Some(field) => (true, field),
            None => (false, raw),
        };
        WeatherSortField::parse(field).map(|field| Self { field, descending })
    }
}

impl Display for WeatherOrdering {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let direction = if self.descending { "DESC" } else { "ASC" };
        write!(f, "{} {} NULLS LAST", self.field.column(), direction)
    }
}

/// Validated weather listing criteria
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherFilter {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub condition: Option<String>,
    pub min_temp: Option<f64>,
    pub max_temp: Option<f64>,
    pub ordering: WeatherOrdering,
    pub page: Page,
}

impl Default for WeatherFilter {
    fn default() -> Self {
        Self {
            date_from: None,
            date_to: None,
            condition: None,
            min_temp: None,
            max_temp: None,
            ordering: WeatherOrdering::default(),
            page: Page::from_query(None, None, WEATHER_PAGE_SIZE),
        }
    }
}

impl From<WeatherQuery> for WeatherFilter {
    fn from(query: WeatherQuery) -> Self {
        let parse_date = |raw: Option<String>| {
            raw.and_then(|d| NaiveDate::parse_from_str(d.trim(), "%Y-%m-%d").ok())
        };
        let parse_temp = |raw: Option<String>| raw.and_then(|t| t.trim().parse::<f64>().ok());

        let page = Page::from_query(
            query.page.as_deref(),
            query.page_size.as_deref(),
            WEATHER_PAGE_SIZE,
        );

        Self {
            date_from: parse_date(query.date_from),
            date_to: parse_date(query.date_to),
            condition: query.condition.filter(|c| !c.trim().is_empty()),
            min_temp: parse_temp(query.min_temp),
            max_temp: parse_temp(query.max_temp),
            ordering: query
                .ordering
                .as_deref()
                .and_then(WeatherOrdering::parse)
                .unwrap_or_default(),
            page,
        }
    }
}
