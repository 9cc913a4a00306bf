use sqlx::{PgPool, Postgres, QueryBuilder};

use super::postgres::escape_like;
use crate::{
    error::AppResult,
    models::{Paginated, Weather, WeatherFilter, WeatherId},
};

const WEATHER_COLUMNS: &str = "id, date, temperature, feels_like, humidity, wind, conditions, \
     precipitation_prob, cloudiness, uv_index, created_at";

/// Read-only access to recorded weather
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait WeatherRepository: Send + Sync {
    /// The most recent record by date, if any exist
    async fn latest(&self) -> AppResult<Option<Weather>>;

    async fn find(&self, id: WeatherId) -> AppResult<Option<Weather>>;

    async fn list(&self, filter: WeatherFilter) -> AppResult<Paginated<Weather>>;
}

pub struct PgWeatherRepository {
    pool: PgPool,
}

impl PgWeatherRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Appends the WHERE clause for `filter` to `builder`
    fn push_conditions(builder: &mut QueryBuilder<'_, Postgres>, filter: &WeatherFilter) {
        builder.push(" WHERE TRUE");

        if let Some(date_from) = filter.date_from {
            builder.push(" AND date >= ").push_bind(date_from);
        }
        if let Some(date_to) = filter.date_to {
            builder.push(" AND date <= ").push_bind(date_to);
        }
        if let Some(condition) = &filter.condition {
            builder
                .push(" AND conditions ILIKE ")
                .push_bind(format!("%{}%", escape_like(condition)));
        }
        if let Some(min_temp) = filter.min_temp {
            builder.push(" AND temperature >= ").push_bind(min_temp);
        }
        if let Some(max_temp) = filter.max_temp {
            builder.push(" AND temperature <= ").push_bind(max_temp);
        }
    }
}

#[async_trait::async_trait]
impl WeatherRepository for PgWeatherRepository {
    async fn latest(&self) -> AppResult<Option<Weather>> {
        let sql = format!(
            "SELECT {} FROM weather ORDER BY date DESC NULLS LAST, id DESC LIMIT 1",
            WEATHER_COLUMNS
        );
        let weather = sqlx::query_as::<_, Weather>(&sql)
            .fetch_optional(&self.pool)
            .await?;

        Ok(weather)
    }

    async fn find(&self, id: WeatherId) -> AppResult<Option<Weather>> {
        let sql = format!("SELECT {} FROM weather WHERE id = $1", WEATHER_COLUMNS);
        let weather = sqlx::query_as::<_, Weather>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(weather)
    }

    async fn list(&self, filter: WeatherFilter) -> AppResult<Paginated<Weather>> {
        let mut count_query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM weather");
        Self::push_conditions(&mut count_query, &filter);
        let (count,): (i64,) = count_query.build_query_as::<(i64,)>().fetch_one(&self.pool).await?;

        let mut query = QueryBuilder::<Postgres>::new(format!("SELECT {} FROM weather", WEATHER_COLUMNS));
        Self::push_conditions(&mut query, &filter);
        // Ordering comes from a whitelist, never from raw input
        query
            .push(format!(" ORDER BY {}, id", filter.ordering))
            .push(" LIMIT ")
            .push_bind(i64::from(filter.page.size))
            .push(" OFFSET ")
            .push_bind(filter.page.offset());

        let results = query
            .build_query_as::<Weather>()
            .fetch_all(&self.pool)
            .await?;

        tracing::debug!(
            count = count,
            returned = results.len(),
            page = filter.page.number,
            "Weather listing fetched"
        );

        Ok(Paginated::new(count, filter.page, results))
    }
}
