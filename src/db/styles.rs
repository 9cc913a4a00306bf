use sqlx::{PgPool, Postgres, QueryBuilder};

use super::postgres::escape_like;
use crate::{
    error::AppResult,
    models::{Paginated, Style, StyleFilter, StyleId},
};

const STYLE_COLUMNS: &str = "id, name, color_palette, event_type";

/// Read-only access to the style catalogue
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait StyleRepository: Send + Sync {
    async fn find(&self, id: StyleId) -> AppResult<Option<Style>>;

    async fn list(&self, filter: StyleFilter) -> AppResult<Paginated<Style>>;
}

pub struct PgStyleRepository {
    pool: PgPool,
}

impl PgStyleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn push_conditions(builder: &mut QueryBuilder<'_, Postgres>, filter: &StyleFilter) {
        builder.push(" WHERE TRUE");

        for term in &filter.search_terms {
            let pattern = format!("%{}%", escape_like(term));
            builder
                .push(" AND (name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR event_type ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
    }
}

#[async_trait::async_trait]
impl StyleRepository for PgStyleRepository {
    async fn find(&self, id: StyleId) -> AppResult<Option<Style>> {
        let sql = format!("SELECT {} FROM style WHERE id = $1", STYLE_COLUMNS);
        let style = sqlx::query_as::<_, Style>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(style)
    }

    async fn list(&self, filter: StyleFilter) -> AppResult<Paginated<Style>> {
        let mut count_query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM style");
        Self::push_conditions(&mut count_query, &filter);
        let (count,): (i64,) = count_query.build_query_as::<(i64,)>().fetch_one(&self.pool).await?;

        let mut query = QueryBuilder::<Postgres>::new(format!("SELECT {} FROM style", STYLE_COLUMNS));
        Self::push_conditions(&mut query, &filter);
        query
            .push(format!(" ORDER BY {}, id", filter.ordering))
            .push(" LIMIT ")
            .push_bind(i64::from(filter.page.size))
            .push(" OFFSET ")
            .push_bind(filter.page.offset());

        let results = query
            .build_query_as::<Style>()
            .fetch_all(&self.pool)
            .await?;

        tracing::debug!(
            count = count,
            returned = results.len(),
            terms = filter.search_terms.len(),
            "Style listing fetched"
        );

        Ok(Paginated::new(count, filter.page, results))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_search_term_must_match() {
        let filter = StyleFilter {
            search_terms: vec!["casual".to_string(), "work".to_string()],
            ..Default::default()
        };

        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM style");
        PgStyleRepository::push_conditions(&mut builder, &filter);

        assert_eq!(
            builder.sql(),
            "SELECT COUNT(*) FROM style WHERE TRUE \
             AND (name ILIKE $1 OR event_type ILIKE $2) \
             AND (name ILIKE $3 OR event_type ILIKE $4)"
        );
    }

    #[test]
    fn test_no_terms_means_no_filter() {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM style");
        PgStyleRepository::push_conditions(&mut builder, &StyleFilter::default());
        assert_eq!(builder.sql(), "SELECT COUNT(*) FROM style WHERE TRUE");
    }
}
