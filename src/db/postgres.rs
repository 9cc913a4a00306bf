use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;

/// Opens the pool shared by all repositories.
///
/// The schema is owned by the account service; nothing is migrated here.
pub async fn create_pool(database_url: &str, max_connections: u32) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await?;

    tracing::debug!(max_connections, "Database pool ready");
    Ok(pool)
}

/// Escapes LIKE wildcards so user input only matches literally
pub(crate) fn escape_like(raw: &str) -> String {
    raw.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
