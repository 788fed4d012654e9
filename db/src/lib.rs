use color_eyre::{eyre::Context, Result};
use sqlx::postgres::PgPoolOptions;

pub mod admin_users;
pub mod authors;
pub mod categories;
pub mod discussions;
pub mod ingredients;
pub mod learning_plans;
pub mod mock;
pub mod notifications;
pub mod recipes;
pub mod steps;

pub use sqlx;
pub use sqlx::PgPool;

#[tracing::instrument(err)]
pub async fn setup_db_pool() -> Result<PgPool> {
    let database_url = std::env::var("DATABASE_URL").wrap_err("DATABASE_URL must be set")?;
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    const MIGRATION_LOCK_ID: i64 = 0xDB_DB_DB_DB_DB_DB_DB;
    sqlx::query("SELECT pg_advisory_lock($1)")
        .bind(MIGRATION_LOCK_ID)
        .execute(&pool)
        .await?;

    sqlx::migrate!().run(&pool).await?;

    let unlocked: Option<bool> = sqlx::query_scalar("SELECT pg_advisory_unlock($1)")
        .bind(MIGRATION_LOCK_ID)
        .fetch_one(&pool)
        .await?;

    match unlocked {
        Some(true) => tracing::info!("Migration lock unlocked"),
        Some(false) => tracing::info!("Failed to unlock migration lock"),
        None => color_eyre::eyre::bail!("Failed to unlock migration lock"),
    }

    Ok(pool)
}

/// An `ILIKE` pattern matching `query` anywhere, with the wildcard
/// characters in `query` taken literally.
pub(crate) fn contains_pattern(query: &str) -> String {
    let escaped = query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

/// Blank search terms mean "no filter".
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("pie"), "%pie%");
        assert_eq!(contains_pattern("100%_"), "%100\\%\\_%");
    }

    #[test]
    fn blank_filters_are_dropped() {
        assert_eq!(non_blank(Some("  ")), None);
        assert_eq!(non_blank(Some(" pasta ")), Some("pasta"));
        assert_eq!(non_blank(None), None);
    }
}
