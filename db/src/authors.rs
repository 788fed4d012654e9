use chrono::{DateTime, Utc};
use color_eyre::Result;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// Recipe and learning plan counts are derived, never stored.
const AUTHOR_COLUMNS: &str = r"
    a.author_id,
    a.username,
    a.name,
    a.bio,
    a.profile_image_url,
    a.followers,
    a.following,
    (SELECT COUNT(*) FROM recipes r WHERE r.author_id = a.author_id)::INT4 AS recipes,
    (SELECT COUNT(*) FROM learning_plans lp WHERE lp.author_id = a.author_id)::INT4 AS learning_plans,
    a.created_at
";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    #[serde(rename = "id")]
    pub author_id: Uuid,
    pub username: String,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub profile_image_url: Option<String>,
    pub followers: i32,
    pub following: i32,
    pub recipes: i32,
    pub learning_plans: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewAuthor {
    pub username: String,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub profile_image_url: Option<String>,
    pub followers: i32,
    pub following: i32,
}

impl Author {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.username)
    }

    pub async fn create(pool: &PgPool, author: NewAuthor) -> Result<Self> {
        let author_id: Uuid = sqlx::query_scalar(
            r"
            INSERT INTO authors (username, name, bio, profile_image_url, followers, following)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING author_id
            ",
        )
        .bind(&author.username)
        .bind(&author.name)
        .bind(&author.bio)
        .bind(&author.profile_image_url)
        .bind(author.followers)
        .bind(author.following)
        .fetch_one(pool)
        .await?;

        Self::get_by_id(pool, author_id)
            .await?
            .ok_or_else(|| color_eyre::eyre::eyre!("Author {author_id} vanished after insert"))
    }

    pub async fn get_by_id(pool: &PgPool, author_id: Uuid) -> Result<Option<Self>> {
        let author = sqlx::query_as::<_, Author>(&format!(
            "SELECT {AUTHOR_COLUMNS} FROM authors a WHERE a.author_id = $1"
        ))
        .bind(author_id)
        .fetch_optional(pool)
        .await?;

        Ok(author)
    }

    pub async fn get_by_username(pool: &PgPool, username: &str) -> Result<Option<Self>> {
        let author = sqlx::query_as::<_, Author>(&format!(
            "SELECT {AUTHOR_COLUMNS} FROM authors a WHERE a.username = $1"
        ))
        .bind(username)
        .fetch_optional(pool)
        .await?;

        Ok(author)
    }

    /// Looks up `username`, inserting a bare author row the first time it is
    /// seen.
    pub async fn find_or_create_by_username(pool: &PgPool, username: &str) -> Result<Self> {
        sqlx::query(
            r"
            INSERT INTO authors (username)
            VALUES ($1)
            ON CONFLICT (username) DO NOTHING
            ",
        )
        .bind(username)
        .execute(pool)
        .await?;

        Self::get_by_username(pool, username)
            .await?
            .ok_or_else(|| color_eyre::eyre::eyre!("Author {username} missing after upsert"))
    }

    pub async fn list_all(pool: &PgPool) -> Result<Vec<Self>> {
        let authors = sqlx::query_as::<_, Author>(&format!(
            "SELECT {AUTHOR_COLUMNS} FROM authors a ORDER BY a.username"
        ))
        .fetch_all(pool)
        .await?;

        Ok(authors)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[sqlx::test(migrations = "./migrations")]
    async fn find_or_create_is_idempotent(pool: PgPool) -> Result<()> {
        let first = Author::find_or_create_by_username(&pool, "current-user").await?;
        let second = Author::find_or_create_by_username(&pool, "current-user").await?;

        assert_eq!(first.author_id, second.author_id);
        assert_eq!(first.display_name(), "current-user");
        assert_eq!(Author::list_all(&pool).await?.len(), 1);

        Ok(())
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn counts_start_at_zero(pool: PgPool) -> Result<()> {
        let author = Author::create(
            &pool,
            NewAuthor {
                username: "chef_sophia".into(),
                name: Some("Sophia Martinez".into()),
                followers: 12,
                ..Default::default()
            },
        )
        .await?;

        assert_eq!(author.display_name(), "Sophia Martinez");
        assert_eq!(author.followers, 12);
        assert_eq!(author.recipes, 0);
        assert_eq!(author.learning_plans, 0);

        Ok(())
    }
}
