use chrono::{DateTime, Utc};
use color_eyre::Result;
use forms::NewCategory;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(rename = "id")]
    pub category_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Category {
    /// `None` when a category with that name already exists.
    pub async fn create(pool: &PgPool, category: NewCategory) -> Result<Option<Self>> {
        let created = sqlx::query_as::<_, Category>(
            r"
            INSERT INTO categories (name, description, image_url)
            VALUES ($1, $2, $3)
            ON CONFLICT (name) DO NOTHING
            RETURNING category_id, name, description, image_url, created_at
            ",
        )
        .bind(category.name.trim())
        .bind(category.description)
        .bind(category.image_url)
        .fetch_optional(pool)
        .await?;

        Ok(created)
    }

    pub async fn get_by_id(pool: &PgPool, category_id: Uuid) -> Result<Option<Self>> {
        let category = sqlx::query_as::<_, Category>(
            r"
            SELECT category_id, name, description, image_url, created_at
            FROM categories
            WHERE category_id = $1
            ",
        )
        .bind(category_id)
        .fetch_optional(pool)
        .await?;

        Ok(category)
    }

    pub async fn list_all(pool: &PgPool) -> Result<Vec<Self>> {
        let categories = sqlx::query_as::<_, Category>(
            r"
            SELECT category_id, name, description, image_url, created_at
            FROM categories
            ORDER BY name
            ",
        )
        .fetch_all(pool)
        .await?;

        Ok(categories)
    }

    /// `None` when the category doesn't exist.
    pub async fn update(
        pool: &PgPool,
        category_id: Uuid,
        category: NewCategory,
    ) -> Result<Option<Self>> {
        let updated = sqlx::query_as::<_, Category>(
            r"
            UPDATE categories
            SET name = $2,
                description = COALESCE($3, description),
                image_url = COALESCE($4, image_url)
            WHERE category_id = $1
            RETURNING category_id, name, description, image_url, created_at
            ",
        )
        .bind(category_id)
        .bind(category.name.trim())
        .bind(category.description)
        .bind(category.image_url)
        .fetch_optional(pool)
        .await?;

        Ok(updated)
    }

    /// Whether another category already uses `name`.
    pub async fn name_taken(pool: &PgPool, name: &str, except: Option<Uuid>) -> Result<bool> {
        let taken = sqlx::query_scalar(
            r"
            SELECT EXISTS (
                SELECT 1 FROM categories
                WHERE name = $1 AND ($2::UUID IS NULL OR category_id <> $2)
            )
            ",
        )
        .bind(name.trim())
        .bind(except)
        .fetch_one(pool)
        .await?;

        Ok(taken)
    }

    pub async fn delete(pool: &PgPool, category_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM categories WHERE category_id = $1")
            .bind(category_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
