use chrono::{DateTime, Utc};
use color_eyre::Result;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgExecutor, PgPool};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    #[serde(rename = "id")]
    pub notification_id: Uuid,
    pub user_id: Uuid,
    pub message: String,
    #[serde(rename = "read")]
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub async fn create(
        executor: impl PgExecutor<'_>,
        user_id: Uuid,
        message: &str,
    ) -> Result<Self> {
        let notification = sqlx::query_as::<_, Notification>(
            r"
            INSERT INTO notifications (user_id, message)
            VALUES ($1, $2)
            RETURNING notification_id, user_id, message, is_read, created_at
            ",
        )
        .bind(user_id)
        .bind(message)
        .fetch_one(executor)
        .await?;

        Ok(notification)
    }

    /// Newest first.
    pub async fn list_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Self>> {
        let notifications = sqlx::query_as::<_, Notification>(
            r"
            SELECT notification_id, user_id, message, is_read, created_at
            FROM notifications
            WHERE user_id = $1
            ORDER BY created_at DESC
            ",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(notifications)
    }

    pub async fn mark_as_read(pool: &PgPool, notification_id: Uuid) -> Result<Option<Self>> {
        let notification = sqlx::query_as::<_, Notification>(
            r"
            UPDATE notifications
            SET is_read = TRUE
            WHERE notification_id = $1
            RETURNING notification_id, user_id, message, is_read, created_at
            ",
        )
        .bind(notification_id)
        .fetch_optional(pool)
        .await?;

        Ok(notification)
    }

    pub async fn delete(pool: &PgPool, notification_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM notifications WHERE notification_id = $1")
            .bind(notification_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
