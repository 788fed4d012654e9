use chrono::{DateTime, Utc};
use color_eyre::Result;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AdminUser {
    #[serde(rename = "id")]
    pub admin_user_id: Uuid,
    pub fullname: String,
    pub email: String,
    #[serde(skip)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AdminUser {
    /// `None` when the email is already registered.
    pub async fn create(
        pool: &PgPool,
        fullname: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<Option<Self>> {
        let user = sqlx::query_as::<_, AdminUser>(
            r"
            INSERT INTO admin_users (fullname, email, password_hash)
            VALUES ($1, $2, $3)
            ON CONFLICT (email) DO NOTHING
            RETURNING admin_user_id, fullname, email, password_hash, created_at, updated_at
            ",
        )
        .bind(fullname)
        .bind(email)
        .bind(password_hash)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    pub async fn get_by_id(pool: &PgPool, admin_user_id: Uuid) -> Result<Option<Self>> {
        let user = sqlx::query_as::<_, AdminUser>(
            r"
            SELECT admin_user_id, fullname, email, password_hash, created_at, updated_at
            FROM admin_users
            WHERE admin_user_id = $1
            ",
        )
        .bind(admin_user_id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    pub async fn get_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>> {
        let user = sqlx::query_as::<_, AdminUser>(
            r"
            SELECT admin_user_id, fullname, email, password_hash, created_at, updated_at
            FROM admin_users
            WHERE email = $1
            ",
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    pub async fn list_all(pool: &PgPool) -> Result<Vec<Self>> {
        let users = sqlx::query_as::<_, AdminUser>(
            r"
            SELECT admin_user_id, fullname, email, password_hash, created_at, updated_at
            FROM admin_users
            ORDER BY created_at
            ",
        )
        .fetch_all(pool)
        .await?;

        Ok(users)
    }

    /// Fields left as `None` keep their stored value.
    pub async fn update(
        pool: &PgPool,
        admin_user_id: Uuid,
        fullname: Option<&str>,
        email: Option<&str>,
        password_hash: Option<&str>,
    ) -> Result<Option<Self>> {
        let user = sqlx::query_as::<_, AdminUser>(
            r"
            UPDATE admin_users
            SET fullname = COALESCE($2, fullname),
                email = COALESCE($3, email),
                password_hash = COALESCE($4, password_hash),
                updated_at = NOW()
            WHERE admin_user_id = $1
            RETURNING admin_user_id, fullname, email, password_hash, created_at, updated_at
            ",
        )
        .bind(admin_user_id)
        .bind(fullname)
        .bind(email)
        .bind(password_hash)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    pub async fn delete(pool: &PgPool, admin_user_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM admin_users WHERE admin_user_id = $1")
            .bind(admin_user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn email_exists(pool: &PgPool, email: &str) -> Result<bool> {
        let exists = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM admin_users WHERE email = $1)")
            .bind(email)
            .fetch_one(pool)
            .await?;

        Ok(exists)
    }
}

/// Sessions older than this are ignored, and swept on the next login.
pub const SESSION_MAX_AGE_DAYS: i32 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct AdminSession {
    pub session_id: Uuid,
    pub admin_user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AdminSession {
    pub async fn create(pool: &PgPool, admin_user_id: Uuid) -> Result<Self> {
        let expired = Self::delete_expired(pool).await?;
        if expired > 0 {
            tracing::debug!(expired, "Removed expired admin sessions");
        }

        let session = sqlx::query_as::<_, AdminSession>(
            r"
            INSERT INTO admin_sessions (admin_user_id)
            VALUES ($1)
            RETURNING session_id, admin_user_id, created_at, updated_at
            ",
        )
        .bind(admin_user_id)
        .fetch_one(pool)
        .await?;

        Ok(session)
    }

    pub async fn get_by_id(pool: &PgPool, session_id: Uuid) -> Result<Option<Self>> {
        let session = sqlx::query_as::<_, AdminSession>(
            r"
            SELECT session_id, admin_user_id, created_at, updated_at
            FROM admin_sessions
            WHERE session_id = $1
              AND created_at > NOW() - make_interval(days => $2)
            ",
        )
        .bind(session_id)
        .bind(SESSION_MAX_AGE_DAYS)
        .fetch_optional(pool)
        .await?;

        Ok(session)
    }

    pub async fn delete_expired(pool: &PgPool) -> Result<u64> {
        let result = sqlx::query(
            "DELETE FROM admin_sessions WHERE created_at <= NOW() - make_interval(days => $1)",
        )
        .bind(SESSION_MAX_AGE_DAYS)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn delete(pool: &PgPool, session_id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM admin_sessions WHERE session_id = $1")
            .bind(session_id)
            .execute(pool)
            .await?;

        Ok(())
    }
}
