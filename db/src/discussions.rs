use chrono::{DateTime, Utc};
use color_eyre::Result;
use forms::{NewComment, NewDiscussion};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::{authors::Author, notifications::Notification};

const DISCUSSION_COLUMNS: &str = r"
    discussion_id,
    title,
    content,
    images,
    tags,
    author_id,
    likes,
    created_at,
    updated_at
";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Discussion {
    #[serde(rename = "id")]
    pub discussion_id: Uuid,
    pub title: String,
    pub content: String,
    pub images: Vec<String>,
    pub tags: Vec<String>,
    pub author_id: Uuid,
    pub likes: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(rename = "id")]
    pub comment_id: Uuid,
    pub discussion_id: Uuid,
    pub author_id: Uuid,
    pub author_username: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FullDiscussion {
    #[serde(flatten)]
    pub discussion: Discussion,
    pub author: Option<Author>,
    pub comments: Vec<Comment>,
}

impl Discussion {
    pub async fn create(pool: &PgPool, discussion: NewDiscussion) -> Result<FullDiscussion> {
        let author_id = discussion
            .author_id
            .ok_or_else(|| color_eyre::eyre::eyre!("Discussion has no author"))?;

        let created = sqlx::query_as::<_, Discussion>(&format!(
            r"
            INSERT INTO discussions (title, content, images, tags, author_id, likes)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {DISCUSSION_COLUMNS}
            "
        ))
        .bind(&discussion.title)
        .bind(&discussion.content)
        .bind(&discussion.images)
        .bind(&discussion.tags)
        .bind(author_id)
        .bind(discussion.likes.unwrap_or(0))
        .fetch_one(pool)
        .await?;

        created.with_details(pool).await
    }

    pub async fn get_by_id(pool: &PgPool, discussion_id: Uuid) -> Result<Option<Self>> {
        let discussion = sqlx::query_as::<_, Discussion>(&format!(
            "SELECT {DISCUSSION_COLUMNS} FROM discussions WHERE discussion_id = $1"
        ))
        .bind(discussion_id)
        .fetch_optional(pool)
        .await?;

        Ok(discussion)
    }

    pub async fn get_full(pool: &PgPool, discussion_id: Uuid) -> Result<Option<FullDiscussion>> {
        let Some(discussion) = Self::get_by_id(pool, discussion_id).await? else {
            return Ok(None);
        };

        Ok(Some(discussion.with_details(pool).await?))
    }

    pub async fn with_details(self, pool: &PgPool) -> Result<FullDiscussion> {
        let author = Author::get_by_id(pool, self.author_id).await?;
        let comments = Comment::get_by_discussion(pool, self.discussion_id).await?;

        Ok(FullDiscussion {
            discussion: self,
            author,
            comments,
        })
    }

    /// Newest first.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Self>> {
        let discussions = sqlx::query_as::<_, Discussion>(&format!(
            "SELECT {DISCUSSION_COLUMNS} FROM discussions ORDER BY created_at DESC"
        ))
        .fetch_all(pool)
        .await?;

        Ok(discussions)
    }

    pub async fn list_full(pool: &PgPool) -> Result<Vec<FullDiscussion>> {
        let discussions = Self::list_all(pool).await?;

        let mut full = Vec::with_capacity(discussions.len());
        for discussion in discussions {
            full.push(discussion.with_details(pool).await?);
        }

        Ok(full)
    }

    pub async fn update(
        pool: &PgPool,
        discussion_id: Uuid,
        discussion: NewDiscussion,
    ) -> Result<Option<FullDiscussion>> {
        let updated = sqlx::query_as::<_, Discussion>(&format!(
            r"
            UPDATE discussions
            SET title = $2,
                content = $3,
                images = $4,
                tags = $5,
                updated_at = NOW()
            WHERE discussion_id = $1
            RETURNING {DISCUSSION_COLUMNS}
            "
        ))
        .bind(discussion_id)
        .bind(&discussion.title)
        .bind(&discussion.content)
        .bind(&discussion.images)
        .bind(&discussion.tags)
        .fetch_optional(pool)
        .await?;

        match updated {
            Some(updated) => Ok(Some(updated.with_details(pool).await?)),
            None => Ok(None),
        }
    }

    pub async fn delete(pool: &PgPool, discussion_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM discussions WHERE discussion_id = $1")
            .bind(discussion_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn like(pool: &PgPool, discussion_id: Uuid) -> Result<Option<i32>> {
        let likes = sqlx::query_scalar(
            "UPDATE discussions SET likes = likes + 1 WHERE discussion_id = $1 RETURNING likes",
        )
        .bind(discussion_id)
        .fetch_optional(pool)
        .await?;

        Ok(likes)
    }

    pub async fn count(pool: &PgPool) -> Result<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM discussions")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}

impl Comment {
    pub async fn get_by_discussion(pool: &PgPool, discussion_id: Uuid) -> Result<Vec<Self>> {
        let comments = sqlx::query_as::<_, Comment>(
            r"
            SELECT c.comment_id, c.discussion_id, c.author_id, a.username AS author_username,
                   c.content, c.created_at
            FROM discussion_comments c
            JOIN authors a ON a.author_id = c.author_id
            WHERE c.discussion_id = $1
            ORDER BY c.created_at
            ",
        )
        .bind(discussion_id)
        .fetch_all(pool)
        .await?;

        Ok(comments)
    }

    /// Adds the comment and notifies the discussion's author, unless they
    /// wrote the comment themselves. `None` for an unknown discussion.
    #[tracing::instrument(skip(pool, comment), err)]
    pub async fn create(
        pool: &PgPool,
        discussion_id: Uuid,
        comment: NewComment,
    ) -> Result<Option<Self>> {
        let mut transaction = pool.begin().await?;

        let discussion_author: Option<Uuid> =
            sqlx::query_scalar("SELECT author_id FROM discussions WHERE discussion_id = $1")
                .bind(discussion_id)
                .fetch_optional(&mut *transaction)
                .await?;
        let Some(discussion_author) = discussion_author else {
            return Ok(None);
        };

        let created = sqlx::query_as::<_, Comment>(
            r"
            WITH inserted AS (
                INSERT INTO discussion_comments (discussion_id, author_id, content)
                VALUES ($1, $2, $3)
                RETURNING comment_id, discussion_id, author_id, content, created_at
            )
            SELECT i.comment_id, i.discussion_id, i.author_id, a.username AS author_username,
                   i.content, i.created_at
            FROM inserted i
            JOIN authors a ON a.author_id = i.author_id
            ",
        )
        .bind(discussion_id)
        .bind(comment.author_id)
        .bind(&comment.content)
        .fetch_one(&mut *transaction)
        .await?;

        if discussion_author != created.author_id {
            let message = format!("{} commented on your discussion", created.author_username);
            Notification::create(&mut *transaction, discussion_author, &message).await?;
        }

        transaction.commit().await?;

        Ok(Some(created))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn question(author_id: Uuid) -> NewDiscussion {
        NewDiscussion {
            title: "Cast iron care".into(),
            content: "How often should I re-season?".into(),
            tags: vec!["equipment".into()],
            author_id: Some(author_id),
            ..Default::default()
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn comments_notify_the_discussion_author(pool: PgPool) -> Result<()> {
        let asker = Author::find_or_create_by_username(&pool, "vegan_cook").await?;
        let helper = Author::find_or_create_by_username(&pool, "chef_sophia").await?;
        let created = Discussion::create(&pool, question(asker.author_id)).await?;
        let discussion_id = created.discussion.discussion_id;

        let comment = Comment::create(
            &pool,
            discussion_id,
            NewComment {
                content: "Every few months".into(),
                author_id: helper.author_id,
            },
        )
        .await?
        .unwrap();
        assert_eq!(comment.author_username, "chef_sophia");

        Comment::create(
            &pool,
            discussion_id,
            NewComment {
                content: "Thanks!".into(),
                author_id: asker.author_id,
            },
        )
        .await?;

        let full = Discussion::get_full(&pool, discussion_id).await?.unwrap();
        assert_eq!(full.comments.len(), 2);
        assert_eq!(full.comments[0].content, "Every few months");

        let notifications = Notification::list_for_user(&pool, asker.author_id).await?;
        assert_eq!(notifications.len(), 1);
        assert_eq!(
            notifications[0].message,
            "chef_sophia commented on your discussion"
        );

        Ok(())
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn commenting_on_a_missing_discussion_is_none(pool: PgPool) -> Result<()> {
        let author = Author::find_or_create_by_username(&pool, "current-user").await?;

        let comment = Comment::create(
            &pool,
            Uuid::new_v4(),
            NewComment {
                content: "Hello?".into(),
                author_id: author.author_id,
            },
        )
        .await?;

        assert!(comment.is_none());

        Ok(())
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn update_like_and_delete(pool: PgPool) -> Result<()> {
        let author = Author::find_or_create_by_username(&pool, "current-user").await?;
        let created = Discussion::create(&pool, question(author.author_id)).await?;
        let id = created.discussion.discussion_id;
        assert_eq!(created.discussion.likes, 0);

        let mut edit = question(author.author_id);
        edit.title = "Carbon steel care".into();
        let updated = Discussion::update(&pool, id, edit).await?.unwrap();
        assert_eq!(updated.discussion.title, "Carbon steel care");

        assert_eq!(Discussion::like(&pool, id).await?, Some(1));
        assert!(Discussion::delete(&pool, id).await?);
        assert!(Discussion::get_full(&pool, id).await?.is_none());

        Ok(())
    }
}
