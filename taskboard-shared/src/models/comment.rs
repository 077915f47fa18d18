/// Comment model and database operations
///
/// Comments attach discussion to tasks. Unlike projects and tasks they are
/// deleted physically; the audited snapshot of the removed body is the only
/// trace that remains. Comments on a soft-deleted task stay readable for
/// history, but no new ones can be added.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE comments (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     task_id UUID NOT NULL REFERENCES tasks(id),
///     author_user_id UUID NOT NULL REFERENCES users(id),
///     body TEXT NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

/// Comment on a task
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    /// Unique comment ID
    pub id: Uuid,

    /// Task the comment belongs to
    pub task_id: Uuid,

    /// User who wrote the comment; only they (or an admin) may edit it
    pub author_user_id: Uuid,

    /// Comment text
    pub body: String,

    /// When the comment was written
    pub created_at: DateTime<Utc>,

    /// When the comment was last edited
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a comment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateComment {
    /// Task to comment on
    pub task_id: Uuid,

    /// Author of the comment
    pub author_user_id: Uuid,

    /// Comment text
    pub body: String,
}

impl Comment {
    /// Creates a new comment
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails, including foreign
    /// key violations on the task or author.
    pub async fn create(
        executor: impl PgExecutor<'_>,
        data: CreateComment,
    ) -> Result<Self, sqlx::Error> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (task_id, author_user_id, body)
            VALUES ($1, $2, $3)
            RETURNING id, task_id, author_user_id, body, created_at, updated_at
            "#,
        )
        .bind(data.task_id)
        .bind(data.author_user_id)
        .bind(data.body)
        .fetch_one(executor)
        .await?;

        Ok(comment)
    }

    /// Finds a comment by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, task_id, author_user_id, body, created_at, updated_at
            FROM comments
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(comment)
    }

    /// Replaces a comment's body
    ///
    /// # Returns
    ///
    /// The updated comment, or `None` if no comment with that ID exists.
    pub async fn update_body(
        executor: impl PgExecutor<'_>,
        id: Uuid,
        body: String,
    ) -> Result<Option<Self>, sqlx::Error> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            UPDATE comments
            SET body = $2,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, task_id, author_user_id, body, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(body)
        .fetch_optional(executor)
        .await?;

        Ok(comment)
    }

    /// Physically deletes a comment
    ///
    /// # Returns
    ///
    /// True when a row was removed.
    pub async fn delete(executor: impl PgExecutor<'_>, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists a task's comments with pagination, oldest first
    ///
    /// Conversation order, unlike the newest-first entity listings.
    pub async fn list_by_task(
        pool: &PgPool,
        task_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let comments = sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, task_id, author_user_id, body, created_at, updated_at
            FROM comments
            WHERE task_id = $1
            ORDER BY created_at ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(task_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(comments)
    }

    /// Counts a task's comments
    pub async fn count_by_task(pool: &PgPool, task_id: Uuid) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM comments WHERE task_id = $1")
            .bind(task_id)
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}
