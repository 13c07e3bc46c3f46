//! Tags repository

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgConnection, Pool, Postgres};

use super::TagStore;
use crate::{
    error::{is_unique_violation, AppError, AppResult},
    models::Tag,
};

#[derive(Clone)]
pub struct TagsRepository {
    pool: Pool<Postgres>,
}

impl TagsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

/// Look a tag up by exact name on an open connection or transaction
pub(crate) async fn fetch_by_name(conn: &mut PgConnection, name: &str) -> AppResult<Option<Tag>> {
    let tag = sqlx::query_as::<_, Tag>("SELECT id, name, created_at FROM tags WHERE name = $1")
        .bind(name)
        .fetch_optional(conn)
        .await?;
    Ok(tag)
}

/// Insert a tag unless one with that name exists.
///
/// Returns `None` when the unique constraint swallowed the insert, i.e. a
/// concurrent request created the same name first.
pub(crate) async fn insert_if_absent(conn: &mut PgConnection, name: &str) -> AppResult<Option<Tag>> {
    let tag = sqlx::query_as::<_, Tag>(
        r#"
        INSERT INTO tags (name, created_at) VALUES ($1, $2)
        ON CONFLICT (name) DO NOTHING
        RETURNING id, name, created_at
        "#,
    )
    .bind(name)
    .bind(Utc::now())
    .fetch_optional(conn)
    .await?;
    Ok(tag)
}

#[async_trait]
impl TagStore for TagsRepository {
    async fn list(&self) -> AppResult<Vec<Tag>> {
        let rows = sqlx::query_as::<_, Tag>(
            "SELECT id, name, created_at FROM tags ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get_by_id(&self, id: i32) -> AppResult<Option<Tag>> {
        let tag = sqlx::query_as::<_, Tag>("SELECT id, name, created_at FROM tags WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(tag)
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Tag>> {
        let mut conn = self.pool.acquire().await?;
        fetch_by_name(&mut *conn, name).await
    }

    async fn create(&self, name: &str) -> AppResult<Tag> {
        let tag = sqlx::query_as::<_, Tag>(
            "INSERT INTO tags (name, created_at) VALUES ($1, $2) RETURNING id, name, created_at",
        )
        .bind(name)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::TagExists(name.to_string())
            } else {
                AppError::Database(e)
            }
        })?;

        tracing::info!("Created tag id={} name={:?}", tag.id, tag.name);
        Ok(tag)
    }

    async fn update(&self, id: i32, name: &str) -> AppResult<Option<Tag>> {
        sqlx::query_as::<_, Tag>(
            "UPDATE tags SET name = $1 WHERE id = $2 RETURNING id, name, created_at",
        )
        .bind(name)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::TagExists(name.to_string())
            } else {
                AppError::Database(e)
            }
        })
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        // book_tags rows go with it through ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM tags WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
