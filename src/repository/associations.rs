//! Book-tag associations repository

use async_trait::async_trait;
use sqlx::{PgConnection, Pool, Postgres};

use super::{
    tags::{fetch_by_name, insert_if_absent},
    AssociationStore,
};
use crate::{
    error::{is_foreign_key_violation, AppError, AppResult},
    models::Tag,
};

#[derive(Clone)]
pub struct AssociationsRepository {
    pool: Pool<Postgres>,
}

impl AssociationsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

/// Reuse the tag with that name, or create it
async fn resolve_tag(conn: &mut PgConnection, name: &str) -> AppResult<Tag> {
    if let Some(tag) = fetch_by_name(&mut *conn, name).await? {
        return Ok(tag);
    }
    if let Some(tag) = insert_if_absent(&mut *conn, name).await? {
        tracing::debug!("Created tag id={} name={:?} while attaching", tag.id, tag.name);
        return Ok(tag);
    }
    // Lost the race against a concurrent insert of the same name
    fetch_by_name(&mut *conn, name)
        .await?
        .ok_or_else(|| AppError::Internal(format!("Tag {:?} vanished during attach", name)))
}

#[async_trait]
impl AssociationStore for AssociationsRepository {
    async fn attach(&self, book_id: i32, tag_names: &[String]) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        // Row lock keeps the book alive until commit
        let exists: Option<i32> =
            sqlx::query_scalar("SELECT id FROM books WHERE id = $1 FOR UPDATE")
                .bind(book_id)
                .fetch_optional(&mut *tx)
                .await?;
        if exists.is_none() {
            return Err(AppError::BookNotFound(book_id));
        }

        for name in tag_names {
            let tag = resolve_tag(&mut *tx, name).await?;

            sqlx::query(
                r#"
                INSERT INTO book_tags (book_id, tag_id) VALUES ($1, $2)
                ON CONFLICT (book_id, tag_id) DO NOTHING
                "#,
            )
            .bind(book_id)
            .bind(tag.id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    AppError::BookNotFound(book_id)
                } else {
                    AppError::Database(e)
                }
            })?;
        }

        tx.commit().await?;

        tracing::info!("Attached {} tag(s) to book id={}", tag_names.len(), book_id);
        Ok(())
    }
}
