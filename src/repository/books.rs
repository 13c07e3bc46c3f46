//! Books repository

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{FromRow, Pool, Postgres};

use super::BookStore;
use crate::{
    error::{AppError, AppResult},
    models::{Book, NewBook, Tag},
};

const BOOK_COLUMNS: &str = "id, title, author, publisher, published_date, page_count, \
                            language_code, created_at, updated_at";

/// One tag joined with the book it is attached to
#[derive(FromRow)]
struct BookTagRow {
    book_id: i32,
    #[sqlx(flatten)]
    tag: Tag,
}

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Load the tags of several books in a single query, keyed by book id
    async fn tags_for_books(&self, book_ids: &[i32]) -> AppResult<HashMap<i32, Vec<Tag>>> {
        if book_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, BookTagRow>(
            r#"
            SELECT bt.book_id, t.id, t.name, t.created_at
            FROM book_tags bt
            JOIN tags t ON t.id = bt.tag_id
            WHERE bt.book_id = ANY($1)
            ORDER BY t.name
            "#,
        )
        .bind(book_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_book: HashMap<i32, Vec<Tag>> = HashMap::new();
        for row in rows {
            by_book.entry(row.book_id).or_default().push(row.tag);
        }
        Ok(by_book)
    }
}

#[async_trait]
impl BookStore for BooksRepository {
    async fn list(&self, with_tags: bool) -> AppResult<Vec<Book>> {
        let query = format!(
            "SELECT {} FROM books ORDER BY created_at DESC, id DESC",
            BOOK_COLUMNS
        );
        let mut books = sqlx::query_as::<_, Book>(&query)
            .fetch_all(&self.pool)
            .await?;

        if with_tags {
            let ids: Vec<i32> = books.iter().map(|b| b.id).collect();
            let mut tags = self.tags_for_books(&ids).await?;
            for book in &mut books {
                book.tags = Some(tags.remove(&book.id).unwrap_or_default());
            }
        }

        Ok(books)
    }

    async fn get_by_id(&self, id: i32, with_tags: bool) -> AppResult<Book> {
        let query = format!("SELECT {} FROM books WHERE id = $1", BOOK_COLUMNS);
        let mut book = sqlx::query_as::<_, Book>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::BookNotFound(id))?;

        if with_tags {
            let mut tags = self.tags_for_books(&[id]).await?;
            book.tags = Some(tags.remove(&id).unwrap_or_default());
        }

        Ok(book)
    }

    async fn find_id_by_title(&self, title: &str) -> AppResult<Option<i32>> {
        let id = sqlx::query_scalar::<_, i32>("SELECT id FROM books WHERE title = $1 LIMIT 1")
            .bind(title)
            .fetch_optional(&self.pool)
            .await?;
        Ok(id)
    }

    async fn create(&self, book: &NewBook) -> AppResult<Book> {
        let now = Utc::now();
        let query = format!(
            r#"
            INSERT INTO books (
                title, author, publisher, published_date, page_count, language_code,
                created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            RETURNING {}
            "#,
            BOOK_COLUMNS
        );

        let created = sqlx::query_as::<_, Book>(&query)
            .bind(&book.title)
            .bind(&book.author)
            .bind(&book.publisher)
            .bind(book.published_date)
            .bind(book.page_count)
            .bind(&book.language_code)
            .bind(now)
            .fetch_one(&self.pool)
            .await?;

        tracing::info!("Created book id={} title={:?}", created.id, created.title);
        Ok(created)
    }

    async fn update(&self, id: i32, book: &NewBook) -> AppResult<Book> {
        let query = format!(
            r#"
            UPDATE books SET
                title = $1,
                author = $2,
                publisher = $3,
                published_date = $4,
                page_count = $5,
                language_code = $6,
                updated_at = $7
            WHERE id = $8
            RETURNING {}
            "#,
            BOOK_COLUMNS
        );

        sqlx::query_as::<_, Book>(&query)
            .bind(&book.title)
            .bind(&book.author)
            .bind(&book.publisher)
            .bind(book.published_date)
            .bind(book.page_count)
            .bind(&book.language_code)
            .bind(Utc::now())
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::BookNotFound(id))
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        // book_tags rows go with it through ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::BookNotFound(id));
        }
        tracing::info!("Deleted book id={}", id);
        Ok(())
    }
}
