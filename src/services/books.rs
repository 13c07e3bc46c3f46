//! Book catalog service

use std::sync::Arc;

use crate::{
    config::CatalogConfig,
    error::{AppError, AppResult},
    models::{Book, BookPayload},
    repository::BookStore,
};

#[derive(Clone)]
pub struct BookService {
    store: Arc<dyn BookStore>,
    catalog: CatalogConfig,
}

impl BookService {
    pub fn new(store: Arc<dyn BookStore>, catalog: CatalogConfig) -> Self {
        Self { store, catalog }
    }

    /// List books, newest first
    pub async fn list(&self, with_tags: bool) -> AppResult<Vec<Book>> {
        self.store.list(with_tags).await
    }

    /// Get a book; a missing id is always `BookNotFound`
    pub async fn get(&self, id: i32, with_tags: bool) -> AppResult<Book> {
        self.store.get_by_id(id, with_tags).await
    }

    pub async fn create(&self, data: &BookPayload) -> AppResult<Book> {
        let book = data.to_new_book()?;
        self.ensure_title_available(&book.title, None).await?;
        self.store.create(&book).await
    }

    /// Replace every mutable field of a book
    pub async fn update(&self, id: i32, data: &BookPayload) -> AppResult<Book> {
        let book = data.to_new_book()?;
        if self.catalog.unique_titles {
            // An unknown id is reported before any title conflict
            self.store.get_by_id(id, false).await?;
        }
        self.ensure_title_available(&book.title, Some(id)).await?;
        let updated = self.store.update(id, &book).await?;
        tracing::info!("Updated book id={}", id);
        Ok(updated)
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.store.delete(id).await
    }

    async fn ensure_title_available(&self, title: &str, current: Option<i32>) -> AppResult<()> {
        if !self.catalog.unique_titles {
            return Ok(());
        }
        match self.store.find_id_by_title(title).await? {
            Some(existing) if Some(existing) != current => {
                tracing::info!("Rejected duplicate title {:?} (book id={})", title, existing);
                Err(AppError::BookExists(title.to_string()))
            }
            _ => Ok(()),
        }
    }
}
