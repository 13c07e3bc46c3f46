//! Attaching tags to books

use std::sync::Arc;

use validator::Validate;

use crate::{
    error::AppResult,
    models::{AttachTags, Book},
    repository::{AssociationStore, BookStore},
};

#[derive(Clone)]
pub struct AssociationService {
    books: Arc<dyn BookStore>,
    store: Arc<dyn AssociationStore>,
}

impl AssociationService {
    pub fn new(books: Arc<dyn BookStore>, store: Arc<dyn AssociationStore>) -> Self {
        Self { books, store }
    }

    /// Attach tags to a book by name and return the book with its full tag list.
    ///
    /// Tags are reused when the name already exists and created otherwise.
    /// Names already linked to the book are skipped. A missing book fails
    /// the whole call before anything is written.
    pub async fn attach_tags(&self, book_id: i32, data: &AttachTags) -> AppResult<Book> {
        for tag in &data.tags {
            tag.validate()?;
        }
        let requested: Vec<String> = data.tags.iter().map(|t| t.name.clone()).collect();

        let book = self.books.get_by_id(book_id, true).await?;

        let pending = book.pending_tag_names(&requested);
        if pending.is_empty() {
            tracing::debug!("No new tags for book id={}", book_id);
            return Ok(book);
        }

        self.store.attach(book_id, &pending).await?;

        self.books.get_by_id(book_id, true).await
    }
}
