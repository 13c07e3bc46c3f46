//! Repository layer for database operations

pub mod associations;
pub mod books;
pub mod tags;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::{Book, NewBook, Tag},
};

/// Book persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookStore: Send + Sync {
    /// All books, newest first
    async fn list(&self, with_tags: bool) -> AppResult<Vec<Book>>;

    /// Fails with `BookNotFound` when the id is unknown
    async fn get_by_id(&self, id: i32, with_tags: bool) -> AppResult<Book>;

    async fn find_id_by_title(&self, title: &str) -> AppResult<Option<i32>>;

    async fn create(&self, book: &NewBook) -> AppResult<Book>;

    async fn update(&self, id: i32, book: &NewBook) -> AppResult<Book>;

    async fn delete(&self, id: i32) -> AppResult<()>;
}

/// Tag persistence. Lookups are soft: absence is `None`, not an error.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TagStore: Send + Sync {
    async fn list(&self) -> AppResult<Vec<Tag>>;

    async fn get_by_id(&self, id: i32) -> AppResult<Option<Tag>>;

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Tag>>;

    /// Fails with `TagExists` when the storage constraint rejects the name
    async fn create(&self, name: &str) -> AppResult<Tag>;

    async fn update(&self, id: i32, name: &str) -> AppResult<Option<Tag>>;

    /// Returns false when nothing was deleted
    async fn delete(&self, id: i32) -> AppResult<bool>;
}

/// Book-tag links
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AssociationStore: Send + Sync {
    /// Link every named tag to the book in one unit of work, creating the
    /// tags that do not exist yet. Existing links are left untouched.
    async fn attach(&self, book_id: i32, tag_names: &[String]) -> AppResult<()>;
}

/// Postgres-backed stores sharing one connection pool
#[derive(Clone)]
pub struct Repository {
    pub books: books::BooksRepository,
    pub tags: tags::TagsRepository,
    pub associations: associations::AssociationsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            books: books::BooksRepository::new(pool.clone()),
            tags: tags::TagsRepository::new(pool.clone()),
            associations: associations::AssociationsRepository::new(pool),
        }
    }
}
