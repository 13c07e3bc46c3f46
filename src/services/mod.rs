//! Business logic services

pub mod associations;
pub mod books;
pub mod tags;

use std::sync::Arc;

use crate::{
    config::CatalogConfig,
    repository::{AssociationStore, BookStore, Repository, TagStore},
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub books: books::BookService,
    pub tags: tags::TagService,
    pub associations: associations::AssociationService,
}

impl Services {
    /// Create all services on top of the Postgres repository
    pub fn new(repository: Repository, catalog: CatalogConfig) -> Self {
        Self::with_stores(
            Arc::new(repository.books),
            Arc::new(repository.tags),
            Arc::new(repository.associations),
            catalog,
        )
    }

    /// Create all services on top of arbitrary stores
    pub fn with_stores(
        books: Arc<dyn BookStore>,
        tags: Arc<dyn TagStore>,
        associations: Arc<dyn AssociationStore>,
        catalog: CatalogConfig,
    ) -> Self {
        Self {
            books: books::BookService::new(books.clone(), catalog),
            tags: tags::TagService::new(tags),
            associations: associations::AssociationService::new(books, associations),
        }
    }
}
