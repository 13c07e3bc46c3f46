//! Data models for Bookshelf

pub mod book;
pub mod tag;

// Re-export commonly used types
pub use book::{Book, BookPayload, BookQuery, NewBook};
pub use tag::{AttachTags, Tag, TagPayload};
