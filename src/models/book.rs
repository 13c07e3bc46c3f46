//! Book model

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::tag::Tag;
use crate::error::{AppError, AppResult};

/// Format accepted for `published_date`
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Book record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub publisher: String,
    pub published_date: NaiveDate,
    pub page_count: i32,
    pub language_code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Attached tags, present only when loaded with the book
    #[sqlx(skip)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
}

impl Book {
    /// Names from `requested` that still have to be linked to this book.
    ///
    /// Names already attached and repeats within the request are dropped;
    /// first-occurrence order is kept. Matching is exact.
    pub fn pending_tag_names(&self, requested: &[String]) -> Vec<String> {
        let mut seen: HashSet<&str> = self
            .tags
            .iter()
            .flatten()
            .map(|t| t.name.as_str())
            .collect();

        requested
            .iter()
            .filter(|name| seen.insert(name.as_str()))
            .cloned()
            .collect()
    }
}

/// Book fields sent on create and update. Every field is required: updates
/// replace all mutable fields, there is no partial merge.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct BookPayload {
    #[validate(length(min = 1, max = 100, message = "Title must be 1 to 100 characters"))]
    pub title: String,
    #[validate(length(max = 100, message = "Author must be at most 100 characters"))]
    pub author: String,
    pub publisher: String,
    /// Publication date (YYYY-MM-DD)
    pub published_date: String,
    #[validate(range(min = 0, message = "Page count must not be negative"))]
    pub page_count: i32,
    #[validate(length(min = 1, max = 5, message = "Language code must be 1 to 5 characters"))]
    pub language_code: String,
}

impl BookPayload {
    /// Validate the payload and convert it into typed column values
    pub fn to_new_book(&self) -> AppResult<NewBook> {
        self.validate()?;

        let published_date = NaiveDate::parse_from_str(&self.published_date, DATE_FORMAT)
            .map_err(|_| {
                AppError::validation(
                    "published_date",
                    format!(
                        "Invalid published_date '{}', expected YYYY-MM-DD",
                        self.published_date
                    ),
                )
            })?;

        Ok(NewBook {
            title: self.title.clone(),
            author: self.author.clone(),
            publisher: self.publisher.clone(),
            published_date,
            page_count: self.page_count,
            language_code: self.language_code.clone(),
        })
    }
}

/// The mutable columns of a book. Identifier and timestamps are never part of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub publisher: String,
    pub published_date: NaiveDate,
    pub page_count: i32,
    pub language_code: String,
}

/// Query parameters for book reads
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct BookQuery {
    /// Load attached tags with the books (default: true)
    pub with_tags: Option<bool>,
}

impl BookQuery {
    pub fn with_tags(&self) -> bool {
        self.with_tags.unwrap_or(true)
    }
}
