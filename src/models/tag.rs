//! Tag model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// Tag record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Tag {
    pub id: i32,
    /// Tag name, unique across all tags
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Create / rename tag request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct TagPayload {
    #[validate(
        length(min = 1, max = 100, message = "Tag name must be 1 to 100 characters"),
        custom(function = "not_blank")
    )]
    pub name: String,
}

/// Attach tags to a book request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AttachTags {
    pub tags: Vec<TagPayload>,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Tag name must not be blank".into());
        return Err(err);
    }
    Ok(())
}
