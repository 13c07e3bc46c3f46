//! Tag endpoints

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};

use crate::{
    error::{AppError, AppResult},
    models::{Tag, TagPayload},
};

use super::{AppJson, AppPath};

/// List all tags, newest first
#[utoipa::path(
    get,
    path = "/tags",
    tag = "tags",
    responses(
        (status = 200, description = "List of tags", body = Vec<Tag>)
    )
)]
pub async fn list_tags(State(state): State<crate::AppState>) -> AppResult<Json<Vec<Tag>>> {
    let tags = state.services.tags.list().await?;
    Ok(Json(tags))
}

/// Get tag by ID
#[utoipa::path(
    get,
    path = "/tags/{id}",
    tag = "tags",
    params(("id" = i32, Path, description = "Tag ID")),
    responses(
        (status = 200, description = "Tag details", body = Tag),
        (status = 404, description = "Tag not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_tag(
    State(state): State<crate::AppState>,
    AppPath(id): AppPath<i32>,
) -> AppResult<Json<Tag>> {
    let tag = state
        .services
        .tags
        .get(id)
        .await?
        .ok_or(AppError::TagNotFound(id))?;
    Ok(Json(tag))
}

/// Create a tag
#[utoipa::path(
    post,
    path = "/tags",
    tag = "tags",
    request_body = TagPayload,
    responses(
        (status = 201, description = "Tag created", body = Tag),
        (status = 403, description = "Tag already exists", body = crate::error::ErrorResponse),
        (status = 422, description = "Invalid input", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_tag(
    State(state): State<crate::AppState>,
    AppJson(data): AppJson<TagPayload>,
) -> AppResult<(StatusCode, Json<Tag>)> {
    let tag = state.services.tags.create(&data).await?;
    Ok((StatusCode::CREATED, Json(tag)))
}

/// Rename a tag
#[utoipa::path(
    put,
    path = "/tags/{id}",
    tag = "tags",
    params(("id" = i32, Path, description = "Tag ID")),
    request_body = TagPayload,
    responses(
        (status = 200, description = "Tag updated", body = Tag),
        (status = 403, description = "Name used by another tag", body = crate::error::ErrorResponse),
        (status = 404, description = "Tag not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_tag(
    State(state): State<crate::AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(data): AppJson<TagPayload>,
) -> AppResult<Json<Tag>> {
    let tag = state.services.tags.update(id, &data).await?;
    Ok(Json(tag))
}

/// Delete a tag and its book links
#[utoipa::path(
    delete,
    path = "/tags/{id}",
    tag = "tags",
    params(("id" = i32, Path, description = "Tag ID")),
    responses(
        (status = 204, description = "Tag deleted"),
        (status = 404, description = "Tag not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_tag(
    State(state): State<crate::AppState>,
    AppPath(id): AppPath<i32>,
) -> AppResult<StatusCode> {
    state.services.tags.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
