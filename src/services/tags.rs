//! Tag service

use std::sync::Arc;

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{Tag, TagPayload},
    repository::TagStore,
};

#[derive(Clone)]
pub struct TagService {
    store: Arc<dyn TagStore>,
}

impl TagService {
    pub fn new(store: Arc<dyn TagStore>) -> Self {
        Self { store }
    }

    /// List tags, newest first
    pub async fn list(&self) -> AppResult<Vec<Tag>> {
        self.store.list().await
    }

    /// Soft lookup, the caller decides whether absence is an error
    pub async fn get(&self, id: i32) -> AppResult<Option<Tag>> {
        self.store.get_by_id(id).await
    }

    /// Create a tag. The name check runs first; the storage unique
    /// constraint still rejects a concurrent duplicate with `TagExists`.
    pub async fn create(&self, data: &TagPayload) -> AppResult<Tag> {
        data.validate()?;

        if self.store.find_by_name(&data.name).await?.is_some() {
            return Err(AppError::TagExists(data.name.clone()));
        }

        self.store.create(&data.name).await
    }

    pub async fn update(&self, id: i32, data: &TagPayload) -> AppResult<Tag> {
        data.validate()?;

        if self.store.get_by_id(id).await?.is_none() {
            return Err(AppError::TagNotFound(id));
        }

        if let Some(other) = self.store.find_by_name(&data.name).await? {
            if other.id != id {
                return Err(AppError::TagExists(data.name.clone()));
            }
        }

        let tag = self
            .store
            .update(id, &data.name)
            .await?
            .ok_or(AppError::TagNotFound(id))?;
        tracing::info!("Renamed tag id={} to {:?}", id, tag.name);
        Ok(tag)
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        if !self.store.delete(id).await? {
            return Err(AppError::TagNotFound(id));
        }
        tracing::info!("Deleted tag id={}", id);
        Ok(())
    }
}
