use std::sync::Arc;

use tokoku_types::domain::destination::{Destination, DestinationRequest, DestinationUpdateRequest};
use tokoku_types::ports::MarketStore;

use crate::errors::AppError;

/// Shipping addresses. Every call is scoped to the owning user; another
/// user's address looks exactly like a missing one.
pub struct DestinationService<R: MarketStore> {
    repo: Arc<R>,
}

impl<R: MarketStore> DestinationService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn create(
        &self,
        user_id: i64,
        req: DestinationRequest,
    ) -> Result<Destination, AppError> {
        let destination = req.validate().map_err(AppError::bad_request)?;
        Ok(self.repo.create_destination(user_id, destination).await?)
    }

    pub async fn list(&self, user_id: i64) -> Result<Vec<Destination>, AppError> {
        Ok(self.repo.list_destinations(user_id).await?)
    }

    pub async fn get(&self, id: i64, user_id: i64) -> Result<Destination, AppError> {
        self.repo
            .get_destination(id, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("alamat {id}")))
    }

    pub async fn update(
        &self,
        id: i64,
        user_id: i64,
        req: DestinationUpdateRequest,
    ) -> Result<Destination, AppError> {
        self.repo
            .update_destination(id, user_id, req.into_patch())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("alamat {id}")))
    }

    pub async fn delete(&self, id: i64, user_id: i64) -> Result<(), AppError> {
        if self.repo.delete_destination(id, user_id).await? {
            Ok(())
        } else {
            Err(AppError::NotFound(format!("alamat {id}")))
        }
    }
}
