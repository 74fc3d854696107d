use std::sync::Arc;

use tokoku_types::domain::category::{Category, CategoryRequest};
use tokoku_types::ports::MarketStore;

use crate::errors::AppError;

pub struct CategoryService<R: MarketStore> {
    repo: Arc<R>,
}

impl<R: MarketStore> CategoryService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, req: CategoryRequest) -> Result<Category, AppError> {
        let name = req.validated_name().map_err(AppError::bad_request)?;
        Ok(self.repo.create_category(name).await?)
    }

    pub async fn list(&self) -> Result<Vec<Category>, AppError> {
        Ok(self.repo.list_categories().await?)
    }

    pub async fn get(&self, id: i64) -> Result<Category, AppError> {
        self.repo
            .get_category(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("category {id}")))
    }

    pub async fn update(&self, id: i64, req: CategoryRequest) -> Result<Category, AppError> {
        let name = req.validated_name().map_err(AppError::bad_request)?;
        self.repo
            .update_category(id, name)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("category {id}")))
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        if self.repo.delete_category(id).await? {
            Ok(())
        } else {
            Err(AppError::NotFound(format!("category {id}")))
        }
    }
}
