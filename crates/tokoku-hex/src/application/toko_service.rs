use std::sync::Arc;

use tokoku_types::domain::toko::{Toko, TokoUpdateRequest};
use tokoku_types::ports::MarketStore;

use crate::errors::AppError;

pub struct TokoService<R: MarketStore> {
    repo: Arc<R>,
}

impl<R: MarketStore> TokoService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn list_all(&self) -> Result<Vec<Toko>, AppError> {
        Ok(self.repo.list_toko().await?)
    }

    pub async fn list_mine(&self, user_id: i64) -> Result<Vec<Toko>, AppError> {
        let mine = self.repo.list_toko_by_user(user_id).await?;
        if mine.is_empty() {
            return Err(AppError::NotFound(format!("no toko for user {user_id}")));
        }
        Ok(mine)
    }

    pub async fn get(&self, id: i64) -> Result<Toko, AppError> {
        self.repo
            .get_toko(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("toko {id}")))
    }

    pub async fn update(
        &self,
        id: i64,
        user_id: i64,
        patch: TokoUpdateRequest,
    ) -> Result<Toko, AppError> {
        let toko = self.get(id).await?;
        if toko.id_user != user_id {
            return Err(AppError::Forbidden(format!("toko {id} belongs to another user")));
        }
        self.repo
            .update_toko(id, patch)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("toko {id}")))
    }
}
