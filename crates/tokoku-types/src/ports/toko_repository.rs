use async_trait::async_trait;

use super::RepoError;
use crate::domain::toko::{NewToko, Toko, TokoUpdateRequest};

#[async_trait]
pub trait TokoRepository: Send + Sync + 'static {
    async fn create_toko(&self, toko: NewToko) -> Result<Toko, RepoError>;
    async fn list_toko(&self) -> Result<Vec<Toko>, RepoError>;
    async fn list_toko_by_user(&self, id_user: i64) -> Result<Vec<Toko>, RepoError>;
    async fn get_toko(&self, id: i64) -> Result<Option<Toko>, RepoError>;
    async fn update_toko(
        &self,
        id: i64,
        patch: TokoUpdateRequest,
    ) -> Result<Option<Toko>, RepoError>;
}
