use async_trait::async_trait;

use super::RepoError;
use crate::domain::category::Category;

#[async_trait]
pub trait CategoryRepository: Send + Sync + 'static {
    async fn create_category(&self, nama_category: String) -> Result<Category, RepoError>;
    async fn list_categories(&self) -> Result<Vec<Category>, RepoError>;
    async fn get_category(&self, id: i64) -> Result<Option<Category>, RepoError>;
    async fn update_category(
        &self,
        id: i64,
        nama_category: String,
    ) -> Result<Option<Category>, RepoError>;
    /// [`RepoError::Conflict`] while products still use the category.
    async fn delete_category(&self, id: i64) -> Result<bool, RepoError>;
}
