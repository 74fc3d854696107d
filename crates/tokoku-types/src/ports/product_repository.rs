use async_trait::async_trait;

use super::RepoError;
use crate::domain::product::{Product, ProductDetail, ProductDraft, ProductFilter};

#[async_trait]
pub trait ProductRepository: Send + Sync + 'static {
    async fn create_product(&self, id_toko: i64, draft: ProductDraft)
        -> Result<Product, RepoError>;
    /// Only touches a product that belongs to `id_toko`. Photos are replaced
    /// when the draft carries any.
    async fn update_product(
        &self,
        id: i64,
        id_toko: i64,
        draft: ProductDraft,
    ) -> Result<Option<Product>, RepoError>;
    /// Removes the product and its photos when it belongs to `id_toko`.
    async fn delete_product(&self, id: i64, id_toko: i64) -> Result<bool, RepoError>;
    async fn get_product(&self, id: i64) -> Result<Option<ProductDetail>, RepoError>;
    /// One page of matching products (ordered by id) and the total match count.
    async fn list_products(
        &self,
        filter: &ProductFilter,
    ) -> Result<(Vec<ProductDetail>, u64), RepoError>;
}
