use std::sync::Arc;

use tokoku_types::domain::page::Page;
use tokoku_types::domain::product::{ProductDetail, ProductFilter, ProductRequest};
use tokoku_types::domain::toko::Toko;
use tokoku_types::ports::MarketStore;

use crate::errors::AppError;

pub struct ProductService<R: MarketStore> {
    repo: Arc<R>,
}

impl<R: MarketStore> ProductService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Creates the product in the caller's toko and returns its id.
    pub async fn create(&self, user_id: i64, req: ProductRequest) -> Result<i64, AppError> {
        let draft = req.into_draft().map_err(AppError::bad_request)?;
        let toko = self.own_toko(user_id).await?;
        if self.repo.get_category(draft.id_category).await?.is_none() {
            return Err(AppError::BadRequest(format!(
                "category {} does not exist",
                draft.id_category
            )));
        }
        let product = self.repo.create_product(toko.id, draft).await?;
        tracing::info!(product_id = product.id, toko_id = toko.id, "product created");
        Ok(product.id)
    }

    pub async fn update(
        &self,
        id: i64,
        user_id: i64,
        req: ProductRequest,
    ) -> Result<ProductDetail, AppError> {
        let draft = req.into_draft().map_err(AppError::bad_request)?;
        let toko = self.own_toko(user_id).await?;
        if self.repo.get_category(draft.id_category).await?.is_none() {
            return Err(AppError::BadRequest(format!(
                "category {} does not exist",
                draft.id_category
            )));
        }
        if self.repo.update_product(id, toko.id, draft).await?.is_none() {
            return Err(AppError::NotFound(format!("product {id} in your toko")));
        }
        self.get(id).await
    }

    pub async fn delete(&self, id: i64, user_id: i64) -> Result<(), AppError> {
        let toko = self.own_toko(user_id).await?;
        if self.repo.delete_product(id, toko.id).await? {
            Ok(())
        } else {
            Err(AppError::NotFound(format!("product {id} in your toko")))
        }
    }

    pub async fn list(&self, filter: ProductFilter) -> Result<Page<ProductDetail>, AppError> {
        if let (Some(min), Some(max)) = (filter.min_harga, filter.max_harga) {
            if min > max {
                return Err(AppError::BadRequest(
                    "min_harga must not exceed max_harga".into(),
                ));
            }
        }
        let (data, total) = self.repo.list_products(&filter).await?;
        Ok(Page::new(data, total, filter.page(), filter.limit()))
    }

    pub async fn get(&self, id: i64) -> Result<ProductDetail, AppError> {
        self.repo
            .get_product(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("product {id}")))
    }

    async fn own_toko(&self, user_id: i64) -> Result<Toko, AppError> {
        self.repo
            .list_toko_by_user(user_id)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound(format!("no toko for user {user_id}")))
    }
}
