use std::sync::Arc;

use axum::extract::FromRef;
use tokoku_types::ports::region_directory::RegionDirectory;
use tokoku_types::ports::MarketStore;

use crate::application::auth_service::AuthService;
use crate::application::category_service::CategoryService;
use crate::application::destination_service::DestinationService;
use crate::application::product_service::ProductService;
use crate::application::region_service::RegionService;
use crate::application::security::{JwtService, PasswordHasher};
use crate::application::toko_service::TokoService;
use crate::application::transaction_service::TransactionService;
use crate::application::user_service::UserService;

/// Everything the handlers need, shared across requests.
pub struct AppState<R: MarketStore, D: RegionDirectory> {
    pub auth: Arc<AuthService<R, D>>,
    pub users: Arc<UserService<R, D>>,
    pub regions: Arc<RegionService<D>>,
    pub toko: Arc<TokoService<R>>,
    pub categories: Arc<CategoryService<R>>,
    pub products: Arc<ProductService<R>>,
    pub destinations: Arc<DestinationService<R>>,
    pub transactions: Arc<TransactionService<R>>,
    pub jwt: Arc<JwtService>,
}

impl<R: MarketStore, D: RegionDirectory> AppState<R, D> {
    pub fn new(repo: Arc<R>, directory: Arc<D>, jwt: JwtService, hasher: PasswordHasher) -> Self {
        let jwt = Arc::new(jwt);
        let regions = RegionService::new(directory);
        Self {
            auth: Arc::new(AuthService::new(
                repo.clone(),
                regions.clone(),
                jwt.clone(),
                hasher,
            )),
            users: Arc::new(UserService::new(repo.clone(), regions.clone(), hasher)),
            regions: Arc::new(regions),
            toko: Arc::new(TokoService::new(repo.clone())),
            categories: Arc::new(CategoryService::new(repo.clone())),
            products: Arc::new(ProductService::new(repo.clone())),
            destinations: Arc::new(DestinationService::new(repo.clone())),
            transactions: Arc::new(TransactionService::new(repo)),
            jwt,
        }
    }
}

// Manual impl: a derive would demand `R: Clone` and `D: Clone`.
impl<R: MarketStore, D: RegionDirectory> Clone for AppState<R, D> {
    fn clone(&self) -> Self {
        Self {
            auth: self.auth.clone(),
            users: self.users.clone(),
            regions: self.regions.clone(),
            toko: self.toko.clone(),
            categories: self.categories.clone(),
            products: self.products.clone(),
            destinations: self.destinations.clone(),
            transactions: self.transactions.clone(),
            jwt: self.jwt.clone(),
        }
    }
}

impl<R: MarketStore, D: RegionDirectory> FromRef<AppState<R, D>> for Arc<JwtService> {
    fn from_ref(state: &AppState<R, D>) -> Self {
        state.jwt.clone()
    }
}
