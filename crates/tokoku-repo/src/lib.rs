#[cfg(not(any(feature = "memory", feature = "sqlite")))]
compile_error!("Enable a repo feature: `memory` or `sqlite`.");

use tokoku_types::domain::category::Category;
use tokoku_types::domain::destination::{Destination, DestinationPatch, NewDestination};
use tokoku_types::domain::product::{Product, ProductDetail, ProductDraft, ProductFilter};
use tokoku_types::domain::toko::{NewToko, Toko, TokoUpdateRequest};
use tokoku_types::domain::transaction::{NewTransaction, Transaction, TransactionView};
use tokoku_types::domain::user::{NewUser, ProfileUpdate, User};
use tokoku_types::ports::category_repository::CategoryRepository;
use tokoku_types::ports::destination_repository::DestinationRepository;
use tokoku_types::ports::product_repository::ProductRepository;
use tokoku_types::ports::toko_repository::TokoRepository;
use tokoku_types::ports::transaction_repository::{CheckoutError, TransactionRepository};
use tokoku_types::ports::user_repository::UserRepository;
use tokoku_types::ports::RepoError;

#[cfg(feature = "memory")]
pub mod memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://tokoku.db";

/// URL that selects the in-memory store when both backends are compiled in.
pub const MEMORY_URL: &str = "memory://";

pub enum Repo {
    #[cfg(feature = "memory")]
    Memory(memory::InMemoryRepo),
    #[cfg(feature = "sqlite")]
    Sqlite(sqlite::SqliteRepo),
}

pub async fn build_repo(url: Option<&str>, max_connections: u32) -> anyhow::Result<Repo> {
    Repo::build_repo(url, max_connections).await
}

impl Repo {
    #[cfg(all(feature = "memory", not(feature = "sqlite")))]
    pub async fn build_repo(_: Option<&str>, _: u32) -> anyhow::Result<Self> {
        tracing::info!("using in-memory store");
        Ok(Self::Memory(memory::InMemoryRepo::new()))
    }

    #[cfg(all(feature = "sqlite", not(feature = "memory")))]
    pub async fn build_repo(database_url: Option<&str>, max_connections: u32) -> anyhow::Result<Self> {
        let url = database_url.unwrap_or(DEFAULT_DATABASE_URL);
        let sqlite = sqlite::SqliteRepo::new(url, max_connections).await?;
        Ok(Self::Sqlite(sqlite))
    }

    // Both features: sqlite unless the caller asks for memory explicitly.
    #[cfg(all(feature = "sqlite", feature = "memory"))]
    pub async fn build_repo(database_url: Option<&str>, max_connections: u32) -> anyhow::Result<Self> {
        match database_url {
            Some(MEMORY_URL) => {
                tracing::info!("using in-memory store");
                Ok(Self::Memory(memory::InMemoryRepo::new()))
            }
            other => {
                let url = other.unwrap_or(DEFAULT_DATABASE_URL);
                let sqlite = sqlite::SqliteRepo::new(url, max_connections).await?;
                Ok(Self::Sqlite(sqlite))
            }
        }
    }

    pub fn backend(&self) -> &'static str {
        match self {
            #[cfg(feature = "memory")]
            Self::Memory(_) => "memory",
            #[cfg(feature = "sqlite")]
            Self::Sqlite(_) => "sqlite",
        }
    }
}

/// Forwards a call to whichever backend is active.
macro_rules! delegate {
    ($self:ident, $method:ident($($arg:expr),*)) => {
        match $self {
            #[cfg(feature = "memory")]
            Repo::Memory(r) => r.$method($($arg),*).await,
            #[cfg(feature = "sqlite")]
            Repo::Sqlite(r) => r.$method($($arg),*).await,
        }
    };
}

#[async_trait::async_trait]
impl UserRepository for Repo {
    async fn create_user(&self, user: NewUser) -> Result<User, RepoError> {
        delegate!(self, create_user(user))
    }

    async fn create_user_with_toko(&self, user: NewUser) -> Result<(User, Toko), RepoError> {
        delegate!(self, create_user_with_toko(user))
    }

    async fn get_user(&self, id: i64) -> Result<Option<User>, RepoError> {
        delegate!(self, get_user(id))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        delegate!(self, find_user_by_email(email))
    }

    async fn find_users_by_email_or_phone(
        &self,
        email: &str,
        no_telp: &str,
    ) -> Result<Vec<User>, RepoError> {
        delegate!(self, find_users_by_email_or_phone(email, no_telp))
    }

    async fn update_user(
        &self,
        id: i64,
        update: ProfileUpdate,
    ) -> Result<Option<User>, RepoError> {
        delegate!(self, update_user(id, update))
    }
}

#[async_trait::async_trait]
impl TokoRepository for Repo {
    async fn create_toko(&self, toko: NewToko) -> Result<Toko, RepoError> {
        delegate!(self, create_toko(toko))
    }

    async fn list_toko(&self) -> Result<Vec<Toko>, RepoError> {
        delegate!(self, list_toko())
    }

    async fn list_toko_by_user(&self, id_user: i64) -> Result<Vec<Toko>, RepoError> {
        delegate!(self, list_toko_by_user(id_user))
    }

    async fn get_toko(&self, id: i64) -> Result<Option<Toko>, RepoError> {
        delegate!(self, get_toko(id))
    }

    async fn update_toko(
        &self,
        id: i64,
        patch: TokoUpdateRequest,
    ) -> Result<Option<Toko>, RepoError> {
        delegate!(self, update_toko(id, patch))
    }
}

#[async_trait::async_trait]
impl CategoryRepository for Repo {
    async fn create_category(&self, nama_category: String) -> Result<Category, RepoError> {
        delegate!(self, create_category(nama_category))
    }

    async fn list_categories(&self) -> Result<Vec<Category>, RepoError> {
        delegate!(self, list_categories())
    }

    async fn get_category(&self, id: i64) -> Result<Option<Category>, RepoError> {
        delegate!(self, get_category(id))
    }

    async fn update_category(
        &self,
        id: i64,
        nama_category: String,
    ) -> Result<Option<Category>, RepoError> {
        delegate!(self, update_category(id, nama_category))
    }

    async fn delete_category(&self, id: i64) -> Result<bool, RepoError> {
        delegate!(self, delete_category(id))
    }
}

#[async_trait::async_trait]
impl ProductRepository for Repo {
    async fn create_product(
        &self,
        id_toko: i64,
        draft: ProductDraft,
    ) -> Result<Product, RepoError> {
        delegate!(self, create_product(id_toko, draft))
    }

    async fn update_product(
        &self,
        id: i64,
        id_toko: i64,
        draft: ProductDraft,
    ) -> Result<Option<Product>, RepoError> {
        delegate!(self, update_product(id, id_toko, draft))
    }

    async fn delete_product(&self, id: i64, id_toko: i64) -> Result<bool, RepoError> {
        delegate!(self, delete_product(id, id_toko))
    }

    async fn get_product(&self, id: i64) -> Result<Option<ProductDetail>, RepoError> {
        delegate!(self, get_product(id))
    }

    async fn list_products(
        &self,
        filter: &ProductFilter,
    ) -> Result<(Vec<ProductDetail>, u64), RepoError> {
        delegate!(self, list_products(filter))
    }
}

#[async_trait::async_trait]
impl DestinationRepository for Repo {
    async fn create_destination(
        &self,
        id_user: i64,
        destination: NewDestination,
    ) -> Result<Destination, RepoError> {
        delegate!(self, create_destination(id_user, destination))
    }

    async fn get_destination(
        &self,
        id: i64,
        id_user: i64,
    ) -> Result<Option<Destination>, RepoError> {
        delegate!(self, get_destination(id, id_user))
    }

    async fn list_destinations(&self, id_user: i64) -> Result<Vec<Destination>, RepoError> {
        delegate!(self, list_destinations(id_user))
    }

    async fn update_destination(
        &self,
        id: i64,
        id_user: i64,
        patch: DestinationPatch,
    ) -> Result<Option<Destination>, RepoError> {
        delegate!(self, update_destination(id, id_user, patch))
    }

    async fn delete_destination(&self, id: i64, id_user: i64) -> Result<bool, RepoError> {
        delegate!(self, delete_destination(id, id_user))
    }
}

#[async_trait::async_trait]
impl TransactionRepository for Repo {
    async fn checkout(&self, order: NewTransaction) -> Result<Transaction, CheckoutError> {
        delegate!(self, checkout(order))
    }

    async fn list_transactions(&self, id_user: i64) -> Result<Vec<TransactionView>, RepoError> {
        delegate!(self, list_transactions(id_user))
    }

    async fn get_transaction(
        &self,
        id: i64,
        id_user: i64,
    ) -> Result<Option<TransactionView>, RepoError> {
        delegate!(self, get_transaction(id, id_user))
    }
}
