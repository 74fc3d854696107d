pub mod category_repository;
pub mod destination_repository;
pub mod product_repository;
pub mod region_directory;
pub mod toko_repository;
pub mod transaction_repository;
pub mod user_repository;

use category_repository::CategoryRepository;
use destination_repository::DestinationRepository;
use product_repository::ProductRepository;
use toko_repository::TokoRepository;
use transaction_repository::TransactionRepository;
use user_repository::UserRepository;

#[derive(thiserror::Error, Debug)]
pub enum RepoError {
    #[error("db error: {0}")]
    DbError(String),

    /// A uniqueness or foreign-key rule would be broken.
    #[error("conflict: {0}")]
    Conflict(String),
}

/// Every repository the marketplace needs, implemented by one backend.
pub trait MarketStore:
    UserRepository
    + TokoRepository
    + CategoryRepository
    + ProductRepository
    + DestinationRepository
    + TransactionRepository
{
}

impl<T> MarketStore for T where
    T: UserRepository
        + TokoRepository
        + CategoryRepository
        + ProductRepository
        + DestinationRepository
        + TransactionRepository
{
}
