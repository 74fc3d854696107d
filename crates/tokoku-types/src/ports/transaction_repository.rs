use async_trait::async_trait;

use super::RepoError;
use crate::domain::transaction::{NewTransaction, Transaction, TransactionView};

#[derive(thiserror::Error, Debug)]
pub enum CheckoutError {
    #[error("product {0} not found")]
    ProductNotFound(i64),

    #[error("product {0} belongs to the buyer")]
    OwnProduct(i64),

    #[error("insufficient stock for product {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: i64,
        requested: i64,
        available: i64,
    },

    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[async_trait]
pub trait TransactionRepository: Send + Sync + 'static {
    /// Runs the whole checkout as one unit: header, per item stock decrement,
    /// product snapshot and line, then the total. Nothing is persisted when
    /// any step fails.
    async fn checkout(&self, order: NewTransaction) -> Result<Transaction, CheckoutError>;
    /// Newest first.
    async fn list_transactions(&self, id_user: i64) -> Result<Vec<TransactionView>, RepoError>;
    async fn get_transaction(
        &self,
        id: i64,
        id_user: i64,
    ) -> Result<Option<TransactionView>, RepoError>;
}
