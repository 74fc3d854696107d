use std::sync::Arc;

use chrono::Utc;
use tokoku_types::domain::transaction::{CreateTrxRequest, TransactionView};
use tokoku_types::ports::MarketStore;
use uuid::Uuid;

use crate::errors::AppError;

pub struct TransactionService<R: MarketStore> {
    repo: Arc<R>,
}

/// `INV-<yyyymmddHHMMSS>-<8 hex>`.
pub fn new_invoice_code() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("INV-{}-{}", Utc::now().format("%Y%m%d%H%M%S"), &suffix[..8])
}

impl<R: MarketStore> TransactionService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Checks the request and the address, then hands the whole order to the
    /// store, which applies it atomically. Returns the new transaction id.
    pub async fn create(&self, user_id: i64, req: CreateTrxRequest) -> Result<i64, AppError> {
        let order = req
            .into_new_transaction(user_id, new_invoice_code())
            .map_err(AppError::bad_request)?;

        if self
            .repo
            .get_destination(order.alamat_pengiriman, user_id)
            .await?
            .is_none()
        {
            return Err(AppError::NotFound(format!(
                "alamat {}",
                order.alamat_pengiriman
            )));
        }

        let items = order.items.len();
        let trx = self.repo.checkout(order).await?;
        tracing::info!(
            trx_id = trx.id,
            user_id,
            items,
            harga_total = trx.harga_total,
            kode_invoice = %trx.kode_invoice,
            "transaction created"
        );
        Ok(trx.id)
    }

    pub async fn list(&self, user_id: i64) -> Result<Vec<TransactionView>, AppError> {
        Ok(self.repo.list_transactions(user_id).await?)
    }

    pub async fn get(&self, id: i64, user_id: i64) -> Result<TransactionView, AppError> {
        self.repo
            .get_transaction(id, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("transaction {id}")))
    }
}
