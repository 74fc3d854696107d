use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::category::CategorySummary;
use super::destination::Destination;
use super::product::ProductPhoto;
use super::toko::TokoSummary;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Ovo,
    Dana,
    Gopay,
    Cod,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Ovo => "ovo",
            PaymentMethod::Dana => "dana",
            PaymentMethod::Gopay => "gopay",
            PaymentMethod::Cod => "cod",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ovo" => Ok(PaymentMethod::Ovo),
            "dana" => Ok(PaymentMethod::Dana),
            "gopay" => Ok(PaymentMethod::Gopay),
            "cod" => Ok(PaymentMethod::Cod),
            other => anyhow::bail!("method_bayar must be one of ovo, dana, gopay, cod (got {other:?})"),
        }
    }
}

/// Transaction header ("trx").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub id_user: i64,
    pub alamat_pengiriman: i64,
    pub harga_total: i64,
    pub kode_invoice: String,
    pub metode_bayar: PaymentMethod,
    pub created_at: DateTime<Utc>,
}

/// Copy of a product as it was when it was bought. Never updated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogProduk {
    pub id: i64,
    pub id_produk: i64,
    pub id_toko: i64,
    pub id_category: i64,
    pub nama_produk: String,
    pub slug: String,
    pub harga_reseller: i64,
    pub harga_konsumen: i64,
    pub deskripsi: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailTransaction {
    pub id: i64,
    pub id_trx: i64,
    pub id_log_produk: i64,
    pub id_toko: i64,
    pub kuantitas: i64,
    pub harga_total: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrxItemRequest {
    pub product_id: i64,
    pub kuantitas: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTrxRequest {
    pub method_bayar: String,
    pub alamat_kirim: i64,
    pub detail_trx: Vec<TrxItemRequest>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    pub product_id: i64,
    pub kuantitas: i64,
}

/// A checked checkout request, ready for the store to execute atomically.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub id_user: i64,
    pub alamat_pengiriman: i64,
    pub metode_bayar: PaymentMethod,
    pub kode_invoice: String,
    pub items: Vec<LineItem>,
}

impl CreateTrxRequest {
    pub fn into_new_transaction(
        self,
        id_user: i64,
        kode_invoice: String,
    ) -> anyhow::Result<NewTransaction> {
        let metode_bayar: PaymentMethod = self.method_bayar.parse()?;
        if self.alamat_kirim <= 0 {
            anyhow::bail!("alamat_kirim required");
        }
        if self.detail_trx.is_empty() {
            anyhow::bail!("detail_trx empty");
        }
        let mut items = Vec::with_capacity(self.detail_trx.len());
        for it in self.detail_trx {
            if it.product_id <= 0 {
                anyhow::bail!("product_id required");
            }
            if it.kuantitas < 1 {
                anyhow::bail!("kuantitas must be >= 1");
            }
            items.push(LineItem {
                product_id: it.product_id,
                kuantitas: it.kuantitas,
            });
        }
        Ok(NewTransaction {
            id_user,
            alamat_pengiriman: self.alamat_kirim,
            metode_bayar,
            kode_invoice,
            items,
        })
    }
}

/// Snapshot product as shown inside a transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotProduct {
    /// `log_produk` id.
    pub id: i64,
    pub id_produk: i64,
    pub nama_produk: String,
    pub slug: String,
    pub harga_reseller: i64,
    pub harga_konsumen: i64,
    pub deskripsi: String,
    pub category: CategorySummary,
    pub photos: Vec<ProductPhoto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionLine {
    pub product: SnapshotProduct,
    pub toko: TokoSummary,
    pub kuantitas: i64,
    pub harga_total: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionView {
    pub id: i64,
    pub harga_total: i64,
    pub kode_invoice: String,
    pub method_bayar: PaymentMethod,
    pub alamat_kirim: Option<Destination>,
    pub created_at: DateTime<Utc>,
    pub detail_trx: Vec<TransactionLine>,
}
