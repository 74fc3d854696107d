use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokoku_types::domain::category::{Category, CategorySummary};
use tokoku_types::domain::destination::{Destination, DestinationPatch, NewDestination};
use tokoku_types::domain::product::{
    Product, ProductDetail, ProductDraft, ProductFilter, ProductPhoto,
};
use tokoku_types::domain::toko::{NewToko, Toko, TokoSummary, TokoUpdateRequest};
use tokoku_types::domain::transaction::{
    DetailTransaction, LogProduk, NewTransaction, SnapshotProduct, Transaction, TransactionLine,
    TransactionView,
};
use tokoku_types::domain::user::{NewUser, ProfileUpdate, User};
use tokoku_types::ports::category_repository::CategoryRepository;
use tokoku_types::ports::destination_repository::DestinationRepository;
use tokoku_types::ports::product_repository::ProductRepository;
use tokoku_types::ports::toko_repository::TokoRepository;
use tokoku_types::ports::transaction_repository::{CheckoutError, TransactionRepository};
use tokoku_types::ports::user_repository::UserRepository;
use tokoku_types::ports::RepoError;

#[derive(Default)]
struct Sequences {
    user: AtomicI64,
    toko: AtomicI64,
    category: AtomicI64,
    product: AtomicI64,
    photo: AtomicI64,
    destination: AtomicI64,
    trx: AtomicI64,
    log: AtomicI64,
    detail: AtomicI64,
}

fn next_id(seq: &AtomicI64) -> i64 {
    seq.fetch_add(1, Ordering::SeqCst) + 1
}

#[derive(Default)]
struct Tables {
    users: DashMap<i64, User>,
    tokos: DashMap<i64, Toko>,
    categories: DashMap<i64, Category>,
    products: DashMap<i64, Product>,
    photos: DashMap<i64, ProductPhoto>,
    destinations: DashMap<i64, Destination>,
    transactions: DashMap<i64, Transaction>,
    logs: DashMap<i64, LogProduk>,
    details: DashMap<i64, DetailTransaction>,
    seq: Sequences,
    /// Held by every multi-row write so checks and writes are atomic.
    write_lock: Mutex<()>,
}

#[derive(Clone, Default)]
pub struct InMemoryRepo {
    tables: Arc<Tables>,
}

impl InMemoryRepo {
    pub fn new() -> Self {
        Self::default()
    }

    fn photos_of(&self, id_produk: i64) -> Vec<ProductPhoto> {
        let mut photos: Vec<ProductPhoto> = self
            .tables
            .photos
            .iter()
            .filter(|p| p.id_produk == id_produk)
            .map(|p| p.value().clone())
            .collect();
        photos.sort_by_key(|p| p.id);
        photos
    }

    fn insert_photos(&self, id_produk: i64, urls: &[String]) {
        for url in urls {
            let id = next_id(&self.tables.seq.photo);
            self.tables.photos.insert(
                id,
                ProductPhoto {
                    id,
                    id_produk,
                    url: url.clone(),
                },
            );
        }
    }

    fn toko_summary(&self, id: i64) -> Option<TokoSummary> {
        self.tables.tokos.get(&id).map(|t| t.summary())
    }

    fn category_summary(&self, id: i64) -> Option<CategorySummary> {
        self.tables.categories.get(&id).map(|c| c.summary())
    }

    fn detail(&self, product: Product) -> ProductDetail {
        ProductDetail {
            toko: self.toko_summary(product.id_toko),
            category: self.category_summary(product.id_category),
            photos: self.photos_of(product.id),
            product,
        }
    }

    fn view(&self, trx: Transaction) -> TransactionView {
        let mut details: Vec<DetailTransaction> = self
            .tables
            .details
            .iter()
            .filter(|d| d.id_trx == trx.id)
            .map(|d| d.value().clone())
            .collect();
        details.sort_by_key(|d| d.id);

        let detail_trx = details
            .into_iter()
            .filter_map(|d| {
                let log = self.tables.logs.get(&d.id_log_produk)?.clone();
                let category = self
                    .category_summary(log.id_category)
                    .unwrap_or(CategorySummary {
                        id: log.id_category,
                        nama_category: String::new(),
                    });
                let toko = self.toko_summary(d.id_toko).unwrap_or(TokoSummary {
                    id: d.id_toko,
                    nama_toko: String::new(),
                    url_foto: String::new(),
                });
                Some(TransactionLine {
                    product: SnapshotProduct {
                        id: log.id,
                        id_produk: log.id_produk,
                        photos: self.photos_of(log.id_produk),
                        nama_produk: log.nama_produk,
                        slug: log.slug,
                        harga_reseller: log.harga_reseller,
                        harga_konsumen: log.harga_konsumen,
                        deskripsi: log.deskripsi,
                        category,
                    },
                    toko,
                    kuantitas: d.kuantitas,
                    harga_total: d.harga_total,
                })
            })
            .collect();

        TransactionView {
            id: trx.id,
            harga_total: trx.harga_total,
            alamat_kirim: self
                .tables
                .destinations
                .get(&trx.alamat_pengiriman)
                .map(|d| d.clone()),
            kode_invoice: trx.kode_invoice,
            method_bayar: trx.metode_bayar,
            created_at: trx.created_at,
            detail_trx,
        }
    }

    /// Caller holds `write_lock`.
    fn insert_user(&self, user: NewUser) -> Result<User, RepoError> {
        if self.contact_taken(Some(&user.email), Some(&user.no_telp), 0) {
            return Err(RepoError::Conflict("email or phone already registered".into()));
        }
        let now = Utc::now();
        let id = next_id(&self.tables.seq.user);
        let user = User {
            id,
            nama: user.nama,
            email: user.email,
            no_telp: user.no_telp,
            kata_sandi: user.kata_sandi,
            tanggal_lahir: user.tanggal_lahir,
            jenis_kelamin: user.jenis_kelamin,
            tentang: user.tentang,
            pekerjaan: user.pekerjaan,
            id_provinsi: user.id_provinsi,
            id_kota: user.id_kota,
            is_admin: user.is_admin,
            created_at: now,
            updated_at: now,
        };
        self.tables.users.insert(id, user.clone());
        Ok(user)
    }

    fn insert_toko(&self, toko: NewToko) -> Result<Toko, RepoError> {
        if !self.tables.users.contains_key(&toko.id_user) {
            return Err(RepoError::Conflict(format!("user {} missing", toko.id_user)));
        }
        let now = Utc::now();
        let id = next_id(&self.tables.seq.toko);
        let toko = Toko {
            id,
            id_user: toko.id_user,
            nama_toko: toko.nama_toko,
            url_foto: toko.url_foto,
            created_at: now,
            updated_at: now,
        };
        self.tables.tokos.insert(id, toko.clone());
        Ok(toko)
    }

    fn contact_taken(&self, email: Option<&str>, no_telp: Option<&str>, except: i64) -> bool {
        self.tables.users.iter().any(|u| {
            u.id != except
                && (email.is_some_and(|e| u.email == e) || no_telp.is_some_and(|p| u.no_telp == p))
        })
    }
}

#[async_trait]
impl UserRepository for InMemoryRepo {
    async fn create_user(&self, user: NewUser) -> Result<User, RepoError> {
        let _guard = self.tables.write_lock.lock().await;
        self.insert_user(user)
    }

    async fn create_user_with_toko(&self, user: NewUser) -> Result<(User, Toko), RepoError> {
        let _guard = self.tables.write_lock.lock().await;
        let user = self.insert_user(user)?;
        let toko = self.insert_toko(NewToko::default_for(user.id, &user.nama))?;
        Ok((user, toko))
    }

    async fn get_user(&self, id: i64) -> Result<Option<User>, RepoError> {
        Ok(self.tables.users.get(&id).map(|u| u.clone()))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        Ok(self
            .tables
            .users
            .iter()
            .find(|u| u.email == email)
            .map(|u| u.value().clone()))
    }

    async fn find_users_by_email_or_phone(
        &self,
        email: &str,
        no_telp: &str,
    ) -> Result<Vec<User>, RepoError> {
        Ok(self
            .tables
            .users
            .iter()
            .filter(|u| u.email == email || u.no_telp == no_telp)
            .map(|u| u.value().clone())
            .collect())
    }

    async fn update_user(
        &self,
        id: i64,
        update: ProfileUpdate,
    ) -> Result<Option<User>, RepoError> {
        let _guard = self.tables.write_lock.lock().await;
        if self.contact_taken(update.email.as_deref(), update.no_telp.as_deref(), id) {
            return Err(RepoError::Conflict("email or phone already registered".into()));
        }
        if let Some(mut u) = self.tables.users.get_mut(&id) {
            u.apply(&update);
            return Ok(Some(u.clone()));
        }
        Ok(None)
    }
}

#[async_trait]
impl TokoRepository for InMemoryRepo {
    async fn create_toko(&self, toko: NewToko) -> Result<Toko, RepoError> {
        self.insert_toko(toko)
    }

    async fn list_toko(&self) -> Result<Vec<Toko>, RepoError> {
        let mut list: Vec<Toko> = self.tables.tokos.iter().map(|t| t.value().clone()).collect();
        list.sort_by_key(|t| t.id);
        Ok(list)
    }

    async fn list_toko_by_user(&self, id_user: i64) -> Result<Vec<Toko>, RepoError> {
        let mut list: Vec<Toko> = self
            .tables
            .tokos
            .iter()
            .filter(|t| t.id_user == id_user)
            .map(|t| t.value().clone())
            .collect();
        list.sort_by_key(|t| t.id);
        Ok(list)
    }

    async fn get_toko(&self, id: i64) -> Result<Option<Toko>, RepoError> {
        Ok(self.tables.tokos.get(&id).map(|t| t.clone()))
    }

    async fn update_toko(
        &self,
        id: i64,
        patch: TokoUpdateRequest,
    ) -> Result<Option<Toko>, RepoError> {
        if let Some(mut t) = self.tables.tokos.get_mut(&id) {
            t.apply(&patch);
            return Ok(Some(t.clone()));
        }
        Ok(None)
    }
}

#[async_trait]
impl CategoryRepository for InMemoryRepo {
    async fn create_category(&self, nama_category: String) -> Result<Category, RepoError> {
        let now = Utc::now();
        let id = next_id(&self.tables.seq.category);
        let category = Category {
            id,
            nama_category,
            created_at: now,
            updated_at: now,
        };
        self.tables.categories.insert(id, category.clone());
        Ok(category)
    }

    async fn list_categories(&self) -> Result<Vec<Category>, RepoError> {
        let mut list: Vec<Category> = self
            .tables
            .categories
            .iter()
            .map(|c| c.value().clone())
            .collect();
        list.sort_by_key(|c| c.id);
        Ok(list)
    }

    async fn get_category(&self, id: i64) -> Result<Option<Category>, RepoError> {
        Ok(self.tables.categories.get(&id).map(|c| c.clone()))
    }

    async fn update_category(
        &self,
        id: i64,
        nama_category: String,
    ) -> Result<Option<Category>, RepoError> {
        if let Some(mut c) = self.tables.categories.get_mut(&id) {
            c.nama_category = nama_category;
            c.updated_at = Utc::now();
            return Ok(Some(c.clone()));
        }
        Ok(None)
    }

    async fn delete_category(&self, id: i64) -> Result<bool, RepoError> {
        let _guard = self.tables.write_lock.lock().await;
        if self.tables.products.iter().any(|p| p.id_category == id) {
            return Err(RepoError::Conflict(format!("category {id} is in use")));
        }
        Ok(self.tables.categories.remove(&id).is_some())
    }
}

#[async_trait]
impl ProductRepository for InMemoryRepo {
    async fn create_product(
        &self,
        id_toko: i64,
        draft: ProductDraft,
    ) -> Result<Product, RepoError> {
        let _guard = self.tables.write_lock.lock().await;
        if !self.tables.tokos.contains_key(&id_toko) {
            return Err(RepoError::Conflict(format!("toko {id_toko} missing")));
        }
        if !self.tables.categories.contains_key(&draft.id_category) {
            return Err(RepoError::Conflict(format!(
                "category {} missing",
                draft.id_category
            )));
        }
        let now = Utc::now();
        let id = next_id(&self.tables.seq.product);
        let product = Product {
            id,
            id_toko,
            id_category: draft.id_category,
            nama_produk: draft.nama_produk,
            slug: draft.slug,
            harga_reseller: draft.harga_reseller,
            harga_konsumen: draft.harga_konsumen,
            stok: draft.stok,
            deskripsi: draft.deskripsi,
            created_at: now,
            updated_at: now,
        };
        self.tables.products.insert(id, product.clone());
        self.insert_photos(id, &draft.photos);
        Ok(product)
    }

    async fn update_product(
        &self,
        id: i64,
        id_toko: i64,
        draft: ProductDraft,
    ) -> Result<Option<Product>, RepoError> {
        let _guard = self.tables.write_lock.lock().await;
        if !self.tables.categories.contains_key(&draft.id_category) {
            return Err(RepoError::Conflict(format!(
                "category {} missing",
                draft.id_category
            )));
        }
        let updated = match self.tables.products.get_mut(&id) {
            Some(mut p) if p.id_toko == id_toko => {
                p.id_category = draft.id_category;
                p.nama_produk = draft.nama_produk;
                p.slug = draft.slug;
                p.harga_reseller = draft.harga_reseller;
                p.harga_konsumen = draft.harga_konsumen;
                p.stok = draft.stok;
                p.deskripsi = draft.deskripsi;
                p.updated_at = Utc::now();
                p.clone()
            }
            _ => return Ok(None),
        };
        if !draft.photos.is_empty() {
            self.tables.photos.retain(|_, p| p.id_produk != id);
            self.insert_photos(id, &draft.photos);
        }
        Ok(Some(updated))
    }

    async fn delete_product(&self, id: i64, id_toko: i64) -> Result<bool, RepoError> {
        let _guard = self.tables.write_lock.lock().await;
        let owned = self
            .tables
            .products
            .get(&id)
            .is_some_and(|p| p.id_toko == id_toko);
        if !owned {
            return Ok(false);
        }
        self.tables.photos.retain(|_, p| p.id_produk != id);
        Ok(self.tables.products.remove(&id).is_some())
    }

    async fn get_product(&self, id: i64) -> Result<Option<ProductDetail>, RepoError> {
        let product = self.tables.products.get(&id).map(|p| p.clone());
        Ok(product.map(|p| self.detail(p)))
    }

    async fn list_products(
        &self,
        filter: &ProductFilter,
    ) -> Result<(Vec<ProductDetail>, u64), RepoError> {
        let mut matching: Vec<Product> = self
            .tables
            .products
            .iter()
            .filter(|p| filter.matches(p.value()))
            .map(|p| p.value().clone())
            .collect();
        matching.sort_by_key(|p| p.id);
        let total = matching.len() as u64;
        let page = matching
            .into_iter()
            .skip(filter.offset() as usize)
            .take(filter.limit() as usize)
            .map(|p| self.detail(p))
            .collect();
        Ok((page, total))
    }
}

#[async_trait]
impl DestinationRepository for InMemoryRepo {
    async fn create_destination(
        &self,
        id_user: i64,
        destination: NewDestination,
    ) -> Result<Destination, RepoError> {
        let now = Utc::now();
        let id = next_id(&self.tables.seq.destination);
        let destination = Destination {
            id,
            id_user,
            judul_alamat: destination.judul_alamat,
            nama_penerima: destination.nama_penerima,
            no_telp: destination.no_telp,
            detail_alamat: destination.detail_alamat,
            created_at: now,
            updated_at: now,
        };
        self.tables.destinations.insert(id, destination.clone());
        Ok(destination)
    }

    async fn get_destination(
        &self,
        id: i64,
        id_user: i64,
    ) -> Result<Option<Destination>, RepoError> {
        Ok(self
            .tables
            .destinations
            .get(&id)
            .filter(|d| d.id_user == id_user)
            .map(|d| d.clone()))
    }

    async fn list_destinations(&self, id_user: i64) -> Result<Vec<Destination>, RepoError> {
        let mut list: Vec<Destination> = self
            .tables
            .destinations
            .iter()
            .filter(|d| d.id_user == id_user)
            .map(|d| d.value().clone())
            .collect();
        list.sort_by_key(|d| d.id);
        Ok(list)
    }

    async fn update_destination(
        &self,
        id: i64,
        id_user: i64,
        patch: DestinationPatch,
    ) -> Result<Option<Destination>, RepoError> {
        match self.tables.destinations.get_mut(&id) {
            Some(mut d) if d.id_user == id_user => {
                d.apply(&patch);
                Ok(Some(d.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn delete_destination(&self, id: i64, id_user: i64) -> Result<bool, RepoError> {
        let _guard = self.tables.write_lock.lock().await;
        let owned = self
            .tables
            .destinations
            .get(&id)
            .is_some_and(|d| d.id_user == id_user);
        if !owned {
            return Ok(false);
        }
        if self
            .tables
            .transactions
            .iter()
            .any(|t| t.alamat_pengiriman == id)
        {
            return Err(RepoError::Conflict(format!(
                "destination {id} is used by a transaction"
            )));
        }
        Ok(self.tables.destinations.remove(&id).is_some())
    }
}

#[async_trait]
impl TransactionRepository for InMemoryRepo {
    async fn checkout(&self, order: NewTransaction) -> Result<Transaction, CheckoutError> {
        let _guard = self.tables.write_lock.lock().await;

        if !self
            .tables
            .destinations
            .contains_key(&order.alamat_pengiriman)
        {
            return Err(RepoError::Conflict(format!(
                "destination {} missing",
                order.alamat_pengiriman
            ))
            .into());
        }

        // Validate every line against a staged copy of the stock before
        // touching any table, so a failure leaves nothing behind.
        let mut stock: HashMap<i64, i64> = HashMap::new();
        let mut lines = Vec::with_capacity(order.items.len());
        for item in &order.items {
            let product = self
                .tables
                .products
                .get(&item.product_id)
                .map(|p| p.clone())
                .ok_or(CheckoutError::ProductNotFound(item.product_id))?;
            let owner = self.tables.tokos.get(&product.id_toko).map(|t| t.id_user);
            if owner == Some(order.id_user) {
                return Err(CheckoutError::OwnProduct(product.id));
            }
            let available = *stock.get(&product.id).unwrap_or(&product.stok);
            if available < item.kuantitas {
                return Err(CheckoutError::InsufficientStock {
                    product_id: product.id,
                    requested: item.kuantitas,
                    available,
                });
            }
            let subtotal = product
                .harga_konsumen
                .checked_mul(item.kuantitas)
                .ok_or_else(|| RepoError::DbError("amount overflow".into()))?;
            stock.insert(product.id, available - item.kuantitas);
            lines.push((product, item.kuantitas, subtotal));
        }
        let harga_total = lines
            .iter()
            .try_fold(0i64, |acc, (_, _, sub)| acc.checked_add(*sub))
            .ok_or_else(|| RepoError::DbError("amount overflow".into()))?;

        let now = Utc::now();
        for (id, remaining) in stock {
            if let Some(mut p) = self.tables.products.get_mut(&id) {
                p.stok = remaining;
                p.updated_at = now;
            }
        }

        let trx_id = next_id(&self.tables.seq.trx);
        for (product, kuantitas, subtotal) in lines {
            let log_id = next_id(&self.tables.seq.log);
            self.tables.logs.insert(
                log_id,
                LogProduk {
                    id: log_id,
                    id_produk: product.id,
                    id_toko: product.id_toko,
                    id_category: product.id_category,
                    nama_produk: product.nama_produk,
                    slug: product.slug,
                    harga_reseller: product.harga_reseller,
                    harga_konsumen: product.harga_konsumen,
                    deskripsi: product.deskripsi,
                    created_at: now,
                },
            );
            let detail_id = next_id(&self.tables.seq.detail);
            self.tables.details.insert(
                detail_id,
                DetailTransaction {
                    id: detail_id,
                    id_trx: trx_id,
                    id_log_produk: log_id,
                    id_toko: product.id_toko,
                    kuantitas,
                    harga_total: subtotal,
                },
            );
        }

        let trx = Transaction {
            id: trx_id,
            id_user: order.id_user,
            alamat_pengiriman: order.alamat_pengiriman,
            harga_total,
            kode_invoice: order.kode_invoice,
            metode_bayar: order.metode_bayar,
            created_at: now,
        };
        self.tables.transactions.insert(trx_id, trx.clone());
        Ok(trx)
    }

    async fn list_transactions(&self, id_user: i64) -> Result<Vec<TransactionView>, RepoError> {
        let mut list: Vec<Transaction> = self
            .tables
            .transactions
            .iter()
            .filter(|t| t.id_user == id_user)
            .map(|t| t.value().clone())
            .collect();
        list.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(list.into_iter().map(|t| self.view(t)).collect())
    }

    async fn get_transaction(
        &self,
        id: i64,
        id_user: i64,
    ) -> Result<Option<TransactionView>, RepoError> {
        let trx = self
            .tables
            .transactions
            .get(&id)
            .filter(|t| t.id_user == id_user)
            .map(|t| t.clone());
        Ok(trx.map(|t| self.view(t)))
    }
}
