use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{FromRow, QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use std::str::FromStr;
use std::time::Duration;
use tokoku_types::domain::category::{Category, CategorySummary};
use tokoku_types::domain::destination::{Destination, DestinationPatch, NewDestination};
use tokoku_types::domain::product::{
    Product, ProductDetail, ProductDraft, ProductFilter, ProductPhoto,
};
use tokoku_types::domain::toko::{NewToko, Toko, TokoSummary, TokoUpdateRequest};
use tokoku_types::domain::transaction::{
    NewTransaction, PaymentMethod, SnapshotProduct, Transaction, TransactionLine, TransactionView,
};
use tokoku_types::domain::user::{NewUser, ProfileUpdate, User};
use tokoku_types::ports::category_repository::CategoryRepository;
use tokoku_types::ports::destination_repository::DestinationRepository;
use tokoku_types::ports::product_repository::ProductRepository;
use tokoku_types::ports::toko_repository::TokoRepository;
use tokoku_types::ports::transaction_repository::{CheckoutError, TransactionRepository};
use tokoku_types::ports::user_repository::UserRepository;
use tokoku_types::ports::RepoError;

const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct SqliteRepo {
    pool: SqlitePool,
}

fn db(e: sqlx::Error) -> RepoError {
    RepoError::DbError(e.to_string())
}

/// Constraint violations become `Conflict`, everything else stays a db error.
fn write_err(e: sqlx::Error) -> RepoError {
    match e.as_database_error() {
        Some(d) if d.is_unique_violation() || d.is_foreign_key_violation() => {
            RepoError::Conflict(d.message().to_string())
        }
        _ => db(e),
    }
}

fn parse_ts(value: &str) -> Result<DateTime<Utc>, RepoError> {
    Ok(DateTime::parse_from_rfc3339(value)
        .map_err(|e| RepoError::DbError(e.to_string()))?
        .with_timezone(&Utc))
}

fn parse_date(value: Option<String>) -> Result<Option<NaiveDate>, RepoError> {
    value
        .map(|v| {
            NaiveDate::parse_from_str(&v, DATE_FORMAT).map_err(|e| RepoError::DbError(e.to_string()))
        })
        .transpose()
}

fn parse_method(value: &str) -> Result<PaymentMethod, RepoError> {
    value
        .parse()
        .map_err(|e: anyhow::Error| RepoError::DbError(e.to_string()))
}

#[derive(FromRow)]
struct DbUser {
    id: i64,
    nama: String,
    email: String,
    no_telp: String,
    kata_sandi: String,
    tanggal_lahir: Option<String>,
    jenis_kelamin: Option<String>,
    tentang: Option<String>,
    pekerjaan: Option<String>,
    id_provinsi: String,
    id_kota: String,
    is_admin: bool,
    created_at: String,
    updated_at: String,
}

impl DbUser {
    fn into_user(self) -> Result<User, RepoError> {
        Ok(User {
            id: self.id,
            nama: self.nama,
            email: self.email,
            no_telp: self.no_telp,
            kata_sandi: self.kata_sandi,
            tanggal_lahir: parse_date(self.tanggal_lahir)?,
            jenis_kelamin: self.jenis_kelamin,
            tentang: self.tentang,
            pekerjaan: self.pekerjaan,
            id_provinsi: self.id_provinsi,
            id_kota: self.id_kota,
            is_admin: self.is_admin,
            created_at: parse_ts(&self.created_at)?,
            updated_at: parse_ts(&self.updated_at)?,
        })
    }
}

#[derive(FromRow)]
struct DbToko {
    id: i64,
    id_user: i64,
    nama_toko: String,
    url_foto: String,
    created_at: String,
    updated_at: String,
}

impl DbToko {
    fn into_toko(self) -> Result<Toko, RepoError> {
        Ok(Toko {
            id: self.id,
            id_user: self.id_user,
            nama_toko: self.nama_toko,
            url_foto: self.url_foto,
            created_at: parse_ts(&self.created_at)?,
            updated_at: parse_ts(&self.updated_at)?,
        })
    }
}

#[derive(FromRow)]
struct DbCategory {
    id: i64,
    nama_category: String,
    created_at: String,
    updated_at: String,
}

impl DbCategory {
    fn into_category(self) -> Result<Category, RepoError> {
        Ok(Category {
            id: self.id,
            nama_category: self.nama_category,
            created_at: parse_ts(&self.created_at)?,
            updated_at: parse_ts(&self.updated_at)?,
        })
    }
}

/// Product row joined with its shop and category names.
#[derive(FromRow)]
struct DbProduct {
    id: i64,
    id_toko: i64,
    id_category: i64,
    nama_produk: String,
    slug: String,
    harga_reseller: i64,
    harga_konsumen: i64,
    stok: i64,
    deskripsi: String,
    created_at: String,
    updated_at: String,
    nama_toko: Option<String>,
    url_foto: Option<String>,
    nama_category: Option<String>,
}

impl DbProduct {
    fn into_detail(self, photos: Vec<ProductPhoto>) -> Result<ProductDetail, RepoError> {
        let toko = self.nama_toko.map(|nama_toko| TokoSummary {
            id: self.id_toko,
            nama_toko,
            url_foto: self.url_foto.unwrap_or_default(),
        });
        let category = self.nama_category.map(|nama_category| CategorySummary {
            id: self.id_category,
            nama_category,
        });
        Ok(ProductDetail {
            product: Product {
                id: self.id,
                id_toko: self.id_toko,
                id_category: self.id_category,
                nama_produk: self.nama_produk,
                slug: self.slug,
                harga_reseller: self.harga_reseller,
                harga_konsumen: self.harga_konsumen,
                stok: self.stok,
                deskripsi: self.deskripsi,
                created_at: parse_ts(&self.created_at)?,
                updated_at: parse_ts(&self.updated_at)?,
            },
            toko,
            category,
            photos,
        })
    }
}

#[derive(FromRow)]
struct DbPhoto {
    id: i64,
    id_produk: i64,
    url: String,
}

#[derive(FromRow)]
struct DbDestination {
    id: i64,
    id_user: i64,
    judul_alamat: String,
    nama_penerima: String,
    no_telp: String,
    detail_alamat: String,
    created_at: String,
    updated_at: String,
}

impl DbDestination {
    fn into_destination(self) -> Result<Destination, RepoError> {
        Ok(Destination {
            id: self.id,
            id_user: self.id_user,
            judul_alamat: self.judul_alamat,
            nama_penerima: self.nama_penerima,
            no_telp: self.no_telp,
            detail_alamat: self.detail_alamat,
            created_at: parse_ts(&self.created_at)?,
            updated_at: parse_ts(&self.updated_at)?,
        })
    }
}

#[derive(FromRow)]
struct DbTransaction {
    id: i64,
    id_user: i64,
    alamat_pengiriman: i64,
    harga_total: i64,
    kode_invoice: String,
    metode_bayar: String,
    created_at: String,
}

impl DbTransaction {
    fn into_transaction(self) -> Result<Transaction, RepoError> {
        Ok(Transaction {
            id: self.id,
            id_user: self.id_user,
            alamat_pengiriman: self.alamat_pengiriman,
            harga_total: self.harga_total,
            metode_bayar: parse_method(&self.metode_bayar)?,
            kode_invoice: self.kode_invoice,
            created_at: parse_ts(&self.created_at)?,
        })
    }
}

#[derive(FromRow)]
struct DbLine {
    id_toko: i64,
    kuantitas: i64,
    harga_total: i64,
    log_id: i64,
    id_produk: i64,
    id_category: i64,
    nama_produk: String,
    slug: String,
    harga_reseller: i64,
    harga_konsumen: i64,
    deskripsi: String,
    nama_toko: Option<String>,
    url_foto: Option<String>,
    nama_category: Option<String>,
}

/// Product row read under the checkout write lock.
#[derive(FromRow)]
struct DbStockRow {
    id: i64,
    id_toko: i64,
    id_category: i64,
    nama_produk: String,
    slug: String,
    harga_reseller: i64,
    harga_konsumen: i64,
    stok: i64,
    deskripsi: String,
    owner: i64,
}

const USER_COLUMNS: &str = "SELECT id, nama, email, no_telp, kata_sandi, tanggal_lahir, jenis_kelamin, tentang, pekerjaan, id_provinsi, id_kota, is_admin, created_at, updated_at FROM users";

const TOKO_COLUMNS: &str =
    "SELECT id, id_user, nama_toko, url_foto, created_at, updated_at FROM toko";

const CATEGORY_COLUMNS: &str =
    "SELECT id, nama_category, created_at, updated_at FROM category";

const PRODUCT_COLUMNS: &str = "SELECT p.id, p.id_toko, p.id_category, p.nama_produk, p.slug, p.harga_reseller, p.harga_konsumen, p.stok, p.deskripsi, p.created_at, p.updated_at, t.nama_toko, t.url_foto, c.nama_category
     FROM produk p
     LEFT JOIN toko t ON t.id = p.id_toko
     LEFT JOIN category c ON c.id = p.id_category";

const DESTINATION_COLUMNS: &str = "SELECT id, id_user, judul_alamat, nama_penerima, no_telp, detail_alamat, created_at, updated_at FROM alamat";

const TRX_COLUMNS: &str = "SELECT id, id_user, alamat_pengiriman, harga_total, kode_invoice, metode_bayar, created_at FROM trx";

impl SqliteRepo {
    pub async fn new(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        // Ensure on-disk SQLite target directory exists (no-op for in-memory).
        if let Some(path) = database_url.strip_prefix("sqlite://") {
            if path != ":memory:" {
                let p = std::path::Path::new(path);
                if let Some(parent) = p.parent() {
                    if !parent.as_os_str().is_empty() {
                        tokio::fs::create_dir_all(parent).await?;
                    }
                }
            }
        }

        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(options)
            .await?;

        let ddl = include_str!("../migrations/0001_init.sql");
        sqlx::query(ddl).execute(&pool).await?;

        tracing::info!(%database_url, "sqlite schema ready");
        Ok(Self { pool })
    }

    async fn photos_of(&self, id_produk: i64) -> Result<Vec<ProductPhoto>, RepoError> {
        let rows: Vec<DbPhoto> =
            sqlx::query_as("SELECT id, id_produk, url FROM foto_produk WHERE id_produk = ? ORDER BY id")
                .bind(id_produk)
                .fetch_all(&self.pool)
                .await
                .map_err(db)?;
        Ok(rows
            .into_iter()
            .map(|r| ProductPhoto {
                id: r.id,
                id_produk: r.id_produk,
                url: r.url,
            })
            .collect())
    }

    async fn product_detail(&self, row: DbProduct) -> Result<ProductDetail, RepoError> {
        let photos = self.photos_of(row.id).await?;
        row.into_detail(photos)
    }

    async fn transaction_view(&self, trx: Transaction) -> Result<TransactionView, RepoError> {
        let alamat: Option<DbDestination> =
            sqlx::query_as(&format!("{DESTINATION_COLUMNS} WHERE id = ?"))
                .bind(trx.alamat_pengiriman)
                .fetch_optional(&self.pool)
                .await
                .map_err(db)?;

        let lines: Vec<DbLine> = sqlx::query_as(
            "SELECT d.id_toko, d.kuantitas, d.harga_total,
                    l.id AS log_id, l.id_produk, l.id_category, l.nama_produk, l.slug,
                    l.harga_reseller, l.harga_konsumen, l.deskripsi,
                    t.nama_toko, t.url_foto, c.nama_category
             FROM detail_trx d
             JOIN log_produk l ON l.id = d.id_log_produk
             LEFT JOIN toko t ON t.id = d.id_toko
             LEFT JOIN category c ON c.id = l.id_category
             WHERE d.id_trx = ?
             ORDER BY d.id",
        )
        .bind(trx.id)
        .fetch_all(&self.pool)
        .await
        .map_err(db)?;

        let mut detail_trx = Vec::with_capacity(lines.len());
        for line in lines {
            let photos = self.photos_of(line.id_produk).await?;
            detail_trx.push(TransactionLine {
                product: SnapshotProduct {
                    id: line.log_id,
                    id_produk: line.id_produk,
                    nama_produk: line.nama_produk,
                    slug: line.slug,
                    harga_reseller: line.harga_reseller,
                    harga_konsumen: line.harga_konsumen,
                    deskripsi: line.deskripsi,
                    category: CategorySummary {
                        id: line.id_category,
                        nama_category: line.nama_category.unwrap_or_default(),
                    },
                    photos,
                },
                toko: TokoSummary {
                    id: line.id_toko,
                    nama_toko: line.nama_toko.unwrap_or_default(),
                    url_foto: line.url_foto.unwrap_or_default(),
                },
                kuantitas: line.kuantitas,
                harga_total: line.harga_total,
            });
        }

        Ok(TransactionView {
            id: trx.id,
            harga_total: trx.harga_total,
            kode_invoice: trx.kode_invoice,
            method_bayar: trx.metode_bayar,
            alamat_kirim: alamat.map(|a| a.into_destination()).transpose()?,
            created_at: trx.created_at,
            detail_trx,
        })
    }
}

async fn insert_photos(
    conn: &mut SqliteConnection,
    id_produk: i64,
    urls: &[String],
) -> Result<(), RepoError> {
    for url in urls {
        sqlx::query("INSERT INTO foto_produk (id_produk, url) VALUES (?, ?)")
            .bind(id_produk)
            .bind(url)
            .execute(&mut *conn)
            .await
            .map_err(write_err)?;
    }
    Ok(())
}

/// Bumps `updated_at` on the row, returning whether it exists. Must be the first
/// statement of a read-modify-write transaction: a deferred transaction that
/// reads first cannot upgrade to the write lock and fails with SQLITE_BUSY.
async fn touch(
    conn: &mut SqliteConnection,
    table: &str,
    id: i64,
    id_user: Option<i64>,
) -> Result<bool, RepoError> {
    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(format!("UPDATE {table} SET updated_at = "));
    qb.push_bind(Utc::now().to_rfc3339())
        .push(" WHERE id = ")
        .push_bind(id);
    if let Some(id_user) = id_user {
        qb.push(" AND id_user = ").push_bind(id_user);
    }
    let res = qb.build().execute(&mut *conn).await.map_err(write_err)?;
    Ok(res.rows_affected() > 0)
}

/// Substring pattern for LIKE with `\`, `%` and `_` matched literally.
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

async fn insert_user(conn: &mut SqliteConnection, user: NewUser) -> Result<User, RepoError> {
    let now = Utc::now();
    let res = sqlx::query(
        "INSERT INTO users (nama, email, no_telp, kata_sandi, tanggal_lahir, jenis_kelamin, tentang, pekerjaan, id_provinsi, id_kota, is_admin, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&user.nama)
    .bind(&user.email)
    .bind(&user.no_telp)
    .bind(&user.kata_sandi)
    .bind(user.tanggal_lahir.map(|d| d.format(DATE_FORMAT).to_string()))
    .bind(&user.jenis_kelamin)
    .bind(&user.tentang)
    .bind(&user.pekerjaan)
    .bind(&user.id_provinsi)
    .bind(&user.id_kota)
    .bind(user.is_admin)
    .bind(now.to_rfc3339())
    .bind(now.to_rfc3339())
    .execute(&mut *conn)
    .await
    .map_err(write_err)?;

    Ok(User {
        id: res.last_insert_rowid(),
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
    })
}

async fn insert_toko(conn: &mut SqliteConnection, toko: NewToko) -> Result<Toko, RepoError> {
    let now = Utc::now();
    let res = sqlx::query(
        "INSERT INTO toko (id_user, nama_toko, url_foto, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(toko.id_user)
    .bind(&toko.nama_toko)
    .bind(&toko.url_foto)
    .bind(now.to_rfc3339())
    .bind(now.to_rfc3339())
    .execute(&mut *conn)
    .await
    .map_err(write_err)?;
    Ok(Toko {
        id: res.last_insert_rowid(),
        id_user: toko.id_user,
        nama_toko: toko.nama_toko,
        url_foto: toko.url_foto,
        created_at: now,
        updated_at: now,
    })
}

fn push_product_filter(qb: &mut QueryBuilder<'_, Sqlite>, filter: &ProductFilter) {
    qb.push(" WHERE 1 = 1");
    if let Some(term) = filter.name_term() {
        // LIKE is case-insensitive for ASCII in sqlite.
        qb.push(" AND p.nama_produk LIKE ")
            .push_bind(like_pattern(term))
            .push(" ESCAPE '\\'");
    }
    if let Some(category) = filter.category_id {
        qb.push(" AND p.id_category = ").push_bind(category);
    }
    if let Some(toko) = filter.toko_id {
        qb.push(" AND p.id_toko = ").push_bind(toko);
    }
    if let Some(min) = filter.min_harga {
        qb.push(" AND p.harga_konsumen >= ").push_bind(min);
    }
    if let Some(max) = filter.max_harga {
        qb.push(" AND p.harga_konsumen <= ").push_bind(max);
    }
}

#[async_trait]
impl UserRepository for SqliteRepo {
    async fn create_user(&self, user: NewUser) -> Result<User, RepoError> {
        let mut conn = self.pool.acquire().await.map_err(db)?;
        insert_user(&mut conn, user).await
    }

    async fn create_user_with_toko(&self, user: NewUser) -> Result<(User, Toko), RepoError> {
        let mut tx = self.pool.begin().await.map_err(db)?;
        let user = insert_user(&mut tx, user).await?;
        let toko = insert_toko(&mut tx, NewToko::default_for(user.id, &user.nama)).await?;
        tx.commit().await.map_err(db)?;
        Ok((user, toko))
    }

    async fn get_user(&self, id: i64) -> Result<Option<User>, RepoError> {
        let row: Option<DbUser> = sqlx::query_as(&format!("{USER_COLUMNS} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db)?;
        row.map(|r| r.into_user()).transpose()
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let row: Option<DbUser> = sqlx::query_as(&format!("{USER_COLUMNS} WHERE email = ?"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(db)?;
        row.map(|r| r.into_user()).transpose()
    }

    async fn find_users_by_email_or_phone(
        &self,
        email: &str,
        no_telp: &str,
    ) -> Result<Vec<User>, RepoError> {
        let rows: Vec<DbUser> =
            sqlx::query_as(&format!("{USER_COLUMNS} WHERE email = ? OR no_telp = ?"))
                .bind(email)
                .bind(no_telp)
                .fetch_all(&self.pool)
                .await
                .map_err(db)?;
        rows.into_iter().map(|r| r.into_user()).collect()
    }

    async fn update_user(
        &self,
        id: i64,
        update: ProfileUpdate,
    ) -> Result<Option<User>, RepoError> {
        let mut tx = self.pool.begin().await.map_err(db)?;
        if !touch(&mut tx, "users", id, None).await? {
            return Ok(None);
        }
        let row: DbUser = sqlx::query_as(&format!("{USER_COLUMNS} WHERE id = ?"))
            .bind(id)
            .fetch_one(&mut *tx)
            .await
            .map_err(db)?;
        let mut user = row.into_user()?;
        user.apply(&update);

        sqlx::query(
            "UPDATE users SET nama = ?, email = ?, no_telp = ?, kata_sandi = ?, tanggal_lahir = ?, jenis_kelamin = ?, tentang = ?, pekerjaan = ?, id_provinsi = ?, id_kota = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(&user.nama)
        .bind(&user.email)
        .bind(&user.no_telp)
        .bind(&user.kata_sandi)
        .bind(user.tanggal_lahir.map(|d| d.format(DATE_FORMAT).to_string()))
        .bind(&user.jenis_kelamin)
        .bind(&user.tentang)
        .bind(&user.pekerjaan)
        .bind(&user.id_provinsi)
        .bind(&user.id_kota)
        .bind(user.updated_at.to_rfc3339())
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(write_err)?;

        tx.commit().await.map_err(db)?;
        Ok(Some(user))
    }
}

#[async_trait]
impl TokoRepository for SqliteRepo {
    async fn create_toko(&self, toko: NewToko) -> Result<Toko, RepoError> {
        let mut conn = self.pool.acquire().await.map_err(db)?;
        insert_toko(&mut conn, toko).await
    }

    async fn list_toko(&self) -> Result<Vec<Toko>, RepoError> {
        let rows: Vec<DbToko> = sqlx::query_as(&format!("{TOKO_COLUMNS} ORDER BY id"))
            .fetch_all(&self.pool)
            .await
            .map_err(db)?;
        rows.into_iter().map(|r| r.into_toko()).collect()
    }

    async fn list_toko_by_user(&self, id_user: i64) -> Result<Vec<Toko>, RepoError> {
        let rows: Vec<DbToko> =
            sqlx::query_as(&format!("{TOKO_COLUMNS} WHERE id_user = ? ORDER BY id"))
                .bind(id_user)
                .fetch_all(&self.pool)
                .await
                .map_err(db)?;
        rows.into_iter().map(|r| r.into_toko()).collect()
    }

    async fn get_toko(&self, id: i64) -> Result<Option<Toko>, RepoError> {
        let row: Option<DbToko> = sqlx::query_as(&format!("{TOKO_COLUMNS} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db)?;
        row.map(|r| r.into_toko()).transpose()
    }

    async fn update_toko(
        &self,
        id: i64,
        patch: TokoUpdateRequest,
    ) -> Result<Option<Toko>, RepoError> {
        let mut tx = self.pool.begin().await.map_err(db)?;
        if !touch(&mut tx, "toko", id, None).await? {
            return Ok(None);
        }
        let row: DbToko = sqlx::query_as(&format!("{TOKO_COLUMNS} WHERE id = ?"))
            .bind(id)
            .fetch_one(&mut *tx)
            .await
            .map_err(db)?;
        let mut toko = row.into_toko()?;
        toko.apply(&patch);

        sqlx::query("UPDATE toko SET nama_toko = ?, url_foto = ?, updated_at = ? WHERE id = ?")
            .bind(&toko.nama_toko)
            .bind(&toko.url_foto)
            .bind(toko.updated_at.to_rfc3339())
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(write_err)?;
        tx.commit().await.map_err(db)?;
        Ok(Some(toko))
    }
}

#[async_trait]
impl CategoryRepository for SqliteRepo {
    async fn create_category(&self, nama_category: String) -> Result<Category, RepoError> {
        let now = Utc::now();
        let res = sqlx::query(
            "INSERT INTO category (nama_category, created_at, updated_at) VALUES (?, ?, ?)",
        )
        .bind(&nama_category)
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(write_err)?;
        Ok(Category {
            id: res.last_insert_rowid(),
            nama_category,
            created_at: now,
            updated_at: now,
        })
    }

    async fn list_categories(&self) -> Result<Vec<Category>, RepoError> {
        let rows: Vec<DbCategory> = sqlx::query_as(&format!("{CATEGORY_COLUMNS} ORDER BY id"))
            .fetch_all(&self.pool)
            .await
            .map_err(db)?;
        rows.into_iter().map(|r| r.into_category()).collect()
    }

    async fn get_category(&self, id: i64) -> Result<Option<Category>, RepoError> {
        let row: Option<DbCategory> = sqlx::query_as(&format!("{CATEGORY_COLUMNS} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db)?;
        row.map(|r| r.into_category()).transpose()
    }

    async fn update_category(
        &self,
        id: i64,
        nama_category: String,
    ) -> Result<Option<Category>, RepoError> {
        let updated = sqlx::query("UPDATE category SET nama_category = ?, updated_at = ? WHERE id = ?")
            .bind(&nama_category)
            .bind(Utc::now().to_rfc3339())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(write_err)?;
        if updated.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_category(id).await
    }

    async fn delete_category(&self, id: i64) -> Result<bool, RepoError> {
        let res = sqlx::query("DELETE FROM category WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(write_err)?;
        Ok(res.rows_affected() > 0)
    }
}

#[async_trait]
impl ProductRepository for SqliteRepo {
    async fn create_product(
        &self,
        id_toko: i64,
        draft: ProductDraft,
    ) -> Result<Product, RepoError> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await.map_err(db)?;
        let res = sqlx::query(
            "INSERT INTO produk (id_toko, id_category, nama_produk, slug, harga_reseller, harga_konsumen, stok, deskripsi, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id_toko)
        .bind(draft.id_category)
        .bind(&draft.nama_produk)
        .bind(&draft.slug)
        .bind(draft.harga_reseller)
        .bind(draft.harga_konsumen)
        .bind(draft.stok)
        .bind(&draft.deskripsi)
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .execute(&mut *tx)
        .await
        .map_err(write_err)?;
        let id = res.last_insert_rowid();
        insert_photos(&mut tx, id, &draft.photos).await?;
        tx.commit().await.map_err(db)?;

        Ok(Product {
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
        })
    }

    async fn update_product(
        &self,
        id: i64,
        id_toko: i64,
        draft: ProductDraft,
    ) -> Result<Option<Product>, RepoError> {
        let mut tx = self.pool.begin().await.map_err(db)?;
        let updated = sqlx::query(
            "UPDATE produk SET id_category = ?, nama_produk = ?, slug = ?, harga_reseller = ?, harga_konsumen = ?, stok = ?, deskripsi = ?, updated_at = ?
             WHERE id = ? AND id_toko = ?",
        )
        .bind(draft.id_category)
        .bind(&draft.nama_produk)
        .bind(&draft.slug)
        .bind(draft.harga_reseller)
        .bind(draft.harga_konsumen)
        .bind(draft.stok)
        .bind(&draft.deskripsi)
        .bind(Utc::now().to_rfc3339())
        .bind(id)
        .bind(id_toko)
        .execute(&mut *tx)
        .await
        .map_err(write_err)?;
        if updated.rows_affected() == 0 {
            return Ok(None);
        }
        if !draft.photos.is_empty() {
            sqlx::query("DELETE FROM foto_produk WHERE id_produk = ?")
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(db)?;
            insert_photos(&mut tx, id, &draft.photos).await?;
        }
        tx.commit().await.map_err(db)?;

        Ok(self.get_product(id).await?.map(|d| d.product))
    }

    async fn delete_product(&self, id: i64, id_toko: i64) -> Result<bool, RepoError> {
        let mut tx = self.pool.begin().await.map_err(db)?;
        let res = sqlx::query("DELETE FROM produk WHERE id = ? AND id_toko = ?")
            .bind(id)
            .bind(id_toko)
            .execute(&mut *tx)
            .await
            .map_err(write_err)?;
        if res.rows_affected() == 0 {
            return Ok(false);
        }
        sqlx::query("DELETE FROM foto_produk WHERE id_produk = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(db)?;
        tx.commit().await.map_err(db)?;
        Ok(true)
    }

    async fn get_product(&self, id: i64) -> Result<Option<ProductDetail>, RepoError> {
        let row: Option<DbProduct> = sqlx::query_as(&format!("{PRODUCT_COLUMNS} WHERE p.id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db)?;
        match row {
            Some(r) => Ok(Some(self.product_detail(r).await?)),
            None => Ok(None),
        }
    }

    async fn list_products(
        &self,
        filter: &ProductFilter,
    ) -> Result<(Vec<ProductDetail>, u64), RepoError> {
        let mut count = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM produk p");
        push_product_filter(&mut count, filter);
        let total = count
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(db)?;

        let mut select = QueryBuilder::<Sqlite>::new(PRODUCT_COLUMNS);
        push_product_filter(&mut select, filter);
        select
            .push(" ORDER BY p.id LIMIT ")
            .push_bind(i64::from(filter.limit()))
            .push(" OFFSET ")
            .push_bind(filter.offset() as i64);
        let rows = select
            .build_query_as::<DbProduct>()
            .fetch_all(&self.pool)
            .await
            .map_err(db)?;

        let mut page = Vec::with_capacity(rows.len());
        for row in rows {
            page.push(self.product_detail(row).await?);
        }
        Ok((page, total.max(0) as u64))
    }
}

#[async_trait]
impl DestinationRepository for SqliteRepo {
    async fn create_destination(
        &self,
        id_user: i64,
        destination: NewDestination,
    ) -> Result<Destination, RepoError> {
        let now = Utc::now();
        let res = sqlx::query(
            "INSERT INTO alamat (id_user, judul_alamat, nama_penerima, no_telp, detail_alamat, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id_user)
        .bind(&destination.judul_alamat)
        .bind(&destination.nama_penerima)
        .bind(&destination.no_telp)
        .bind(&destination.detail_alamat)
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(write_err)?;
        Ok(Destination {
            id: res.last_insert_rowid(),
            id_user,
            judul_alamat: destination.judul_alamat,
            nama_penerima: destination.nama_penerima,
            no_telp: destination.no_telp,
            detail_alamat: destination.detail_alamat,
            created_at: now,
            updated_at: now,
        })
    }

    async fn get_destination(
        &self,
        id: i64,
        id_user: i64,
    ) -> Result<Option<Destination>, RepoError> {
        let row: Option<DbDestination> =
            sqlx::query_as(&format!("{DESTINATION_COLUMNS} WHERE id = ? AND id_user = ?"))
                .bind(id)
                .bind(id_user)
                .fetch_optional(&self.pool)
                .await
                .map_err(db)?;
        row.map(|r| r.into_destination()).transpose()
    }

    async fn list_destinations(&self, id_user: i64) -> Result<Vec<Destination>, RepoError> {
        let rows: Vec<DbDestination> =
            sqlx::query_as(&format!("{DESTINATION_COLUMNS} WHERE id_user = ? ORDER BY id"))
                .bind(id_user)
                .fetch_all(&self.pool)
                .await
                .map_err(db)?;
        rows.into_iter().map(|r| r.into_destination()).collect()
    }

    async fn update_destination(
        &self,
        id: i64,
        id_user: i64,
        patch: DestinationPatch,
    ) -> Result<Option<Destination>, RepoError> {
        let mut tx = self.pool.begin().await.map_err(db)?;
        if !touch(&mut tx, "alamat", id, Some(id_user)).await? {
            return Ok(None);
        }
        let row: DbDestination = sqlx::query_as(&format!("{DESTINATION_COLUMNS} WHERE id = ?"))
            .bind(id)
            .fetch_one(&mut *tx)
            .await
            .map_err(db)?;
        let mut destination = row.into_destination()?;
        destination.apply(&patch);

        sqlx::query(
            "UPDATE alamat SET judul_alamat = ?, nama_penerima = ?, no_telp = ?, detail_alamat = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&destination.judul_alamat)
        .bind(&destination.nama_penerima)
        .bind(&destination.no_telp)
        .bind(&destination.detail_alamat)
        .bind(destination.updated_at.to_rfc3339())
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(write_err)?;
        tx.commit().await.map_err(db)?;
        Ok(Some(destination))
    }

    async fn delete_destination(&self, id: i64, id_user: i64) -> Result<bool, RepoError> {
        let res = sqlx::query("DELETE FROM alamat WHERE id = ? AND id_user = ?")
            .bind(id)
            .bind(id_user)
            .execute(&self.pool)
            .await
            .map_err(write_err)?;
        Ok(res.rows_affected() > 0)
    }
}

#[async_trait]
impl TransactionRepository for SqliteRepo {
    async fn checkout(&self, order: NewTransaction) -> Result<Transaction, CheckoutError> {
        let now = Utc::now();
        let stamp = now.to_rfc3339();
        let mut tx = self.pool.begin().await.map_err(db)?;

        // The header insert is the first statement so the write lock is held
        // for every stock read that follows.
        let trx_id = sqlx::query(
            "INSERT INTO trx (id_user, alamat_pengiriman, harga_total, kode_invoice, metode_bayar, created_at)
             VALUES (?, ?, 0, ?, ?, ?)",
        )
        .bind(order.id_user)
        .bind(order.alamat_pengiriman)
        .bind(&order.kode_invoice)
        .bind(order.metode_bayar.as_str())
        .bind(&stamp)
        .execute(&mut *tx)
        .await
        .map_err(write_err)?
        .last_insert_rowid();

        let mut harga_total: i64 = 0;
        for item in &order.items {
            let product: Option<DbStockRow> = sqlx::query_as(
                "SELECT p.id, p.id_toko, p.id_category, p.nama_produk, p.slug, p.harga_reseller, p.harga_konsumen, p.stok, p.deskripsi, t.id_user AS owner
                 FROM produk p JOIN toko t ON t.id = p.id_toko
                 WHERE p.id = ?",
            )
            .bind(item.product_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(db)?;
            let product = product.ok_or(CheckoutError::ProductNotFound(item.product_id))?;

            if product.owner == order.id_user {
                return Err(CheckoutError::OwnProduct(product.id));
            }
            if product.stok < item.kuantitas {
                return Err(CheckoutError::InsufficientStock {
                    product_id: product.id,
                    requested: item.kuantitas,
                    available: product.stok,
                });
            }

            let decremented = sqlx::query(
                "UPDATE produk SET stok = stok - ?, updated_at = ? WHERE id = ? AND stok >= ?",
            )
            .bind(item.kuantitas)
            .bind(&stamp)
            .bind(product.id)
            .bind(item.kuantitas)
            .execute(&mut *tx)
            .await
            .map_err(db)?;
            if decremented.rows_affected() == 0 {
                return Err(CheckoutError::InsufficientStock {
                    product_id: product.id,
                    requested: item.kuantitas,
                    available: product.stok,
                });
            }

            let log_id = sqlx::query(
                "INSERT INTO log_produk (id_produk, id_toko, id_category, nama_produk, slug, harga_reseller, harga_konsumen, deskripsi, created_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(product.id)
            .bind(product.id_toko)
            .bind(product.id_category)
            .bind(&product.nama_produk)
            .bind(&product.slug)
            .bind(product.harga_reseller)
            .bind(product.harga_konsumen)
            .bind(&product.deskripsi)
            .bind(&stamp)
            .execute(&mut *tx)
            .await
            .map_err(write_err)?
            .last_insert_rowid();

            let subtotal = product
                .harga_konsumen
                .checked_mul(item.kuantitas)
                .ok_or_else(|| RepoError::DbError("amount overflow".into()))?;
            sqlx::query(
                "INSERT INTO detail_trx (id_trx, id_log_produk, id_toko, kuantitas, harga_total) VALUES (?, ?, ?, ?, ?)",
            )
            .bind(trx_id)
            .bind(log_id)
            .bind(product.id_toko)
            .bind(item.kuantitas)
            .bind(subtotal)
            .execute(&mut *tx)
            .await
            .map_err(write_err)?;

            harga_total = harga_total
                .checked_add(subtotal)
                .ok_or_else(|| RepoError::DbError("amount overflow".into()))?;
        }

        sqlx::query("UPDATE trx SET harga_total = ? WHERE id = ?")
            .bind(harga_total)
            .bind(trx_id)
            .execute(&mut *tx)
            .await
            .map_err(db)?;
        tx.commit().await.map_err(db)?;

        Ok(Transaction {
            id: trx_id,
            id_user: order.id_user,
            alamat_pengiriman: order.alamat_pengiriman,
            harga_total,
            kode_invoice: order.kode_invoice,
            metode_bayar: order.metode_bayar,
            created_at: now,
        })
    }

    async fn list_transactions(&self, id_user: i64) -> Result<Vec<TransactionView>, RepoError> {
        let rows: Vec<DbTransaction> =
            sqlx::query_as(&format!("{TRX_COLUMNS} WHERE id_user = ? ORDER BY id DESC"))
                .bind(id_user)
                .fetch_all(&self.pool)
                .await
                .map_err(db)?;
        let mut views = Vec::with_capacity(rows.len());
        for row in rows {
            views.push(self.transaction_view(row.into_transaction()?).await?);
        }
        Ok(views)
    }

    async fn get_transaction(
        &self,
        id: i64,
        id_user: i64,
    ) -> Result<Option<TransactionView>, RepoError> {
        let row: Option<DbTransaction> =
            sqlx::query_as(&format!("{TRX_COLUMNS} WHERE id = ? AND id_user = ?"))
                .bind(id)
                .bind(id_user)
                .fetch_optional(&self.pool)
                .await
                .map_err(db)?;
        match row {
            Some(r) => Ok(Some(self.transaction_view(r.into_transaction()?).await?)),
            None => Ok(None),
        }
    }
}
