//! Scenarios every store backend must pass.
#![allow(dead_code)]

use tokoku_types::domain::destination::NewDestination;
use tokoku_types::domain::product::{Product, ProductDraft, ProductFilter};
use tokoku_types::domain::toko::{NewToko, Toko, TokoUpdateRequest};
use tokoku_types::domain::transaction::{LineItem, NewTransaction, PaymentMethod};
use tokoku_types::domain::user::{NewUser, ProfileUpdate, User};
use tokoku_types::ports::transaction_repository::CheckoutError;
use tokoku_types::ports::{MarketStore, RepoError};

pub fn new_user(tag: &str) -> NewUser {
    NewUser {
        nama: format!("User {tag}"),
        email: format!("{tag}@example.com"),
        no_telp: format!("0812{tag}"),
        kata_sandi: "hash".into(),
        tanggal_lahir: None,
        jenis_kelamin: None,
        tentang: None,
        pekerjaan: None,
        id_provinsi: "11".into(),
        id_kota: "1101".into(),
        is_admin: false,
    }
}

pub fn draft(id_category: i64, nama: &str, harga: i64, stok: i64) -> ProductDraft {
    ProductDraft {
        id_category,
        nama_produk: nama.into(),
        slug: nama.to_lowercase().replace(' ', "-"),
        harga_reseller: harga / 2,
        harga_konsumen: harga,
        stok,
        deskripsi: String::new(),
        photos: vec![format!("https://img.example/{nama}.jpg")],
    }
}

pub struct Market {
    pub seller: User,
    pub buyer: User,
    pub toko: Toko,
    pub kopi: Product,
    pub teh: Product,
    pub alamat: i64,
}

pub async fn seed<R: MarketStore>(repo: &R) -> Market {
    let seller = repo.create_user(new_user("seller")).await.unwrap();
    let buyer = repo.create_user(new_user("buyer")).await.unwrap();
    let toko = repo
        .create_toko(NewToko::default_for(seller.id, &seller.nama))
        .await
        .unwrap();
    repo.create_toko(NewToko::default_for(buyer.id, &buyer.nama))
        .await
        .unwrap();
    let category = repo.create_category("Minuman".into()).await.unwrap();
    let kopi = repo
        .create_product(toko.id, draft(category.id, "Kopi Gayo", 50_000, 5))
        .await
        .unwrap();
    let teh = repo
        .create_product(toko.id, draft(category.id, "Teh Hijau", 20_000, 2))
        .await
        .unwrap();
    let alamat = repo
        .create_destination(
            buyer.id,
            NewDestination {
                judul_alamat: "Rumah".into(),
                nama_penerima: "Buyer".into(),
                no_telp: "0812".into(),
                detail_alamat: "Jl. Merdeka 1".into(),
            },
        )
        .await
        .unwrap()
        .id;
    Market {
        seller,
        buyer,
        toko,
        kopi,
        teh,
        alamat,
    }
}

fn order(m: &Market, invoice: &str, items: &[(i64, i64)]) -> NewTransaction {
    NewTransaction {
        id_user: m.buyer.id,
        alamat_pengiriman: m.alamat,
        metode_bayar: PaymentMethod::Cod,
        kode_invoice: invoice.into(),
        items: items
            .iter()
            .map(|&(product_id, kuantitas)| LineItem {
                product_id,
                kuantitas,
            })
            .collect(),
    }
}

async fn stock<R: MarketStore>(repo: &R, id: i64) -> i64 {
    repo.get_product(id).await.unwrap().unwrap().product.stok
}

pub async fn checkout_decrements_stock_and_snapshots<R: MarketStore>(repo: &R) {
    let m = seed(repo).await;
    let trx = repo
        .checkout(order(&m, "INV-1", &[(m.kopi.id, 2), (m.teh.id, 1)]))
        .await
        .unwrap();
    assert_eq!(trx.harga_total, 2 * 50_000 + 20_000);
    assert_eq!(stock(repo, m.kopi.id).await, 3);
    assert_eq!(stock(repo, m.teh.id).await, 1);

    // Later edits must not leak into the purchase record.
    let mut renamed = draft(m.kopi.id_category, "Kopi Baru", 99_000, 3);
    renamed.photos.clear();
    repo.update_product(m.kopi.id, m.toko.id, renamed)
        .await
        .unwrap()
        .unwrap();

    let view = repo
        .get_transaction(trx.id, m.buyer.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(view.kode_invoice, "INV-1");
    assert_eq!(view.detail_trx.len(), 2);
    let first = &view.detail_trx[0];
    assert_eq!(first.product.nama_produk, "Kopi Gayo");
    assert_eq!(first.product.harga_konsumen, 50_000);
    assert_eq!(first.kuantitas, 2);
    assert_eq!(first.harga_total, 100_000);
    assert_eq!(first.toko.id, m.toko.id);
    assert_eq!(first.product.category.nama_category, "Minuman");
    assert_eq!(first.product.photos.len(), 1);
    assert_eq!(view.alamat_kirim.map(|a| a.id), Some(m.alamat));

    assert!(repo
        .get_transaction(trx.id, m.seller.id)
        .await
        .unwrap()
        .is_none());
}

pub async fn checkout_failure_rolls_back<R: MarketStore>(repo: &R) {
    let m = seed(repo).await;

    let err = repo
        .checkout(order(&m, "INV-2", &[(m.kopi.id, 1), (m.teh.id, 3)]))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CheckoutError::InsufficientStock {
            requested: 3,
            available: 2,
            ..
        }
    ));
    assert_eq!(stock(repo, m.kopi.id).await, 5);
    assert_eq!(stock(repo, m.teh.id).await, 2);
    assert!(repo.list_transactions(m.buyer.id).await.unwrap().is_empty());

    let err = repo
        .checkout(order(&m, "INV-3", &[(m.kopi.id, 1), (999, 1)]))
        .await
        .unwrap_err();
    assert!(matches!(err, CheckoutError::ProductNotFound(999)));
    assert_eq!(stock(repo, m.kopi.id).await, 5);

    // The same product twice draws from one stock count.
    let err = repo
        .checkout(order(&m, "INV-4", &[(m.teh.id, 2), (m.teh.id, 1)]))
        .await
        .unwrap_err();
    assert!(matches!(err, CheckoutError::InsufficientStock { .. }));
    assert_eq!(stock(repo, m.teh.id).await, 2);
}

pub async fn checkout_rejects_own_product<R: MarketStore>(repo: &R) {
    let m = seed(repo).await;
    let mut own = order(&m, "INV-5", &[(m.kopi.id, 1)]);
    own.id_user = m.seller.id;
    let err = repo.checkout(own).await.unwrap_err();
    assert!(matches!(err, CheckoutError::OwnProduct(id) if id == m.kopi.id));
    assert_eq!(stock(repo, m.kopi.id).await, 5);
}

pub async fn transactions_are_listed_newest_first<R: MarketStore>(repo: &R) {
    let m = seed(repo).await;
    let first = repo
        .checkout(order(&m, "INV-A", &[(m.kopi.id, 1)]))
        .await
        .unwrap();
    let second = repo
        .checkout(order(&m, "INV-B", &[(m.teh.id, 1)]))
        .await
        .unwrap();
    let list = repo.list_transactions(m.buyer.id).await.unwrap();
    let ids: Vec<i64> = list.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);

    // An address used by a transaction cannot be removed.
    let err = repo
        .delete_destination(m.alamat, m.buyer.id)
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Conflict(_)));
}

pub async fn users_are_unique_and_patchable<R: MarketStore>(repo: &R) {
    let user = repo.create_user(new_user("a")).await.unwrap();
    assert!(matches!(
        repo.create_user(new_user("a")).await,
        Err(RepoError::Conflict(_))
    ));

    let found = repo
        .find_users_by_email_or_phone("nobody@example.com", &user.no_telp)
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(
        repo.find_user_by_email(&user.email)
            .await
            .unwrap()
            .map(|u| u.id),
        Some(user.id)
    );

    let updated = repo
        .update_user(
            user.id,
            ProfileUpdate {
                pekerjaan: Some("Chef".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.pekerjaan.as_deref(), Some("Chef"));
    assert_eq!(updated.email, user.email);

    let other = repo.create_user(new_user("b")).await.unwrap();
    let clash = repo
        .update_user(
            other.id,
            ProfileUpdate {
                email: Some(user.email.clone()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(clash, Err(RepoError::Conflict(_))));
    assert!(repo
        .update_user(999, ProfileUpdate::default())
        .await
        .unwrap()
        .is_none());
}

pub async fn catalog_crud_and_filters<R: MarketStore>(repo: &R) {
    let m = seed(repo).await;

    let toko = repo
        .update_toko(
            m.toko.id,
            TokoUpdateRequest {
                nama_toko: Some("Kedai Kopi".into()),
                url_foto: None,
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(toko.nama_toko, "Kedai Kopi");
    assert_eq!(repo.list_toko().await.unwrap().len(), 2);
    assert_eq!(repo.list_toko_by_user(m.seller.id).await.unwrap().len(), 1);

    let filter = ProductFilter {
        nama_produk: Some("KOPI".into()),
        ..Default::default()
    };
    let (page, total) = repo.list_products(&filter).await.unwrap();
    assert_eq!(total, 1);
    assert_eq!(page[0].product.id, m.kopi.id);
    assert_eq!(
        page[0].toko.as_ref().map(|t| t.nama_toko.as_str()),
        Some("Kedai Kopi")
    );

    let filter = ProductFilter {
        max_harga: Some(30_000),
        limit: Some(1),
        ..Default::default()
    };
    let (page, total) = repo.list_products(&filter).await.unwrap();
    assert_eq!((page.len(), total), (1, 1));
    assert_eq!(page[0].product.id, m.teh.id);

    let filter = ProductFilter {
        limit: Some(1),
        page: Some(2),
        ..Default::default()
    };
    let (page, total) = repo.list_products(&filter).await.unwrap();
    assert_eq!(total, 2);
    assert_eq!(page[0].product.id, m.teh.id);

    // Categories with products cannot be deleted.
    let err = repo
        .delete_category(m.kopi.id_category)
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Conflict(_)));

    // Other shops cannot touch the product.
    assert!(!repo.delete_product(m.kopi.id, m.toko.id + 1).await.unwrap());
    assert!(repo.delete_product(m.kopi.id, m.toko.id).await.unwrap());
    assert!(repo.get_product(m.kopi.id).await.unwrap().is_none());
    assert!(repo.delete_product(m.teh.id, m.toko.id).await.unwrap());
    assert!(repo.delete_category(m.kopi.id_category).await.unwrap());
    assert!(repo
        .get_category(m.kopi.id_category)
        .await
        .unwrap()
        .is_none());
}

pub async fn destinations_are_scoped_to_owner<R: MarketStore>(repo: &R) {
    let m = seed(repo).await;
    assert!(repo
        .get_destination(m.alamat, m.seller.id)
        .await
        .unwrap()
        .is_none());
    assert!(!repo.delete_destination(m.alamat, m.seller.id).await.unwrap());

    let patched = repo
        .update_destination(
            m.alamat,
            m.buyer.id,
            tokoku_types::domain::destination::DestinationPatch {
                judul_alamat: Some("Kantor".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(patched.judul_alamat, "Kantor");
    assert_eq!(patched.nama_penerima, "Buyer");
    assert_eq!(repo.list_destinations(m.buyer.id).await.unwrap().len(), 1);
    assert!(repo.delete_destination(m.alamat, m.buyer.id).await.unwrap());
    assert!(repo.list_destinations(m.buyer.id).await.unwrap().is_empty());
}

pub async fn product_search_matches_literally<R: MarketStore>(repo: &R) {
    let m = seed(repo).await;
    let gula = repo
        .create_product(
            m.toko.id,
            draft(m.kopi.id_category, "Diskon 50% Gula_Aren", 30_000, 4),
        )
        .await
        .unwrap();

    let search = |term: &str| ProductFilter {
        nama_produk: Some(term.into()),
        ..Default::default()
    };
    for term in ["%", "_", "50%", "gula_aren"] {
        let (page, total) = repo.list_products(&search(term)).await.unwrap();
        assert_eq!(total, 1, "term {term:?}");
        assert_eq!(page[0].product.id, gula.id);
    }
    // Wildcards would match "Disk" and "Kopi Gayo" here.
    for term in ["i_k", "o%o", "\\"] {
        let (page, total) = repo.list_products(&search(term)).await.unwrap();
        assert_eq!((page.len(), total), (0, 0), "term {term:?}");
    }
}

pub async fn registration_creates_user_with_toko<R: MarketStore>(repo: &R) {
    let (user, toko) = repo
        .create_user_with_toko(new_user("sari"))
        .await
        .unwrap();
    assert_eq!(toko.id_user, user.id);
    assert_eq!(toko.nama_toko, "User sari's Toko");
    let owned = repo.list_toko_by_user(user.id).await.unwrap();
    assert_eq!(owned.len(), 1);
    assert_eq!(owned[0].id, toko.id);

    // A conflicting user leaves neither a user nor a toko behind.
    let mut dup = new_user("dewi");
    dup.email = user.email.clone();
    let err = repo.create_user_with_toko(dup).await.unwrap_err();
    assert!(matches!(err, RepoError::Conflict(_)));
    assert!(repo
        .find_users_by_email_or_phone("nobody@example.com", "0812dewi")
        .await
        .unwrap()
        .is_empty());
    assert_eq!(repo.list_toko().await.unwrap().len(), 1);
}
