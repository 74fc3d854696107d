mod common;

use std::sync::Arc;

use common::{register_request, state, DownRegions};
use tokoku_hex::application::auth_service::AdminSeed;
use tokoku_hex::application::security::{JwtService, PasswordHasher};
use tokoku_hex::domain::category::CategoryRequest;
use tokoku_hex::domain::destination::{DestinationRequest, DestinationUpdateRequest};
use tokoku_hex::domain::product::{ProductFilter, ProductRequest};
use tokoku_hex::domain::toko::TokoUpdateRequest;
use tokoku_hex::domain::transaction::{CreateTrxRequest, TrxItemRequest};
use tokoku_hex::domain::user::{LoginRequest, UpdateProfileRequest};
use tokoku_hex::errors::AppError;
use tokoku_hex::inbound::http::AppState;
use tokoku_repo::memory::InMemoryRepo;

fn login(email: &str, password: &str) -> LoginRequest {
    LoginRequest {
        email: email.into(),
        kata_sandi: password.into(),
    }
}

fn product(id_category: i64, nama: &str, harga: i64, stok: i64) -> ProductRequest {
    ProductRequest {
        id_category,
        nama_produk: nama.into(),
        slug: None,
        harga_reseller: harga - 5_000,
        harga_konsumen: harga,
        stok,
        deskripsi: format!("{nama} pilihan"),
        photos: vec![format!("https://img.example/{}.jpg", nama.to_lowercase())],
    }
}

fn alamat(judul: &str) -> DestinationRequest {
    DestinationRequest {
        judul_alamat: judul.into(),
        nama_penerima: "Budi".into(),
        no_telp: "0811111111".into(),
        detail_alamat: "Jl. Melati 7".into(),
    }
}

fn order(alamat_kirim: i64, items: &[(i64, i64)]) -> CreateTrxRequest {
    CreateTrxRequest {
        method_bayar: "gopay".into(),
        alamat_kirim,
        detail_trx: items
            .iter()
            .map(|&(product_id, kuantitas)| TrxItemRequest {
                product_id,
                kuantitas,
            })
            .collect(),
    }
}

#[tokio::test]
async fn register_creates_user_and_toko_then_login_issues_token() {
    let (state, _) = state();

    let user = state
        .auth
        .register(register_request("Sari", " sari@mail.com ", "0812"))
        .await
        .unwrap();
    assert_eq!(user.email, "sari@mail.com");
    assert!(!user.is_admin);
    assert_ne!(user.kata_sandi, "rahasia123");

    let mine = state.toko.list_mine(user.id).await.unwrap();
    assert_eq!(mine.len(), 1);

    let res = state
        .auth
        .login(login("sari@mail.com", "rahasia123"))
        .await
        .unwrap();
    assert_eq!(res.id, user.id);
    let claims = state.jwt.verify(&res.token).unwrap();
    assert_eq!(claims.user_id, user.id);
    assert!(!claims.is_admin);

    let wrong = state.auth.login(login("sari@mail.com", "salah123")).await;
    assert!(matches!(wrong, Err(AppError::Unauthorized(_))));
    let unknown = state.auth.login(login("nobody@mail.com", "rahasia123")).await;
    assert!(matches!(unknown, Err(AppError::Unauthorized(_))));
}

#[tokio::test]
async fn register_rejects_duplicates_and_bad_regions() {
    let (state, _) = state();
    state
        .auth
        .register(register_request("Sari", "sari@mail.com", "0812"))
        .await
        .unwrap();

    let both = state
        .auth
        .register(register_request("Sari", "sari@mail.com", "0812"))
        .await;
    assert!(matches!(both, Err(AppError::Conflict(m)) if m.contains("email and phone")));

    let phone = state
        .auth
        .register(register_request("Other", "other@mail.com", "0812"))
        .await;
    assert!(matches!(phone, Err(AppError::Conflict(m)) if m.contains("phone")));

    let mut req = register_request("Other", "other@mail.com", "0813");
    req.id_kota = "1101".into();
    let res = state.auth.register(req).await;
    assert!(matches!(res, Err(AppError::BadRequest(_))));

    let mut req = register_request("Other", "other@mail.com", "0813");
    req.kata_sandi = "123".into();
    assert!(matches!(
        state.auth.register(req).await,
        Err(AppError::BadRequest(_))
    ));
}

#[tokio::test]
async fn region_outage_surfaces_as_bad_gateway() {
    let state = AppState::new(
        Arc::new(InMemoryRepo::new()),
        Arc::new(DownRegions),
        JwtService::new(common::SECRET, 60),
        PasswordHasher::new(4),
    );
    let res = state
        .auth
        .register(register_request("Sari", "sari@mail.com", "0812"))
        .await;
    assert!(matches!(res, Err(AppError::BadGateway(_))));
    assert!(matches!(
        state.regions.list_provinces().await,
        Err(AppError::BadGateway(_))
    ));
}

#[tokio::test]
async fn profile_resolves_region_and_applies_updates() {
    let (state, _) = state();
    let sari = state
        .auth
        .register(register_request("Sari", "sari@mail.com", "0812"))
        .await
        .unwrap();
    state
        .auth
        .register(register_request("Dewi", "dewi@mail.com", "0813"))
        .await
        .unwrap();

    let profile = state.users.get_profile(sari.id).await.unwrap();
    assert_eq!(profile.provinsi.unwrap().name, "DKI JAKARTA");
    assert_eq!(profile.kota.unwrap().id, "3171");

    let moved_wrong = UpdateProfileRequest {
        id_provinsi: Some("11".into()),
        ..Default::default()
    };
    assert!(matches!(
        state.users.update_profile(sari.id, moved_wrong).await,
        Err(AppError::BadRequest(_))
    ));

    let clash = UpdateProfileRequest {
        email: Some("dewi@mail.com".into()),
        ..Default::default()
    };
    assert!(matches!(
        state.users.update_profile(sari.id, clash).await,
        Err(AppError::Conflict(_))
    ));

    let update = UpdateProfileRequest {
        nama: Some("Sari Dewi".into()),
        kata_sandi: Some("barubaru".into()),
        id_provinsi: Some("11".into()),
        id_kota: Some("1101".into()),
        ..Default::default()
    };
    let profile = state.users.update_profile(sari.id, update).await.unwrap();
    assert_eq!(profile.user.nama, "Sari Dewi");
    assert_eq!(profile.provinsi.unwrap().name, "ACEH");

    assert!(state
        .auth
        .login(login("sari@mail.com", "barubaru"))
        .await
        .is_ok());
    assert!(state
        .auth
        .login(login("sari@mail.com", "rahasia123"))
        .await
        .is_err());
}

#[tokio::test]
async fn toko_updates_are_owner_only() {
    let (state, _) = state();
    let sari = state
        .auth
        .register(register_request("Sari", "sari@mail.com", "0812"))
        .await
        .unwrap();
    let dewi = state
        .auth
        .register(register_request("Dewi", "dewi@mail.com", "0813"))
        .await
        .unwrap();
    let toko = state.toko.list_mine(sari.id).await.unwrap().remove(0);

    let patch = TokoUpdateRequest {
        nama_toko: Some("Warung Sari".into()),
        ..Default::default()
    };
    assert!(matches!(
        state.toko.update(toko.id, dewi.id, patch.clone()).await,
        Err(AppError::Forbidden(_))
    ));
    let updated = state.toko.update(toko.id, sari.id, patch).await.unwrap();
    assert_eq!(updated.nama_toko, "Warung Sari");
    assert_eq!(state.toko.list_all().await.unwrap().len(), 2);
    assert!(matches!(
        state.toko.get(999).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn admin_seed_is_idempotent() {
    let (state, _) = state();
    let seed = AdminSeed::new("admin@mail.com".into(), "admin123".into(), "0800".into());
    let admin = state.auth.seed_admin(seed.clone()).await.unwrap().unwrap();
    assert!(admin.is_admin);
    assert!(state.auth.seed_admin(seed).await.unwrap().is_none());

    let res = state
        .auth
        .login(login("admin@mail.com", "admin123"))
        .await
        .unwrap();
    assert!(state.jwt.verify(&res.token).unwrap().is_admin);
}

#[tokio::test]
async fn catalog_and_checkout_flow() {
    let (state, _) = state();
    let seller = state
        .auth
        .register(register_request("Sari", "sari@mail.com", "0812"))
        .await
        .unwrap();
    let buyer = state
        .auth
        .register(register_request("Dewi", "dewi@mail.com", "0813"))
        .await
        .unwrap();

    let minuman = state
        .categories
        .create(CategoryRequest {
            nama_category: "Minuman".into(),
        })
        .await
        .unwrap();
    assert!(matches!(
        state
            .categories
            .create(CategoryRequest {
                nama_category: "  ".into()
            })
            .await,
        Err(AppError::BadRequest(_))
    ));

    let kopi = state
        .products
        .create(seller.id, product(minuman.id, "Kopi Gayo", 50_000, 5))
        .await
        .unwrap();
    assert!(matches!(
        state
            .products
            .create(seller.id, product(999, "Teh", 10_000, 1))
            .await,
        Err(AppError::BadRequest(_))
    ));

    let detail = state.products.get(kopi).await.unwrap();
    assert_eq!(detail.product.slug, "kopi-gayo");
    assert_eq!(detail.photos.len(), 1);
    assert_eq!(detail.category.unwrap().nama_category, "Minuman");

    let page = state
        .products
        .list(ProductFilter {
            nama_produk: Some("kopi".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    let bad_range = ProductFilter {
        min_harga: Some(10),
        max_harga: Some(5),
        ..Default::default()
    };
    assert!(matches!(
        state.products.list(bad_range).await,
        Err(AppError::BadRequest(_))
    ));

    let rumah = state.destinations.create(buyer.id, alamat("Rumah")).await.unwrap();
    let seller_home = state
        .destinations
        .create(seller.id, alamat("Kantor"))
        .await
        .unwrap();

    let trx_id = state
        .transactions
        .create(buyer.id, order(rumah.id, &[(kopi, 2)]))
        .await
        .unwrap();
    assert_eq!(state.products.get(kopi).await.unwrap().product.stok, 3);

    let view = state.transactions.get(trx_id, buyer.id).await.unwrap();
    assert_eq!(view.harga_total, 100_000);
    assert!(view.kode_invoice.starts_with("INV-"));
    assert_eq!(view.detail_trx.len(), 1);
    assert_eq!(view.detail_trx[0].product.nama_produk, "Kopi Gayo");
    assert_eq!(view.alamat_kirim.unwrap().id, rumah.id);
    assert!(matches!(
        state.transactions.get(trx_id, seller.id).await,
        Err(AppError::NotFound(_))
    ));

    // Later price edits do not rewrite history.
    state
        .products
        .update(kopi, seller.id, product(minuman.id, "Kopi Gayo", 75_000, 3))
        .await
        .unwrap();
    let view = state.transactions.get(trx_id, buyer.id).await.unwrap();
    assert_eq!(view.detail_trx[0].product.harga_konsumen, 50_000);

    let too_many = state
        .transactions
        .create(buyer.id, order(rumah.id, &[(kopi, 10)]))
        .await;
    assert!(matches!(too_many, Err(AppError::Conflict(_))));
    assert_eq!(state.products.get(kopi).await.unwrap().product.stok, 3);

    let own = state
        .transactions
        .create(seller.id, order(seller_home.id, &[(kopi, 1)]))
        .await;
    assert!(matches!(own, Err(AppError::BadRequest(_))));

    let foreign_address = state
        .transactions
        .create(buyer.id, order(seller_home.id, &[(kopi, 1)]))
        .await;
    assert!(matches!(foreign_address, Err(AppError::NotFound(_))));

    let missing = state
        .transactions
        .create(buyer.id, order(rumah.id, &[(4242, 1)]))
        .await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));

    let bad_method = CreateTrxRequest {
        method_bayar: "bitcoin".into(),
        ..order(rumah.id, &[(kopi, 1)])
    };
    assert!(matches!(
        state.transactions.create(buyer.id, bad_method).await,
        Err(AppError::BadRequest(_))
    ));

    assert_eq!(state.transactions.list(buyer.id).await.unwrap().len(), 1);
    assert!(state.transactions.list(seller.id).await.unwrap().is_empty());

    assert!(matches!(
        state.categories.delete(minuman.id).await,
        Err(AppError::Conflict(_))
    ));
    assert!(matches!(
        state.destinations.delete(rumah.id, buyer.id).await,
        Err(AppError::Conflict(_))
    ));

    state.products.delete(kopi, seller.id).await.unwrap();
    assert!(matches!(
        state.products.get(kopi).await,
        Err(AppError::NotFound(_))
    ));
    // The snapshot outlives the product.
    let view = state.transactions.get(trx_id, buyer.id).await.unwrap();
    assert_eq!(view.detail_trx[0].product.id_produk, kopi);
}

#[tokio::test]
async fn destinations_are_private_to_their_owner() {
    let (state, _) = state();
    let sari = state
        .auth
        .register(register_request("Sari", "sari@mail.com", "0812"))
        .await
        .unwrap();
    let dewi = state
        .auth
        .register(register_request("Dewi", "dewi@mail.com", "0813"))
        .await
        .unwrap();

    let home = state.destinations.create(sari.id, alamat("Rumah")).await.unwrap();
    assert!(matches!(
        state.destinations.get(home.id, dewi.id).await,
        Err(AppError::NotFound(_))
    ));

    let patch = DestinationUpdateRequest {
        judul_alamat: Some("Rumah Baru".into()),
        ..Default::default()
    };
    assert!(matches!(
        state.destinations.update(home.id, dewi.id, patch.clone()).await,
        Err(AppError::NotFound(_))
    ));
    let updated = state.destinations.update(home.id, sari.id, patch).await.unwrap();
    assert_eq!(updated.judul_alamat, "Rumah Baru");
    assert_eq!(updated.nama_penerima, "Budi");

    assert!(matches!(
        state.destinations.delete(home.id, dewi.id).await,
        Err(AppError::NotFound(_))
    ));
    state.destinations.delete(home.id, sari.id).await.unwrap();
    assert!(state.destinations.list(sari.id).await.unwrap().is_empty());

    let mut blank = alamat("Rumah");
    blank.detail_alamat = " ".into();
    assert!(matches!(
        state.destinations.create(sari.id, blank).await,
        Err(AppError::BadRequest(_))
    ));
}
