#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use tokoku_hex::application::security::{JwtService, PasswordHasher};
use tokoku_hex::domain::region::{City, Province};
use tokoku_hex::domain::user::RegisterRequest;
use tokoku_hex::inbound::http::AppState;
use tokoku_hex::ports::region_directory::{RegionDirectory, RegionError};
use tokoku_repo::memory::InMemoryRepo;

pub const SECRET: &str = "test-secret";

/// Two provinces with one city each.
pub struct FakeRegions;

#[async_trait]
impl RegionDirectory for FakeRegions {
    async fn provinces(&self) -> Result<Vec<Province>, RegionError> {
        Ok(vec![
            Province {
                id: "11".into(),
                name: "ACEH".into(),
            },
            Province {
                id: "31".into(),
                name: "DKI JAKARTA".into(),
            },
        ])
    }

    async fn cities(&self, province_id: &str) -> Result<Vec<City>, RegionError> {
        let cities = match province_id {
            "11" => vec![City {
                id: "1101".into(),
                province_id: "11".into(),
                name: "KABUPATEN SIMEULUE".into(),
            }],
            "31" => vec![City {
                id: "3171".into(),
                province_id: "31".into(),
                name: "KOTA JAKARTA SELATAN".into(),
            }],
            _ => vec![],
        };
        Ok(cities)
    }
}

/// Region API that is always down.
pub struct DownRegions;

#[async_trait]
impl RegionDirectory for DownRegions {
    async fn provinces(&self) -> Result<Vec<Province>, RegionError> {
        Err(RegionError::Unavailable("connection refused".into()))
    }

    async fn cities(&self, _: &str) -> Result<Vec<City>, RegionError> {
        Err(RegionError::Unavailable("connection refused".into()))
    }
}

pub fn state() -> (AppState<InMemoryRepo, FakeRegions>, Arc<InMemoryRepo>) {
    let repo = Arc::new(InMemoryRepo::new());
    let state = AppState::new(
        repo.clone(),
        Arc::new(FakeRegions),
        JwtService::new(SECRET, 60),
        PasswordHasher::new(4),
    );
    (state, repo)
}

pub fn register_request(nama: &str, email: &str, phone: &str) -> RegisterRequest {
    RegisterRequest {
        nama: nama.into(),
        email: email.into(),
        no_telp: phone.into(),
        kata_sandi: "rahasia123".into(),
        id_provinsi: "31".into(),
        id_kota: "3171".into(),
        tanggal_lahir: Some("1999-02-01".into()),
        jenis_kelamin: Some("L".into()),
        tentang: None,
        pekerjaan: Some("Engineer".into()),
    }
}
