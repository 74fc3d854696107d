use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokoku_types::domain::user::{LoginRequest, NewUser, RegisterRequest, User};
use tokoku_types::ports::region_directory::RegionDirectory;
use tokoku_types::ports::MarketStore;

use crate::application::region_service::RegionService;
use crate::application::security::{JwtService, PasswordHasher};
use crate::errors::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub id: i64,
    pub nama: String,
    pub token: String,
}

/// Bootstrap administrator, created once at startup.
#[derive(Debug, Clone)]
pub struct AdminSeed {
    pub nama: String,
    pub email: String,
    pub no_telp: String,
    pub password: String,
    pub id_provinsi: String,
    pub id_kota: String,
}

impl AdminSeed {
    pub fn new(email: String, password: String, no_telp: String) -> Self {
        Self {
            nama: "Super Admin".into(),
            email,
            no_telp,
            password,
            id_provinsi: "31".into(),
            id_kota: "3171".into(),
        }
    }
}

pub struct AuthService<R: MarketStore, D: RegionDirectory> {
    repo: Arc<R>,
    region: RegionService<D>,
    jwt: Arc<JwtService>,
    hasher: PasswordHasher,
}

const BAD_CREDENTIALS: &str = "wrong email or password";

impl<R: MarketStore, D: RegionDirectory> AuthService<R, D> {
    pub fn new(
        repo: Arc<R>,
        region: RegionService<D>,
        jwt: Arc<JwtService>,
        hasher: PasswordHasher,
    ) -> Self {
        Self {
            repo,
            region,
            jwt,
            hasher,
        }
    }

    pub async fn register(&self, req: RegisterRequest) -> Result<User, AppError> {
        let req = req.validate().map_err(AppError::bad_request)?;

        let existing = self
            .repo
            .find_users_by_email_or_phone(&req.email, &req.no_telp)
            .await?;
        let email_taken = existing.iter().any(|u| u.email == req.email);
        let phone_taken = existing.iter().any(|u| u.no_telp == req.no_telp);
        match (email_taken, phone_taken) {
            (true, true) => {
                return Err(AppError::Conflict(
                    "email and phone number already in use".into(),
                ))
            }
            (true, false) => return Err(AppError::Conflict("email already in use".into())),
            (false, true) => {
                return Err(AppError::Conflict("phone number already in use".into()))
            }
            (false, false) => {}
        }

        self.region
            .validate_region(&req.id_provinsi, &req.id_kota)
            .await?;

        let hash = self.hasher.hash(&req.kata_sandi).await?;
        let new_user = req.into_new_user(hash).map_err(AppError::bad_request)?;
        let (user, toko) = self.repo.create_user_with_toko(new_user).await?;

        tracing::info!(user_id = user.id, toko_id = toko.id, "user registered");
        Ok(user)
    }

    pub async fn login(&self, req: LoginRequest) -> Result<LoginResponse, AppError> {
        let email = req.email.trim();
        let Some(user) = self.repo.find_user_by_email(email).await? else {
            return Err(AppError::Unauthorized(BAD_CREDENTIALS.into()));
        };
        if !self.hasher.verify(&req.kata_sandi, &user.kata_sandi).await? {
            tracing::debug!(user_id = user.id, "password mismatch");
            return Err(AppError::Unauthorized(BAD_CREDENTIALS.into()));
        }
        let token = self.jwt.issue(user.id, user.is_admin)?;
        Ok(LoginResponse {
            id: user.id,
            nama: user.nama,
            token,
        })
    }

    /// Creates the admin unless the email is already registered.
    pub async fn seed_admin(&self, seed: AdminSeed) -> Result<Option<User>, AppError> {
        if self.repo.find_user_by_email(&seed.email).await?.is_some() {
            tracing::debug!(email = %seed.email, "admin already present");
            return Ok(None);
        }
        let hash = self.hasher.hash(&seed.password).await?;
        let admin = self
            .repo
            .create_user(NewUser {
                nama: seed.nama,
                email: seed.email,
                no_telp: seed.no_telp,
                kata_sandi: hash,
                tanggal_lahir: None,
                jenis_kelamin: None,
                tentang: Some("System Administrator".into()),
                pekerjaan: Some("Admin".into()),
                id_provinsi: seed.id_provinsi,
                id_kota: seed.id_kota,
                is_admin: true,
            })
            .await?;
        tracing::info!(user_id = admin.id, "admin account seeded");
        Ok(Some(admin))
    }
}
