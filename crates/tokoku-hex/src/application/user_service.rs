use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokoku_types::domain::region::{City, Province};
use tokoku_types::domain::user::{UpdateProfileRequest, User};
use tokoku_types::ports::region_directory::RegionDirectory;
use tokoku_types::ports::MarketStore;

use crate::application::region_service::RegionService;
use crate::application::security::PasswordHasher;
use crate::errors::AppError;

/// A user with their province and city resolved through the region API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    #[serde(flatten)]
    pub user: User,
    pub provinsi: Option<Province>,
    pub kota: Option<City>,
}

pub struct UserService<R: MarketStore, D: RegionDirectory> {
    repo: Arc<R>,
    region: RegionService<D>,
    hasher: PasswordHasher,
}

impl<R: MarketStore, D: RegionDirectory> UserService<R, D> {
    pub fn new(repo: Arc<R>, region: RegionService<D>, hasher: PasswordHasher) -> Self {
        Self {
            repo,
            region,
            hasher,
        }
    }

    pub async fn get_profile(&self, user_id: i64) -> Result<Profile, AppError> {
        let user = self
            .repo
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {user_id}")))?;
        self.resolve(user).await
    }

    pub async fn update_profile(
        &self,
        user_id: i64,
        req: UpdateProfileRequest,
    ) -> Result<Profile, AppError> {
        let mut update = req.into_update().map_err(AppError::bad_request)?;
        let current = self
            .repo
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {user_id}")))?;

        if update.id_provinsi.is_some() || update.id_kota.is_some() {
            let province = update.id_provinsi.as_deref().unwrap_or(&current.id_provinsi);
            let city = update.id_kota.as_deref().unwrap_or(&current.id_kota);
            self.region.validate_region(province, city).await?;
        }

        if update.email.is_some() || update.no_telp.is_some() {
            let email = update.email.as_deref().unwrap_or_default();
            let phone = update.no_telp.as_deref().unwrap_or_default();
            let clash = self
                .repo
                .find_users_by_email_or_phone(email, phone)
                .await?
                .into_iter()
                .any(|u| u.id != user_id);
            if clash {
                return Err(AppError::Conflict(
                    "email or phone number already in use".into(),
                ));
            }
        }

        if let Some(password) = update.kata_sandi.take() {
            update.kata_sandi = Some(self.hasher.hash(&password).await?);
        }

        let user = self
            .repo
            .update_user(user_id, update)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {user_id}")))?;
        tracing::info!(user_id, "profile updated");
        self.resolve(user).await
    }

    async fn resolve(&self, user: User) -> Result<Profile, AppError> {
        let provinsi = self.region.find_province(&user.id_provinsi).await?;
        let kota = self.region.find_city(&user.id_provinsi, &user.id_kota).await?;
        Ok(Profile {
            user,
            provinsi,
            kota,
        })
    }
}
