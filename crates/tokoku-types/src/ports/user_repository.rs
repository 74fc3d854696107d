use async_trait::async_trait;

use super::RepoError;
use crate::domain::toko::Toko;
use crate::domain::user::{NewUser, ProfileUpdate, User};

#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Fails with [`RepoError::Conflict`] when email or phone is taken.
    async fn create_user(&self, user: NewUser) -> Result<User, RepoError>;
    /// Creates the user together with its default toko, or neither.
    async fn create_user_with_toko(&self, user: NewUser) -> Result<(User, Toko), RepoError>;
    async fn get_user(&self, id: i64) -> Result<Option<User>, RepoError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;
    /// Users whose email or phone equals one of the given values.
    async fn find_users_by_email_or_phone(
        &self,
        email: &str,
        no_telp: &str,
    ) -> Result<Vec<User>, RepoError>;
    async fn update_user(&self, id: i64, update: ProfileUpdate)
        -> Result<Option<User>, RepoError>;
}
