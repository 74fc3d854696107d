use async_trait::async_trait;

use super::RepoError;
use crate::domain::destination::{Destination, DestinationPatch, NewDestination};

/// Every lookup is scoped to the owning user; another user's address is
/// indistinguishable from a missing one.
#[async_trait]
pub trait DestinationRepository: Send + Sync + 'static {
    async fn create_destination(
        &self,
        id_user: i64,
        destination: NewDestination,
    ) -> Result<Destination, RepoError>;
    async fn get_destination(&self, id: i64, id_user: i64)
        -> Result<Option<Destination>, RepoError>;
    async fn list_destinations(&self, id_user: i64) -> Result<Vec<Destination>, RepoError>;
    async fn update_destination(
        &self,
        id: i64,
        id_user: i64,
        patch: DestinationPatch,
    ) -> Result<Option<Destination>, RepoError>;
    /// [`RepoError::Conflict`] when a transaction ships to this address.
    async fn delete_destination(&self, id: i64, id_user: i64) -> Result<bool, RepoError>;
}
