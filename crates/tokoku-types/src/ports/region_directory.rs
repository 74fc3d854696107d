use async_trait::async_trait;

use crate::domain::region::{City, Province};

#[derive(thiserror::Error, Debug)]
pub enum RegionError {
    #[error("region api unavailable: {0}")]
    Unavailable(String),
}

/// Source of Indonesian provinces and their cities.
#[async_trait]
pub trait RegionDirectory: Send + Sync + 'static {
    async fn provinces(&self) -> Result<Vec<Province>, RegionError>;
    /// Empty when the province is unknown.
    async fn cities(&self, province_id: &str) -> Result<Vec<City>, RegionError>;
}
