use std::sync::Arc;

use tokoku_types::domain::region::{City, Province};
use tokoku_types::ports::region_directory::RegionDirectory;

use crate::errors::AppError;

pub struct RegionService<D: RegionDirectory> {
    directory: Arc<D>,
}

impl<D: RegionDirectory> Clone for RegionService<D> {
    fn clone(&self) -> Self {
        Self {
            directory: self.directory.clone(),
        }
    }
}

fn require<'a>(field: &str, value: &'a str) -> Result<&'a str, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::BadRequest(format!("{field} required")));
    }
    Ok(value)
}

impl<D: RegionDirectory> RegionService<D> {
    pub fn new(directory: Arc<D>) -> Self {
        Self { directory }
    }

    pub async fn list_provinces(&self) -> Result<Vec<Province>, AppError> {
        Ok(self.directory.provinces().await?)
    }

    pub async fn list_cities(&self, province_id: &str) -> Result<Vec<City>, AppError> {
        let province_id = require("province_id", province_id)?;
        Ok(self.directory.cities(province_id).await?)
    }

    pub async fn province_detail(&self, province_id: &str) -> Result<Province, AppError> {
        let province_id = require("province_id", province_id)?;
        self.find_province(province_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("province {province_id}")))
    }

    pub async fn city_detail(&self, province_id: &str, city_id: &str) -> Result<City, AppError> {
        let province_id = require("province_id", province_id)?;
        let city_id = require("city_id", city_id)?;
        self.find_city(province_id, city_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("city {city_id} in province {province_id}")))
    }

    /// Checks that the province exists and the city belongs to it.
    pub async fn validate_region(
        &self,
        province_id: &str,
        city_id: &str,
    ) -> Result<(Province, City), AppError> {
        let province_id = require("id_provinsi", province_id)?;
        let city_id = require("id_kota", city_id)?;
        let province = self
            .find_province(province_id)
            .await?
            .ok_or_else(|| AppError::BadRequest(format!("unknown province {province_id}")))?;
        let city = self.find_city(province_id, city_id).await?.ok_or_else(|| {
            AppError::BadRequest(format!(
                "city {city_id} does not belong to province {province_id}"
            ))
        })?;
        Ok((province, city))
    }

    pub(crate) async fn find_province(&self, id: &str) -> Result<Option<Province>, AppError> {
        let provinces = self.directory.provinces().await?;
        Ok(provinces.into_iter().find(|p| p.id == id))
    }

    pub(crate) async fn find_city(
        &self,
        province_id: &str,
        city_id: &str,
    ) -> Result<Option<City>, AppError> {
        let cities = self.directory.cities(province_id).await?;
        Ok(cities.into_iter().find(|c| c.id == city_id))
    }
}
