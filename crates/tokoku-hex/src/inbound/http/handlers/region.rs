use axum::extract::{Path, State};
use tokoku_types::domain::region::{City, Province};
use tokoku_types::ports::region_directory::RegionDirectory;
use tokoku_types::ports::MarketStore;

use crate::errors::AppError;
use crate::inbound::http::response::{ok, ApiResponse};
use crate::inbound::http::state::AppState;

pub async fn list_provinces<R: MarketStore, D: RegionDirectory>(
    State(state): State<AppState<R, D>>,
) -> Result<ApiResponse<Vec<Province>>, AppError> {
    Ok(ok("GET", state.regions.list_provinces().await?))
}

pub async fn province_detail<R: MarketStore, D: RegionDirectory>(
    State(state): State<AppState<R, D>>,
    Path(province_id): Path<String>,
) -> Result<ApiResponse<Province>, AppError> {
    Ok(ok("GET", state.regions.province_detail(&province_id).await?))
}

pub async fn list_cities<R: MarketStore, D: RegionDirectory>(
    State(state): State<AppState<R, D>>,
    Path(province_id): Path<String>,
) -> Result<ApiResponse<Vec<City>>, AppError> {
    Ok(ok("GET", state.regions.list_cities(&province_id).await?))
}

pub async fn city_detail<R: MarketStore, D: RegionDirectory>(
    State(state): State<AppState<R, D>>,
    Path((province_id, city_id)): Path<(String, String)>,
) -> Result<ApiResponse<City>, AppError> {
    Ok(ok(
        "GET",
        state.regions.city_detail(&province_id, &city_id).await?,
    ))
}
