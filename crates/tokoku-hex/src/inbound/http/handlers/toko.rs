use axum::extract::{Path, State};
use tokoku_types::domain::toko::{Toko, TokoUpdateRequest};
use tokoku_types::ports::region_directory::RegionDirectory;
use tokoku_types::ports::MarketStore;

use crate::errors::AppError;
use crate::inbound::http::extract::{parse_id, AuthUser, JsonBody};
use crate::inbound::http::response::{ok, ApiResponse};
use crate::inbound::http::state::AppState;

pub async fn list_all<R: MarketStore, D: RegionDirectory>(
    State(state): State<AppState<R, D>>,
) -> Result<ApiResponse<Vec<Toko>>, AppError> {
    Ok(ok("GET", state.toko.list_all().await?))
}

pub async fn list_mine<R: MarketStore, D: RegionDirectory>(
    State(state): State<AppState<R, D>>,
    user: AuthUser,
) -> Result<ApiResponse<Vec<Toko>>, AppError> {
    Ok(ok("GET", state.toko.list_mine(user.user_id).await?))
}

pub async fn get<R: MarketStore, D: RegionDirectory>(
    State(state): State<AppState<R, D>>,
    Path(id): Path<String>,
) -> Result<ApiResponse<Toko>, AppError> {
    let id = parse_id(&id)?;
    Ok(ok("GET", state.toko.get(id).await?))
}

pub async fn update<R: MarketStore, D: RegionDirectory>(
    State(state): State<AppState<R, D>>,
    user: AuthUser,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<TokoUpdateRequest>,
) -> Result<ApiResponse<Toko>, AppError> {
    let id = parse_id(&id)?;
    Ok(ok("UPDATE", state.toko.update(id, user.user_id, req).await?))
}
