use axum::extract::{Path, State};
use tokoku_types::domain::category::{Category, CategoryRequest};
use tokoku_types::ports::region_directory::RegionDirectory;
use tokoku_types::ports::MarketStore;

use crate::errors::AppError;
use crate::inbound::http::extract::{parse_id, AdminUser, AuthUser, JsonBody};
use crate::inbound::http::response::{created, ok, ApiResponse};
use crate::inbound::http::state::AppState;

pub async fn list<R: MarketStore, D: RegionDirectory>(
    State(state): State<AppState<R, D>>,
    _user: AuthUser,
) -> Result<ApiResponse<Vec<Category>>, AppError> {
    Ok(ok("GET", state.categories.list().await?))
}

pub async fn get<R: MarketStore, D: RegionDirectory>(
    State(state): State<AppState<R, D>>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> Result<ApiResponse<Category>, AppError> {
    let id = parse_id(&id)?;
    Ok(ok("GET", state.categories.get(id).await?))
}

pub async fn create<R: MarketStore, D: RegionDirectory>(
    State(state): State<AppState<R, D>>,
    _admin: AdminUser,
    JsonBody(req): JsonBody<CategoryRequest>,
) -> Result<ApiResponse<Category>, AppError> {
    Ok(created(state.categories.create(req).await?))
}

pub async fn update<R: MarketStore, D: RegionDirectory>(
    State(state): State<AppState<R, D>>,
    _admin: AdminUser,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<CategoryRequest>,
) -> Result<ApiResponse<Category>, AppError> {
    let id = parse_id(&id)?;
    Ok(ok("UPDATE", state.categories.update(id, req).await?))
}

pub async fn delete<R: MarketStore, D: RegionDirectory>(
    State(state): State<AppState<R, D>>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<ApiResponse<()>, AppError> {
    let id = parse_id(&id)?;
    state.categories.delete(id).await?;
    Ok(ok("DELETE", ()))
}
