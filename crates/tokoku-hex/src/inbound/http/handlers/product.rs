use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use serde::Serialize;
use tokoku_types::domain::page::Page;
use tokoku_types::domain::product::{ProductDetail, ProductFilter, ProductRequest};
use tokoku_types::ports::region_directory::RegionDirectory;
use tokoku_types::ports::MarketStore;

use crate::errors::AppError;
use crate::inbound::http::extract::{parse_id, AuthUser, JsonBody};
use crate::inbound::http::response::{created, ok, ApiResponse};
use crate::inbound::http::state::AppState;

#[derive(Serialize)]
pub struct Created {
    pub id: i64,
}

pub async fn list<R: MarketStore, D: RegionDirectory>(
    State(state): State<AppState<R, D>>,
    filter: Result<Query<ProductFilter>, QueryRejection>,
) -> Result<ApiResponse<Page<ProductDetail>>, AppError> {
    let Query(filter) = filter.map_err(|e| AppError::BadRequest(e.body_text()))?;
    Ok(ok("GET", state.products.list(filter).await?))
}

pub async fn get<R: MarketStore, D: RegionDirectory>(
    State(state): State<AppState<R, D>>,
    Path(id): Path<String>,
) -> Result<ApiResponse<ProductDetail>, AppError> {
    let id = parse_id(&id)?;
    Ok(ok("GET", state.products.get(id).await?))
}

pub async fn create<R: MarketStore, D: RegionDirectory>(
    State(state): State<AppState<R, D>>,
    user: AuthUser,
    JsonBody(req): JsonBody<ProductRequest>,
) -> Result<ApiResponse<Created>, AppError> {
    let id = state.products.create(user.user_id, req).await?;
    Ok(created(Created { id }))
}

pub async fn update<R: MarketStore, D: RegionDirectory>(
    State(state): State<AppState<R, D>>,
    user: AuthUser,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<ProductRequest>,
) -> Result<ApiResponse<ProductDetail>, AppError> {
    let id = parse_id(&id)?;
    Ok(ok("UPDATE", state.products.update(id, user.user_id, req).await?))
}

pub async fn delete<R: MarketStore, D: RegionDirectory>(
    State(state): State<AppState<R, D>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<ApiResponse<()>, AppError> {
    let id = parse_id(&id)?;
    state.products.delete(id, user.user_id).await?;
    Ok(ok("DELETE", ()))
}
