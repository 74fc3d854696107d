use axum::extract::{Path, State};
use tokoku_types::domain::destination::{Destination, DestinationRequest, DestinationUpdateRequest};
use tokoku_types::ports::region_directory::RegionDirectory;
use tokoku_types::ports::MarketStore;

use crate::errors::AppError;
use crate::inbound::http::extract::{parse_id, AuthUser, JsonBody};
use crate::inbound::http::response::{created, ok, ApiResponse};
use crate::inbound::http::state::AppState;

pub async fn create<R: MarketStore, D: RegionDirectory>(
    State(state): State<AppState<R, D>>,
    user: AuthUser,
    JsonBody(req): JsonBody<DestinationRequest>,
) -> Result<ApiResponse<Destination>, AppError> {
    let destination = state.destinations.create(user.user_id, req).await?;
    Ok(created(destination))
}

pub async fn list<R: MarketStore, D: RegionDirectory>(
    State(state): State<AppState<R, D>>,
    user: AuthUser,
) -> Result<ApiResponse<Vec<Destination>>, AppError> {
    Ok(ok("GET", state.destinations.list(user.user_id).await?))
}

pub async fn get<R: MarketStore, D: RegionDirectory>(
    State(state): State<AppState<R, D>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<ApiResponse<Destination>, AppError> {
    let id = parse_id(&id)?;
    Ok(ok("GET", state.destinations.get(id, user.user_id).await?))
}

pub async fn update<R: MarketStore, D: RegionDirectory>(
    State(state): State<AppState<R, D>>,
    user: AuthUser,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<DestinationUpdateRequest>,
) -> Result<ApiResponse<Destination>, AppError> {
    let id = parse_id(&id)?;
    let destination = state.destinations.update(id, user.user_id, req).await?;
    Ok(ok("UPDATE", destination))
}

pub async fn delete<R: MarketStore, D: RegionDirectory>(
    State(state): State<AppState<R, D>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<ApiResponse<()>, AppError> {
    let id = parse_id(&id)?;
    state.destinations.delete(id, user.user_id).await?;
    Ok(ok("DELETE", ()))
}
