use axum::extract::State;
use tokoku_types::domain::user::{LoginRequest, RegisterRequest, User};
use tokoku_types::ports::region_directory::RegionDirectory;
use tokoku_types::ports::MarketStore;

use crate::application::auth_service::LoginResponse;
use crate::errors::AppError;
use crate::inbound::http::extract::JsonBody;
use crate::inbound::http::response::{created, ok, ApiResponse};
use crate::inbound::http::state::AppState;

pub async fn register<R: MarketStore, D: RegionDirectory>(
    State(state): State<AppState<R, D>>,
    JsonBody(req): JsonBody<RegisterRequest>,
) -> Result<ApiResponse<User>, AppError> {
    let user = state.auth.register(req).await?;
    Ok(created(user))
}

pub async fn login<R: MarketStore, D: RegionDirectory>(
    State(state): State<AppState<R, D>>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> Result<ApiResponse<LoginResponse>, AppError> {
    let res = state.auth.login(req).await?;
    Ok(ok("POST", res))
}
