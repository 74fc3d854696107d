use axum::extract::State;
use tokoku_types::domain::user::UpdateProfileRequest;
use tokoku_types::ports::region_directory::RegionDirectory;
use tokoku_types::ports::MarketStore;

use crate::application::user_service::Profile;
use crate::errors::AppError;
use crate::inbound::http::extract::{AuthUser, JsonBody};
use crate::inbound::http::response::{ok, ApiResponse};
use crate::inbound::http::state::AppState;

pub async fn get_profile<R: MarketStore, D: RegionDirectory>(
    State(state): State<AppState<R, D>>,
    user: AuthUser,
) -> Result<ApiResponse<Profile>, AppError> {
    let profile = state.users.get_profile(user.user_id).await?;
    Ok(ok("GET", profile))
}

pub async fn update_profile<R: MarketStore, D: RegionDirectory>(
    State(state): State<AppState<R, D>>,
    user: AuthUser,
    JsonBody(req): JsonBody<UpdateProfileRequest>,
) -> Result<ApiResponse<Profile>, AppError> {
    let profile = state.users.update_profile(user.user_id, req).await?;
    Ok(ok("UPDATE", profile))
}
