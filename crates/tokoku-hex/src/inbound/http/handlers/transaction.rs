use axum::extract::{Path, State};
use tokoku_types::domain::transaction::{CreateTrxRequest, TransactionView};
use tokoku_types::ports::region_directory::RegionDirectory;
use tokoku_types::ports::MarketStore;

use crate::errors::AppError;
use crate::inbound::http::extract::{parse_id, AuthUser, JsonBody};
use crate::inbound::http::handlers::product::Created;
use crate::inbound::http::response::{created, ok, ApiResponse};
use crate::inbound::http::state::AppState;

pub async fn create<R: MarketStore, D: RegionDirectory>(
    State(state): State<AppState<R, D>>,
    user: AuthUser,
    JsonBody(req): JsonBody<CreateTrxRequest>,
) -> Result<ApiResponse<Created>, AppError> {
    let id = state.transactions.create(user.user_id, req).await?;
    Ok(created(Created { id }))
}

pub async fn list<R: MarketStore, D: RegionDirectory>(
    State(state): State<AppState<R, D>>,
    user: AuthUser,
) -> Result<ApiResponse<Vec<TransactionView>>, AppError> {
    Ok(ok("GET", state.transactions.list(user.user_id).await?))
}

pub async fn get<R: MarketStore, D: RegionDirectory>(
    State(state): State<AppState<R, D>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<ApiResponse<TransactionView>, AppError> {
    let id = parse_id(&id)?;
    Ok(ok("GET", state.transactions.get(id, user.user_id).await?))
}
