// handlers/protected/assignments/my_clients.rs - GET /api/assignments/my-clients handler

use axum::extract::State;

use crate::database::models::ClientSummary;
use crate::middleware::{ApiResponse, ApiResult, CallerContext};
use crate::services::ClientService;
use crate::state::AppState;

pub async fn my_clients(State(state): State<AppState>, ctx: CallerContext) -> ApiResult<Vec<ClientSummary>> {
    let clients = ClientService::new(state.store.as_ref()).visible_to(&ctx).await?;
    Ok(ApiResponse::success("clients", clients))
}
