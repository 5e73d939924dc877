// handlers/admin/clients/list.rs - GET /api/admin/clients/list handler

use axum::extract::State;

use crate::database::models::Client;
use crate::middleware::{AdminContext, ApiResponse, ApiResult};
use crate::services::ClientService;
use crate::state::AppState;

pub async fn clients_list(State(state): State<AppState>, ctx: AdminContext) -> ApiResult<Vec<Client>> {
    let clients = ClientService::new(state.store.as_ref()).list(&ctx).await?;
    Ok(ApiResponse::success("clients", clients))
}
