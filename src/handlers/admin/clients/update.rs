// handlers/admin/clients/update.rs - PATCH /api/admin/clients/update handler

use axum::extract::State;

use crate::database::models::Client;
use crate::middleware::{AdminContext, ApiJson, ApiResponse, ApiResult};
use crate::services::client_service::UpdateClient;
use crate::services::ClientService;
use crate::state::AppState;

pub async fn clients_update(
    State(state): State<AppState>,
    ctx: AdminContext,
    ApiJson(request): ApiJson<UpdateClient>,
) -> ApiResult<Client> {
    let client = ClientService::new(state.store.as_ref()).update(&ctx, request).await?;
    Ok(ApiResponse::success("client", client))
}
