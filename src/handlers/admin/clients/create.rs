// handlers/admin/clients/create.rs - POST /api/admin/clients/create handler

use axum::extract::State;

use crate::database::models::Client;
use crate::middleware::{AdminContext, ApiJson, ApiResponse, ApiResult};
use crate::services::client_service::CreateClient;
use crate::services::ClientService;
use crate::state::AppState;

/**
 * POST /api/admin/clients/create - Add a client to the caller's family
 *
 * Expected Input:
 * ```json
 * {
 *   "full_name": "string",   // Required
 *   "dob": "1941-03-09",     // Optional
 *   "medications": "string", // Optional, as are the remaining detail fields
 *   "insurance_company": "string",
 *   "policy_number": "string",
 *   "allergies": "string",
 *   "emergency_contact_name": "string",
 *   "emergency_contact_phone": "string",
 *   "reason": "string"
 * }
 * ```
 */
pub async fn clients_create(
    State(state): State<AppState>,
    ctx: AdminContext,
    ApiJson(request): ApiJson<CreateClient>,
) -> ApiResult<Client> {
    let client = ClientService::new(state.store.as_ref()).create(&ctx, request).await?;
    Ok(ApiResponse::success("client", client).created())
}
