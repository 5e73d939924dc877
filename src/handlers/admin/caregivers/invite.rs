// handlers/admin/caregivers/invite.rs - POST /api/admin/caregivers/invite handler

use axum::{extract::State, http::HeaderMap};

use crate::handlers::public_base_url;
use crate::middleware::{AdminContext, ApiJson, ApiResponse, ApiResult};
use crate::services::caregiver_service::{Invitation, InviteCaregiver};
use crate::services::CaregiverService;
use crate::state::AppState;

/**
 * POST /api/admin/caregivers/invite - Invite a caregiver into the caller's family
 *
 * Sends an invitation email whose link lands on `<base>/accept-invite`, then
 * creates the caregiver's profile and roster row.
 *
 * Expected Input:
 * ```json
 * { "email": "string", "full_name": "string", "phone": "string" }
 * ```
 */
pub async fn caregivers_invite(
    State(state): State<AppState>,
    headers: HeaderMap,
    ctx: AdminContext,
    ApiJson(request): ApiJson<InviteCaregiver>,
) -> ApiResult<Invitation> {
    let redirect_to = format!("{}/accept-invite", public_base_url(&state.config, &headers));
    let service = CaregiverService::new(state.store.as_ref(), state.identity.as_ref());
    let invitation = service.invite(&ctx, request, redirect_to).await?;
    Ok(ApiResponse::flat(invitation).created())
}
