// handlers/admin/caregivers/update.rs - PATCH /api/admin/caregivers/update handler

use axum::extract::State;

use crate::database::models::Caregiver;
use crate::middleware::{AdminContext, ApiJson, ApiResponse, ApiResult};
use crate::services::caregiver_service::UpdateCaregiver;
use crate::services::CaregiverService;
use crate::state::AppState;

/// Absent fields are left alone; `is_active` is mirrored onto the caregiver's profile
pub async fn caregivers_update(
    State(state): State<AppState>,
    ctx: AdminContext,
    ApiJson(request): ApiJson<UpdateCaregiver>,
) -> ApiResult<Caregiver> {
    let service = CaregiverService::new(state.store.as_ref(), state.identity.as_ref());
    Ok(ApiResponse::success("caregiver", service.update(&ctx, request).await?))
}
