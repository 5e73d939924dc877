// handlers/admin/caregivers/list.rs - GET /api/admin/caregivers/list handler

use axum::extract::State;

use crate::database::models::Caregiver;
use crate::middleware::{AdminContext, ApiResponse, ApiResult};
use crate::services::CaregiverService;
use crate::state::AppState;

pub async fn caregivers_list(State(state): State<AppState>, ctx: AdminContext) -> ApiResult<Vec<Caregiver>> {
    let service = CaregiverService::new(state.store.as_ref(), state.identity.as_ref());
    Ok(ApiResponse::success("caregivers", service.list(&ctx).await?))
}
