// handlers/admin/assignments/list.rs - GET /api/admin/assignments/list handler

use axum::extract::State;

use crate::middleware::{AdminContext, ApiQuery, ApiResponse, ApiResult};
use crate::services::assignment_service::{AssignmentQuery, AssignmentSheet};
use crate::services::AssignmentService;
use crate::state::AppState;

/// Every caregiver in the family plus the ids assigned to `client_id`
pub async fn assignments_list(
    State(state): State<AppState>,
    ctx: AdminContext,
    ApiQuery(query): ApiQuery<AssignmentQuery>,
) -> ApiResult<AssignmentSheet> {
    let sheet = AssignmentService::new(state.store.as_ref()).sheet(&ctx, query).await?;
    Ok(ApiResponse::flat(sheet))
}
