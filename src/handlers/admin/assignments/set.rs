// handlers/admin/assignments/set.rs - POST /api/admin/assignments/set handler

use axum::extract::State;

use crate::middleware::{AdminContext, ApiJson, ApiResponse, ApiResult};
use crate::services::assignment_service::{Assignment, SetAssignments};
use crate::services::AssignmentService;
use crate::state::AppState;

/**
 * POST /api/admin/assignments/set - Replace a client's caregiver set
 *
 * The stored set becomes exactly `caregiver_ids`; an empty array unassigns
 * everyone.
 *
 * Expected Input:
 * ```json
 * { "client_id": "uuid", "caregiver_ids": ["uuid", "uuid"] }
 * ```
 */
pub async fn assignments_set(
    State(state): State<AppState>,
    ctx: AdminContext,
    ApiJson(request): ApiJson<SetAssignments>,
) -> ApiResult<Assignment> {
    let assignment = AssignmentService::new(state.store.as_ref())
        .replace(&ctx, request)
        .await?;
    Ok(ApiResponse::success("assignment", assignment))
}
