// handlers/protected/logs/save.rs - POST /api/logs/save handler

use axum::extract::State;

use crate::database::models::DailyLog;
use crate::middleware::{ApiJson, ApiResponse, ApiResult, CallerContext};
use crate::services::log_service::SaveLog;
use crate::services::LogService;
use crate::state::AppState;

/**
 * POST /api/logs/save - Create a daily log, or update it when `id` is present
 *
 * Expected Input:
 * ```json
 * {
 *   "id": "uuid",            // Optional: update this log
 *   "client_id": "uuid",     // Required
 *   "caregiver_id": "uuid",  // Required for admins, ignored for caregivers
 *   "date": "2024-05-01",    // Required
 *   "bp": "120/80",          // Optional
 *   "meals": { "b": "Yes", "l": "No", "d": "Yes" },
 *   "visits": { "ot": "No", "pt": "No", "n": "Yes" },
 *   "notes": "string"        // Optional
 * }
 * ```
 */
pub async fn logs_save(
    State(state): State<AppState>,
    ctx: CallerContext,
    ApiJson(request): ApiJson<SaveLog>,
) -> ApiResult<DailyLog> {
    let log = LogService::new(state.store.as_ref()).save(&ctx, request).await?;
    Ok(ApiResponse::success("log", log))
}
