// handlers/protected/logs/list.rs - GET /api/logs/list handler

use axum::extract::State;

use crate::database::models::LogEntry;
use crate::middleware::{ApiQuery, ApiResponse, ApiResult, CallerContext};
use crate::services::log_service::LogQuery;
use crate::services::LogService;
use crate::state::AppState;

/// Optional `?client_id=` narrows the list to one client
pub async fn logs_list(
    State(state): State<AppState>,
    ctx: CallerContext,
    ApiQuery(query): ApiQuery<LogQuery>,
) -> ApiResult<Vec<LogEntry>> {
    let logs = LogService::new(state.store.as_ref()).list(&ctx, query).await?;
    Ok(ApiResponse::success("logs", logs))
}
