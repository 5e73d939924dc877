// handlers/admin/users/list.rs - GET /api/admin/users/list handler

use axum::extract::State;

use crate::database::models::Profile;
use crate::middleware::{AdminContext, ApiResponse, ApiResult};
use crate::services::UserService;
use crate::state::AppState;

pub async fn users_list(State(state): State<AppState>, ctx: AdminContext) -> ApiResult<Vec<Profile>> {
    let service = UserService::new(state.store.as_ref(), state.identity.as_ref());
    Ok(ApiResponse::success("admins", service.list(&ctx).await?))
}
