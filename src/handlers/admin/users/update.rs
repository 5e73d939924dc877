// handlers/admin/users/update.rs - PATCH /api/admin/users/update handler

use axum::extract::State;

use crate::database::models::Profile;
use crate::middleware::{AdminContext, ApiJson, ApiResponse, ApiResult};
use crate::services::user_service::UpdateUser;
use crate::services::UserService;
use crate::state::AppState;

pub async fn users_update(
    State(state): State<AppState>,
    ctx: AdminContext,
    ApiJson(request): ApiJson<UpdateUser>,
) -> ApiResult<Profile> {
    let service = UserService::new(state.store.as_ref(), state.identity.as_ref());
    Ok(ApiResponse::success("user", service.update(&ctx, request).await?))
}
