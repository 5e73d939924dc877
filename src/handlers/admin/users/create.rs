// handlers/admin/users/create.rs - POST /api/admin/users/create handler

use axum::extract::State;

use crate::database::models::Profile;
use crate::middleware::{AdminContext, ApiJson, ApiResponse, ApiResult};
use crate::services::user_service::CreateUser;
use crate::services::UserService;
use crate::state::AppState;

/**
 * POST /api/admin/users/create - Create another admin in the caller's family
 *
 * The account is created already confirmed. Without `temp_password` the new
 * admin signs in through a password reset.
 *
 * Expected Input:
 * ```json
 * { "email": "string", "full_name": "string", "temp_password": "string" }
 * ```
 */
pub async fn users_create(
    State(state): State<AppState>,
    ctx: AdminContext,
    ApiJson(request): ApiJson<CreateUser>,
) -> ApiResult<Profile> {
    let service = UserService::new(state.store.as_ref(), state.identity.as_ref());
    let user = service.create(&ctx, request).await?;
    Ok(ApiResponse::success("user", user).created())
}
