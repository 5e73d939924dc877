// handlers/admin/users/reset_password.rs - POST /api/admin/users/reset-password handler

use axum::{extract::State, http::HeaderMap};

use crate::handlers::public_base_url;
use crate::middleware::{AdminContext, ApiJson, ApiResponse, ApiResult};
use crate::services::user_service::{PasswordReset, ResetPassword};
use crate::services::UserService;
use crate::state::AppState;

/// Emails a reset link landing on `<base>/login` to a member of the caller's family
pub async fn users_reset_password(
    State(state): State<AppState>,
    headers: HeaderMap,
    ctx: AdminContext,
    ApiJson(request): ApiJson<ResetPassword>,
) -> ApiResult<PasswordReset> {
    let redirect_to = format!("{}/login", public_base_url(&state.config, &headers));
    let service = UserService::new(state.store.as_ref(), state.identity.as_ref());
    let reset = service.reset_password(&ctx, request, redirect_to).await?;
    Ok(ApiResponse::success("reset", reset))
}
