use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::auth::extract_bearer_token;
use crate::error::ApiError;
use crate::middleware::gate::Caller;
use crate::state::AppState;

/// Resolve the bearer token to an identity and its profile.
///
/// Rejects with 401 when the token is missing or the identity service does
/// not recognise it, and with 403 when the identity has no profile. Role
/// policy is left to the `AdminContext` / `CallerContext` extractors.
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(request.headers())
        .map(str::to_owned)
        .map_err(|e| {
            tracing::warn!("Rejected {} {}: {}", request.method(), request.uri().path(), e);
            ApiError::from(e)
        })?;

    let identity = state.identity.get_user(&token).await.map_err(|e| {
        tracing::warn!("Session lookup failed for {}: {}", request.uri().path(), e);
        ApiError::from(e)
    })?;

    let profile = state
        .store
        .find_profile(identity.id)
        .await?
        .ok_or_else(|| {
            tracing::warn!("No profile for user {}", identity.id);
            ApiError::profile_not_found("Caller profile not found")
        })?;

    request.extensions_mut().insert(Caller { identity, profile });
    Ok(next.run(request).await)
}
