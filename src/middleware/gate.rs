// middleware/gate.rs - Role and tenant policy for authenticated callers
//
// `authenticate` resolves the caller; the extractors below decide whether
// that caller may use a route and hand back the tenant scope to query with.

use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::database::models::Profile;
use crate::error::ApiError;
use crate::identity::Identity;
use crate::types::Role;

/// Authenticated caller, inserted into request extensions by `authenticate`
#[derive(Clone, Debug)]
pub struct Caller {
    pub identity: Identity,
    pub profile: Profile,
}

/// Scope for admin-only routes
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AdminContext {
    pub user_id: Uuid,
    pub family_id: Uuid,
}

/// Scope for routes open to admins and caregivers alike
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CallerContext {
    pub user_id: Uuid,
    pub family_id: Uuid,
    pub role: Role,
}

/// Admin routes need an active admin profile attached to a family
pub fn require_active_admin(profile: &Profile) -> Result<AdminContext, ApiError> {
    if profile.role != Role::Admin || !profile.is_active {
        return Err(ApiError::forbidden("Admin privileges required"));
    }
    let family_id = profile
        .family_id
        .ok_or_else(|| ApiError::forbidden("Caller family not found"))?;
    Ok(AdminContext {
        user_id: profile.user_id,
        family_id,
    })
}

/// Mixed-role routes need any active profile attached to a family
pub fn require_active_member(profile: &Profile) -> Result<CallerContext, ApiError> {
    if !profile.is_active {
        return Err(ApiError::forbidden("Account is inactive"));
    }
    let family_id = profile
        .family_id
        .ok_or_else(|| ApiError::forbidden("Caller family not found"))?;
    Ok(CallerContext {
        user_id: profile.user_id,
        family_id,
        role: profile.role,
    })
}

fn caller(parts: &Parts) -> Result<&Caller, ApiError> {
    parts
        .extensions
        .get::<Caller>()
        .ok_or_else(|| ApiError::unauthenticated("Missing Authorization Bearer token"))
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AdminContext
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let caller = caller(parts)?;
        require_active_admin(&caller.profile).map_err(|e| {
            tracing::warn!(
                "Admin gate rejected user {} on {}: {}",
                caller.identity.id,
                parts.uri.path(),
                e
            );
            e
        })
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for CallerContext
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let caller = caller(parts)?;
        require_active_member(&caller.profile).map_err(|e| {
            tracing::warn!(
                "Member gate rejected user {} on {}: {}",
                caller.identity.id,
                parts.uri.path(),
                e
            );
            e
        })
    }
}
