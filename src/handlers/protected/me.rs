// handlers/protected/me.rs - GET /api/me handler

use axum::extract::State;
use serde::Serialize;
use uuid::Uuid;

use crate::middleware::{ApiResponse, ApiResult, CallerContext};
use crate::state::AppState;
use crate::types::Role;

#[derive(Debug, Serialize)]
pub struct Me {
    pub user_id: Uuid,
    pub role: Role,
    pub family_id: Uuid,
    /// Null for admins and for caregivers without a caregiver row
    pub caregiver_id: Option<Uuid>,
}

pub async fn me(State(state): State<AppState>, ctx: CallerContext) -> ApiResult<Me> {
    let caregiver_id = match ctx.role {
        Role::Admin => None,
        Role::Caregiver => state
            .store
            .find_caregiver_by_user(ctx.family_id, ctx.user_id)
            .await?
            .map(|caregiver| caregiver.id),
    };

    Ok(ApiResponse::flat(Me {
        user_id: ctx.user_id,
        role: ctx.role,
        family_id: ctx.family_id,
        caregiver_id,
    }))
}
