use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::database::models::{Caregiver, CaregiverChanges, NewCaregiver};
use crate::database::Store;
use crate::error::ApiError;
use crate::identity::IdentityProvider;
use crate::middleware::AdminContext;
use crate::services::validate::{optional_text, patch_flag, patch_optional_text, patch_text, required_id, required_text};
use crate::types::{normalize_email, patch_field, Patch};

#[derive(Debug, Default, Deserialize)]
pub struct InviteCaregiver {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateCaregiver {
    #[serde(default, alias = "id")]
    pub caregiver_id: Option<Uuid>,
    #[serde(default, deserialize_with = "patch_field")]
    pub full_name: Patch<String>,
    #[serde(default, deserialize_with = "patch_field")]
    pub phone: Patch<String>,
    #[serde(default, deserialize_with = "patch_field")]
    pub is_active: Patch<bool>,
}

#[derive(Debug, Serialize)]
pub struct Invitation {
    pub caregiver: Caregiver,
    pub invited_user_id: Uuid,
    pub redirect_to: String,
}

pub struct CaregiverService<'a> {
    store: &'a dyn Store,
    identity: &'a dyn IdentityProvider,
}

impl<'a> CaregiverService<'a> {
    pub fn new(store: &'a dyn Store, identity: &'a dyn IdentityProvider) -> Self {
        Self { store, identity }
    }

    pub async fn list(&self, ctx: &AdminContext) -> Result<Vec<Caregiver>, ApiError> {
        Ok(self.store.list_caregivers(ctx.family_id).await?)
    }

    /// Invite a caregiver by email and provision their profile and caregiver row.
    ///
    /// If the store write fails after the identity was created, the identity is
    /// deleted again before the failure is returned.
    pub async fn invite(
        &self,
        ctx: &AdminContext,
        request: InviteCaregiver,
        redirect_to: String,
    ) -> Result<Invitation, ApiError> {
        let email = request
            .email
            .as_deref()
            .and_then(normalize_email)
            .ok_or_else(|| ApiError::invalid_field("email", "is required"))?;
        let full_name = required_text("full_name", request.full_name.as_deref())?;
        let phone = optional_text(request.phone);

        let invited = self
            .identity
            .invite_user_by_email(
                &email,
                &redirect_to,
                json!({ "full_name": full_name, "role": "caregiver" }),
            )
            .await?;
        tracing::info!("Invited caregiver {} as user {}", email, invited.id);

        let new_caregiver = NewCaregiver {
            id: Uuid::new_v4(),
            user_id: invited.id,
            full_name,
            email,
            phone,
        };

        match self.store.provision_caregiver(ctx.family_id, new_caregiver).await {
            Ok(caregiver) => Ok(Invitation {
                caregiver,
                invited_user_id: invited.id,
                redirect_to,
            }),
            Err(err) => {
                tracing::warn!("Provisioning caregiver {} failed, removing identity: {}", invited.id, err);
                if let Err(cleanup) = self.identity.delete_user(invited.id).await {
                    tracing::error!("Failed to remove orphaned identity {}: {}", invited.id, cleanup);
                }
                Err(err.into())
            }
        }
    }

    pub async fn update(&self, ctx: &AdminContext, request: UpdateCaregiver) -> Result<Caregiver, ApiError> {
        let id = required_id("caregiver_id", request.caregiver_id)?;
        let changes = CaregiverChanges {
            full_name: patch_text("full_name", request.full_name)?,
            phone: patch_optional_text(request.phone),
            is_active: patch_flag("is_active", request.is_active)?,
        };

        self.store
            .update_caregiver(ctx.family_id, id, changes)
            .await?
            .ok_or_else(|| ApiError::not_found("Caregiver not found"))
    }
}
