use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::database::models::{NewProfile, Profile, ProfileChanges};
use crate::database::Store;
use crate::error::ApiError;
use crate::identity::{IdentityProvider, NewIdentity};
use crate::middleware::AdminContext;
use crate::services::validate::{optional_text, patch_flag, patch_text, required_id, required_text};
use crate::types::{normalize_email, patch_field, Patch, Role};

#[derive(Debug, Default, Deserialize)]
pub struct CreateUser {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub temp_password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateUser {
    #[serde(default)]
    pub user_id: Option<Uuid>,
    #[serde(default, deserialize_with = "patch_field")]
    pub full_name: Patch<String>,
    #[serde(default, deserialize_with = "patch_field")]
    pub is_active: Patch<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResetPassword {
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PasswordReset {
    pub email: String,
    pub redirect_to: String,
}

/// Admin accounts of a family
pub struct UserService<'a> {
    store: &'a dyn Store,
    identity: &'a dyn IdentityProvider,
}

impl<'a> UserService<'a> {
    pub fn new(store: &'a dyn Store, identity: &'a dyn IdentityProvider) -> Self {
        Self { store, identity }
    }

    pub async fn list(&self, ctx: &AdminContext) -> Result<Vec<Profile>, ApiError> {
        Ok(self.store.list_admins(ctx.family_id).await?)
    }

    pub async fn create(&self, ctx: &AdminContext, request: CreateUser) -> Result<Profile, ApiError> {
        let email = required_email(request.email.as_deref())?;
        let full_name = required_text("full_name", request.full_name.as_deref())?;
        let password = optional_text(request.temp_password);
        self.provision_admin(ctx.family_id, email, full_name, password)
            .await
    }

    /// First admin of a brand-new family
    pub async fn bootstrap(
        &self,
        email: &str,
        full_name: &str,
        password: Option<String>,
    ) -> Result<Profile, ApiError> {
        let email = required_email(Some(email))?;
        let full_name = required_text("full_name", Some(full_name))?;
        self.provision_admin(Uuid::new_v4(), email, full_name, optional_text(password))
            .await
    }

    pub async fn update(&self, ctx: &AdminContext, request: UpdateUser) -> Result<Profile, ApiError> {
        let user_id = required_id("user_id", request.user_id)?;
        let changes = ProfileChanges {
            full_name: patch_text("full_name", request.full_name)?,
            is_active: patch_flag("is_active", request.is_active)?,
        };
        if user_id == ctx.user_id && changes.is_active == Some(false) {
            return Err(ApiError::validation_error("You cannot deactivate your own account", None));
        }

        self.store
            .update_admin(ctx.family_id, user_id, changes)
            .await?
            .ok_or_else(|| ApiError::not_found("User not found"))
    }

    pub async fn reset_password(
        &self,
        ctx: &AdminContext,
        request: ResetPassword,
        redirect_to: String,
    ) -> Result<PasswordReset, ApiError> {
        let email = required_email(request.email.as_deref())?;
        if self
            .store
            .find_profile_by_email(ctx.family_id, &email)
            .await?
            .is_none()
        {
            return Err(ApiError::not_found("User not found"));
        }

        self.identity.send_password_reset(&email, &redirect_to).await?;
        tracing::info!("Password reset requested for {}", email);
        Ok(PasswordReset { email, redirect_to })
    }

    async fn provision_admin(
        &self,
        family_id: Uuid,
        email: String,
        full_name: String,
        password: Option<String>,
    ) -> Result<Profile, ApiError> {
        let created = self
            .identity
            .create_user(NewIdentity {
                email: email.clone(),
                password,
                metadata: json!({ "full_name": full_name }),
            })
            .await?;

        let profile = NewProfile {
            user_id: created.id,
            family_id,
            role: Role::Admin,
            is_active: true,
            full_name,
            email,
        };

        match self.store.insert_profile(profile).await {
            Ok(profile) => {
                tracing::info!("Created admin {} in family {}", profile.user_id, family_id);
                Ok(profile)
            }
            Err(err) => {
                tracing::warn!("Admin profile insert failed, removing identity {}: {}", created.id, err);
                if let Err(cleanup) = self.identity.delete_user(created.id).await {
                    tracing::error!("Failed to remove orphaned identity {}: {}", created.id, cleanup);
                }
                Err(err.into())
            }
        }
    }
}

fn required_email(value: Option<&str>) -> Result<String, ApiError> {
    value
        .and_then(normalize_email)
        .ok_or_else(|| ApiError::invalid_field("email", "is required"))
}
