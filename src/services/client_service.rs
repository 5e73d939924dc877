use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::{Client, ClientChanges, ClientDetails, ClientSummary, NewClient};
use crate::database::Store;
use crate::error::ApiError;
use crate::middleware::{AdminContext, CallerContext};
use crate::services::validate::{
    optional_date, optional_text, patch_date, patch_flag, patch_optional_text, patch_text,
    required_id, required_text,
};
use crate::types::{patch_field, Patch, Role};

#[derive(Debug, Default, Deserialize)]
pub struct CreateClient {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub dob: Option<String>,
    #[serde(default)]
    pub medications: Option<String>,
    #[serde(default)]
    pub insurance_company: Option<String>,
    #[serde(default)]
    pub policy_number: Option<String>,
    #[serde(default)]
    pub allergies: Option<String>,
    #[serde(default)]
    pub emergency_contact_name: Option<String>,
    #[serde(default)]
    pub emergency_contact_phone: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateClient {
    #[serde(default, alias = "id")]
    pub client_id: Option<Uuid>,
    #[serde(default, deserialize_with = "patch_field")]
    pub full_name: Patch<String>,
    #[serde(default, deserialize_with = "patch_field")]
    pub dob: Patch<String>,
    #[serde(default, deserialize_with = "patch_field")]
    pub medications: Patch<String>,
    #[serde(default, deserialize_with = "patch_field")]
    pub insurance_company: Patch<String>,
    #[serde(default, deserialize_with = "patch_field")]
    pub policy_number: Patch<String>,
    #[serde(default, deserialize_with = "patch_field")]
    pub allergies: Patch<String>,
    #[serde(default, deserialize_with = "patch_field")]
    pub emergency_contact_name: Patch<String>,
    #[serde(default, deserialize_with = "patch_field")]
    pub emergency_contact_phone: Patch<String>,
    #[serde(default, deserialize_with = "patch_field")]
    pub reason: Patch<String>,
    #[serde(default, deserialize_with = "patch_field")]
    pub is_active: Patch<bool>,
}

pub struct ClientService<'a> {
    store: &'a dyn Store,
}

impl<'a> ClientService<'a> {
    pub fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    pub async fn list(&self, ctx: &AdminContext) -> Result<Vec<Client>, ApiError> {
        Ok(self.store.list_clients(ctx.family_id).await?)
    }

    pub async fn create(&self, ctx: &AdminContext, request: CreateClient) -> Result<Client, ApiError> {
        let full_name = required_text("full_name", request.full_name.as_deref())?;
        let details = ClientDetails {
            dob: optional_date("dob", request.dob.as_deref())?,
            medications: optional_text(request.medications),
            insurance_company: optional_text(request.insurance_company),
            policy_number: optional_text(request.policy_number),
            allergies: optional_text(request.allergies),
            emergency_contact_name: optional_text(request.emergency_contact_name),
            emergency_contact_phone: optional_text(request.emergency_contact_phone),
            reason: optional_text(request.reason),
        };

        let client = self
            .store
            .insert_client(
                ctx.family_id,
                NewClient {
                    id: Uuid::new_v4(),
                    full_name,
                    details,
                },
            )
            .await?;
        tracing::info!("Created client {} in family {}", client.id, ctx.family_id);
        Ok(client)
    }

    pub async fn update(&self, ctx: &AdminContext, request: UpdateClient) -> Result<Client, ApiError> {
        let id = required_id("client_id", request.client_id)?;
        let changes = ClientChanges {
            full_name: patch_text("full_name", request.full_name)?,
            dob: patch_date("dob", request.dob)?,
            medications: patch_optional_text(request.medications),
            insurance_company: patch_optional_text(request.insurance_company),
            policy_number: patch_optional_text(request.policy_number),
            allergies: patch_optional_text(request.allergies),
            emergency_contact_name: patch_optional_text(request.emergency_contact_name),
            emergency_contact_phone: patch_optional_text(request.emergency_contact_phone),
            reason: patch_optional_text(request.reason),
            is_active: patch_flag("is_active", request.is_active)?,
        };

        self.store
            .update_client(ctx.family_id, id, changes)
            .await?
            .ok_or_else(|| ApiError::not_found("Client not found"))
    }

    /// Clients the caller may log against: every tenant client for admins,
    /// assigned clients for caregivers.
    pub async fn visible_to(&self, ctx: &CallerContext) -> Result<Vec<ClientSummary>, ApiError> {
        match ctx.role {
            Role::Admin => {
                let clients = self.store.list_clients(ctx.family_id).await?;
                Ok(clients.iter().map(ClientSummary::from).collect())
            }
            Role::Caregiver => {
                let Some(caregiver) = self
                    .store
                    .find_caregiver_by_user(ctx.family_id, ctx.user_id)
                    .await?
                else {
                    return Ok(Vec::new());
                };
                Ok(self.store.assigned_clients(ctx.family_id, caregiver.id).await?)
            }
        }
    }
}
