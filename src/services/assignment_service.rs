use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::models::Caregiver;
use crate::database::Store;
use crate::error::ApiError;
use crate::middleware::AdminContext;
use crate::services::validate::required_id;

#[derive(Debug, Default, Deserialize)]
pub struct AssignmentQuery {
    #[serde(default)]
    pub client_id: Option<Uuid>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SetAssignments {
    #[serde(default)]
    pub client_id: Option<Uuid>,
    #[serde(default)]
    pub caregiver_ids: Option<Vec<Uuid>>,
}

#[derive(Debug, Serialize)]
pub struct AssignmentSheet {
    pub caregivers: Vec<Caregiver>,
    pub assigned_caregiver_ids: Vec<Uuid>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct Assignment {
    pub client_id: Uuid,
    pub caregiver_ids: Vec<Uuid>,
}

pub struct AssignmentService<'a> {
    store: &'a dyn Store,
}

impl<'a> AssignmentService<'a> {
    pub fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    /// Every tenant caregiver plus the ids currently assigned to the client
    pub async fn sheet(&self, ctx: &AdminContext, query: AssignmentQuery) -> Result<AssignmentSheet, ApiError> {
        let client_id = required_id("client_id", query.client_id)?;
        if self.store.find_client(ctx.family_id, client_id).await?.is_none() {
            return Err(ApiError::not_found("Client not found"));
        }

        let caregivers =self.store.list_caregivers(ctx.family_id).await?;
        let assigned_caregiver_ids = self
            .store
            .assigned_caregiver_ids(ctx.family_id, client_id)
            .await?;
        Ok(AssignmentSheet {
            caregivers,
            assigned_caregiver_ids,
        })
    }

    /// Replace the client's assignment set with exactly `caregiver_ids`
    pub async fn replace(&self, ctx: &AdminContext, request: SetAssignments) -> Result<Assignment, ApiError> {
        let client_id = required_id("client_id", request.client_id)?;
        let requested = request
            .caregiver_ids
            .ok_or_else(|| ApiError::invalid_field("caregiver_ids", "must be an array"))?;

        let mut caregiver_ids: Vec<Uuid> = Vec::with_capacity(requested.len());
        for id in requested {
            if !caregiver_ids.contains(&id) {
                caregiver_ids.push(id);
            }
        }

        if self.store.find_client(ctx.family_id, client_id).await?.is_none() {
            return Err(ApiError::not_found("Client not found"));
        }
        for &id in &caregiver_ids {
            if self.store.find_caregiver(ctx.family_id, id).await?.is_none() {
                return Err(ApiError::not_found(format!("Caregiver {} not found", id)));
            }
        }

        self.store
            .replace_assignments(ctx.family_id, client_id, &caregiver_ids)
            .await?;
        tracing::info!(
            "Client {} now assigned to {} caregiver(s)",
            client_id,
            caregiver_ids.len()
        );

        Ok(Assignment {
            client_id,
            caregiver_ids,
        })
    }
}
