use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::{DailyLog, LogDraft, LogEntry, LogFilter, LogScope};
use crate::database::Store;
use crate::error::ApiError;
use crate::middleware::CallerContext;
use crate::services::validate::{parse_date, required_id, required_text};
use crate::types::{Meals, Role, Visits};

#[derive(Debug, Default, Deserialize)]
pub struct LogQuery {
    #[serde(default)]
    pub client_id: Option<Uuid>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SaveLog {
    /// Present for updates
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub client_id: Option<Uuid>,
    /// Admins must choose; ignored for caregivers
    #[serde(default)]
    pub caregiver_id: Option<Uuid>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub bp: Option<String>,
    #[serde(default)]
    pub meals: Option<Meals>,
    #[serde(default)]
    pub visits: Option<Visits>,
    #[serde(default)]
    pub notes: Option<String>,
}

pub struct LogService<'a> {
    store: &'a dyn Store,
}

impl<'a> LogService<'a> {
    pub fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    /// Logs newest first. Caregivers only see logs of clients assigned to them.
    pub async fn list(&self, ctx: &CallerContext, query: LogQuery) -> Result<Vec<LogEntry>, ApiError> {
        let visible_clients = match ctx.role {
            Role::Admin => None,
            Role::Caregiver => {
                let Some(caregiver) = self
                    .store
                    .find_caregiver_by_user(ctx.family_id, ctx.user_id)
                    .await?
                else {
                    return Ok(Vec::new());
                };
                let ids = self
                    .store
                    .assigned_client_ids(ctx.family_id, caregiver.id)
                    .await?;
                if ids.is_empty() {
                    return Ok(Vec::new());
                }
                Some(ids)
            }
        };

        let filter = LogFilter {
            client_id: query.client_id,
            visible_clients,
        };
        Ok(self.store.list_logs(ctx.family_id, &filter).await?)
    }

    /// Create a log, or update one when `id` is present
    pub async fn save(&self, ctx: &CallerContext, request: SaveLog) -> Result<DailyLog, ApiError> {
        let client_id = required_id("client_id", request.client_id)?;
        let date = parse_date("date", &required_text("date", request.date.as_deref())?)?;
        let meals = request
            .meals
            .ok_or_else(|| ApiError::invalid_field("meals", "is required"))?;
        let visits = request
            .visits
            .ok_or_else(|| ApiError::invalid_field("visits", "is required"))?;

        if self.store.find_client(ctx.family_id, client_id).await?.is_none() {
            return Err(ApiError::not_found("Client not found"));
        }

        let (caregiver_id, author) = match ctx.role {
            Role::Caregiver => {
                let caregiver = self
                    .store
                    .find_caregiver_by_user(ctx.family_id, ctx.user_id)
                    .await?
                    .ok_or_else(|| ApiError::forbidden("Caregiver record not found"))?;
                if !caregiver.is_active {
                    return Err(ApiError::forbidden("Caregiver is inactive"));
                }
                if !self
                    .store
                    .is_assigned(ctx.family_id, caregiver.id, client_id)
                    .await?
                {
                    tracing::warn!(
                        "Caregiver {} tried to log for unassigned client {}",
                        caregiver.id,
                        client_id
                    );
                    return Err(ApiError::forbidden("Not assigned to this client"));
                }
                (caregiver.id, Some(caregiver.id))
            }
            Role::Admin => {
                let caregiver_id = request.caregiver_id.ok_or_else(|| {
                    ApiError::invalid_field("caregiver_id", "is required for admin log entry")
                })?;
                if self
                    .store
                    .find_caregiver(ctx.family_id, caregiver_id)
                    .await?
                    .is_none()
                {
                    return Err(ApiError::not_found("Caregiver not found"));
                }
                (caregiver_id, None)
            }
        };

        let draft = LogDraft {
            client_id,
            caregiver_id,
            date,
            bp: request.bp,
            meals,
            visits,
            notes: request.notes,
        };

        match request.id {
            Some(log_id) => {
                let scope = LogScope {
                    family_id: ctx.family_id,
                    log_id,
                    author,
                };
                self.store
                    .update_log(scope, draft)
                    .await?
                    .ok_or_else(|| ApiError::not_found("Log not found"))
            }
            None => Ok(self
                .store
                .insert_log(ctx.family_id, Uuid::new_v4(), draft)
                .await?),
        }
    }
}
