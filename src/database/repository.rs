//! Store traits for the tenant-scoped data.
//!
//! Every method that touches tenant data takes the caller's `family_id`
//! and must filter on it. Updates return `None` when no row matched the
//! `(id, family_id)` scope.

use async_trait::async_trait;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{
    Caregiver, CaregiverChanges, Client, ClientChanges, ClientSummary, DailyLog, LogDraft,
    LogEntry, LogFilter, LogScope, NewCaregiver, NewClient, NewProfile, Profile, ProfileChanges,
};

pub type StoreResult<T> = Result<T, DatabaseError>;

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Profiles are keyed by identity, not by tenant
    async fn find_profile(&self, user_id: Uuid) -> StoreResult<Option<Profile>>;

    async fn find_profile_by_email(&self, family_id: Uuid, email: &str) -> StoreResult<Option<Profile>>;

    /// Plain insert; an existing profile for the identity is a `Conflict`
    async fn insert_profile(&self, profile: NewProfile) -> StoreResult<Profile>;

    async fn list_admins(&self, family_id: Uuid) -> StoreResult<Vec<Profile>>;

    async fn update_admin(
        &self,
        family_id: Uuid,
        user_id: Uuid,
        changes: ProfileChanges,
    ) -> StoreResult<Option<Profile>>;
}

#[async_trait]
pub trait CaregiverRepository: Send + Sync {
    async fn list_caregivers(&self, family_id: Uuid) -> StoreResult<Vec<Caregiver>>;

    async fn find_caregiver(&self, family_id: Uuid, id: Uuid) -> StoreResult<Option<Caregiver>>;

    async fn find_caregiver_by_user(&self, family_id: Uuid, user_id: Uuid) -> StoreResult<Option<Caregiver>>;

    /// Upsert the caregiver profile and insert the caregiver row atomically
    async fn provision_caregiver(&self, family_id: Uuid, caregiver: NewCaregiver) -> StoreResult<Caregiver>;

    /// Apply a partial update. A change to `is_active` is mirrored onto the
    /// linked profile in the same transaction.
    async fn update_caregiver(
        &self,
        family_id: Uuid,
        id: Uuid,
        changes: CaregiverChanges,
    ) -> StoreResult<Option<Caregiver>>;
}

#[async_trait]
pub trait ClientRepository: Send + Sync {
    async fn list_clients(&self, family_id: Uuid) -> StoreResult<Vec<Client>>;

    async fn find_client(&self, family_id: Uuid, id: Uuid) -> StoreResult<Option<Client>>;

    async fn insert_client(&self, family_id: Uuid, client: NewClient) -> StoreResult<Client>;

    async fn update_client(
        &self,
        family_id: Uuid,
        id: Uuid,
        changes: ClientChanges,
    ) -> StoreResult<Option<Client>>;
}

#[async_trait]
pub trait AssignmentRepository: Send + Sync {
    /// Sorted by caregiver id
    async fn assigned_caregiver_ids(&self, family_id: Uuid, client_id: Uuid) -> StoreResult<Vec<Uuid>>;

    /// Sorted by client id
    async fn assigned_client_ids(&self, family_id: Uuid, caregiver_id: Uuid) -> StoreResult<Vec<Uuid>>;

    async fn assigned_clients(&self, family_id: Uuid, caregiver_id: Uuid) -> StoreResult<Vec<ClientSummary>>;

    async fn is_assigned(&self, family_id: Uuid, caregiver_id: Uuid, client_id: Uuid) -> StoreResult<bool>;

    /// Replace the client's assignment set in a single transaction
    async fn replace_assignments(
        &self,
        family_id: Uuid,
        client_id: Uuid,
        caregiver_ids: &[Uuid],
    ) -> StoreResult<()>;
}

#[async_trait]
pub trait LogRepository: Send + Sync {
    /// Newest date first, then newest entry first
    async fn list_logs(&self, family_id: Uuid, filter: &LogFilter) -> StoreResult<Vec<LogEntry>>;

    async fn insert_log(&self, family_id: Uuid, id: Uuid, draft: LogDraft) -> StoreResult<DailyLog>;

    async fn update_log(&self, scope: LogScope, draft: LogDraft) -> StoreResult<Option<DailyLog>>;
}

/// Everything the record services need from the data store
#[async_trait]
pub trait Store:
    ProfileRepository + CaregiverRepository + ClientRepository + AssignmentRepository + LogRepository
{
    async fn ping(&self) -> StoreResult<()>;
}
