// database/memory.rs - In-process Store used by tests and local demos

use std::cmp::Ordering;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{
    Caregiver, CaregiverChanges, Client, ClientChanges, ClientSummary, DailyLog, LogDraft,
    LogEntry, LogFilter, LogScope, NewCaregiver, NewClient, NewProfile, Profile, ProfileChanges,
};
use crate::database::repository::{
    AssignmentRepository, CaregiverRepository, ClientRepository, LogRepository,
    ProfileRepository, Store, StoreResult,
};
use crate::types::Role;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Assignment {
    family_id: Uuid,
    client_id: Uuid,
    caregiver_id: Uuid,
}

/// Rows are kept in insertion order; "newest first" reads iterate in reverse
#[derive(Default)]
struct Tables {
    profiles: Vec<Profile>,
    caregivers: Vec<Caregiver>,
    clients: Vec<Client>,
    assignments: Vec<Assignment>,
    logs: Vec<DailyLog>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every write fail as if the database were unreachable. Reads keep working.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, AtomicOrdering::SeqCst);
    }

    fn check_writable(&self) -> StoreResult<()> {
        if self.fail_writes.load(AtomicOrdering::SeqCst) {
            return Err(DatabaseError::Sqlx(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

fn admin_name_order(a: &Profile, b: &Profile) -> Ordering {
    match (&a.full_name, &b.full_name) {
        (Some(x), Some(y)) => x.cmp(y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[async_trait]
impl ProfileRepository for MemoryStore {
    async fn find_profile(&self, user_id: Uuid) -> StoreResult<Option<Profile>> {
        let tables = self.tables.read().await;
        Ok(tables.profiles.iter().find(|p| p.user_id == user_id).cloned())
    }

    async fn find_profile_by_email(&self, family_id: Uuid, email: &str) -> StoreResult<Option<Profile>> {
        let tables = self.tables.read().await;
        Ok(tables
            .profiles
            .iter()
            .find(|p| {
                p.family_id == Some(family_id)
                    && p.email.as_deref().map(|e| e.eq_ignore_ascii_case(email)).unwrap_or(false)
            })
            .cloned())
    }

    async fn insert_profile(&self, profile: NewProfile) -> StoreResult<Profile> {
        self.check_writable()?;
        let mut tables = self.tables.write().await;
        if tables.profiles.iter().any(|p| p.user_id == profile.user_id) {
            return Err(DatabaseError::Conflict("profile already exists".to_string()));
        }
        let row = Profile {
            user_id: profile.user_id,
            family_id: Some(profile.family_id),
            role: profile.role,
            is_active: profile.is_active,
            full_name: Some(profile.full_name),
            email: Some(profile.email),
            created_at: Utc::now(),
        };
        tables.profiles.push(row.clone());
        Ok(row)
    }

    async fn list_admins(&self, family_id: Uuid) -> StoreResult<Vec<Profile>> {
        let tables = self.tables.read().await;
        let mut admins: Vec<Profile> = tables
            .profiles
            .iter()
            .filter(|p| p.family_id == Some(family_id) && p.role == Role::Admin)
            .cloned()
            .collect();
        admins.sort_by(admin_name_order);
        Ok(admins)
    }

    async fn update_admin(
        &self,
        family_id: Uuid,
        user_id: Uuid,
        changes: ProfileChanges,
    ) -> StoreResult<Option<Profile>> {
        self.check_writable()?;
        let mut tables = self.tables.write().await;
        let Some(profile) = tables.profiles.iter_mut().find(|p| {
            p.user_id == user_id && p.family_id == Some(family_id) && p.role == Role::Admin
        }) else {
            return Ok(None);
        };
        if let Some(name) = changes.full_name {
            profile.full_name = Some(name);
        }
        if let Some(active) = changes.is_active {
            profile.is_active = active;
        }
        Ok(Some(profile.clone()))
    }
}

#[async_trait]
impl CaregiverRepository for MemoryStore {
    async fn list_caregivers(&self, family_id: Uuid) -> StoreResult<Vec<Caregiver>> {
        let tables = self.tables.read().await;
        Ok(tables
            .caregivers
            .iter()
            .rev()
            .filter(|c| c.family_id == family_id)
            .cloned()
            .collect())
    }

    async fn find_caregiver(&self, family_id: Uuid, id: Uuid) -> StoreResult<Option<Caregiver>> {
        let tables = self.tables.read().await;
        Ok(tables
            .caregivers
            .iter()
            .find(|c| c.id == id && c.family_id == family_id)
            .cloned())
    }

    async fn find_caregiver_by_user(&self, family_id: Uuid, user_id: Uuid) -> StoreResult<Option<Caregiver>> {
        let tables = self.tables.read().await;
        Ok(tables
            .caregivers
            .iter()
            .find(|c| c.user_id == user_id && c.family_id == family_id)
            .cloned())
    }

    async fn provision_caregiver(&self, family_id: Uuid, caregiver: NewCaregiver) -> StoreResult<Caregiver> {
        self.check_writable()?;
        let mut guard = self.tables.write().await;
        let tables = &mut *guard;
        if tables
            .caregivers
            .iter()
            .any(|c| c.user_id == caregiver.user_id || c.id == caregiver.id)
        {
            return Err(DatabaseError::Conflict("caregiver already exists".to_string()));
        }

        let now = Utc::now();
        match tables.profiles.iter_mut().find(|p| p.user_id == caregiver.user_id) {
            Some(profile) => {
                profile.family_id = Some(family_id);
                profile.role = Role::Caregiver;
                profile.is_active = true;
                profile.full_name = Some(caregiver.full_name.clone());
                profile.email = Some(caregiver.email.clone());
            }
            None => tables.profiles.push(Profile {
                user_id: caregiver.user_id,
                family_id: Some(family_id),
                role: Role::Caregiver,
                is_active: true,
                full_name: Some(caregiver.full_name.clone()),
                email: Some(caregiver.email.clone()),
                created_at: now,
            }),
        }

        let row = Caregiver {
            id: caregiver.id,
            user_id: caregiver.user_id,
            family_id,
            full_name: caregiver.full_name,
            email: caregiver.email,
            phone: caregiver.phone,
            is_active: true,
            created_at: now,
        };
        tables.caregivers.push(row.clone());
        Ok(row)
    }

    async fn update_caregiver(
        &self,
        family_id: Uuid,
        id: Uuid,
        changes: CaregiverChanges,
    ) -> StoreResult<Option<Caregiver>> {
        self.check_writable()?;
        let mut guard = self.tables.write().await;
        let tables = &mut *guard;
        let Some(caregiver) = tables
            .caregivers
            .iter_mut()
            .find(|c| c.id == id && c.family_id == family_id)
        else {
            return Ok(None);
        };

        if let Some(name) = changes.full_name {
            caregiver.full_name = name;
        }
        if let Some(phone) = changes.phone {
            caregiver.phone = phone;
        }
        if let Some(active) = changes.is_active {
            caregiver.is_active = active;
        }
        let updated = caregiver.clone();

        if let Some(active) = changes.is_active {
            if let Some(profile) = tables
                .profiles
                .iter_mut()
                .find(|p| p.user_id == updated.user_id && p.family_id == Some(family_id))
            {
                profile.is_active = active;
            }
        }
        Ok(Some(updated))
    }
}

#[async_trait]
impl ClientRepository for MemoryStore {
    async fn list_clients(&self, family_id: Uuid) -> StoreResult<Vec<Client>> {
        let tables = self.tables.read().await;
        Ok(tables
            .clients
            .iter()
            .rev()
            .filter(|c| c.family_id == family_id)
            .cloned()
            .collect())
    }

    async fn find_client(&self, family_id: Uuid, id: Uuid) -> StoreResult<Option<Client>> {
        let tables = self.tables.read().await;
        Ok(tables
            .clients
            .iter()
            .find(|c| c.id == id && c.family_id == family_id)
            .cloned())
    }

    async fn insert_client(&self, family_id: Uuid, client: NewClient) -> StoreResult<Client> {
        self.check_writable()?;
        let mut tables = self.tables.write().await;
        let d = client.details;
        let row = Client {
            id: client.id,
            family_id,
            full_name: client.full_name,
            dob: d.dob,
            medications: d.medications,
            insurance_company: d.insurance_company,
            policy_number: d.policy_number,
            allergies: d.allergies,
            emergency_contact_name: d.emergency_contact_name,
            emergency_contact_phone: d.emergency_contact_phone,
            reason: d.reason,
            is_active: true,
            created_at: Utc::now(),
        };
        tables.clients.push(row.clone());
        Ok(row)
    }

    async fn update_client(
        &self,
        family_id: Uuid,
        id: Uuid,
        changes: ClientChanges,
    ) -> StoreResult<Option<Client>> {
        self.check_writable()?;
        let mut tables = self.tables.write().await;
        Ok(tables
            .clients
            .iter_mut()
            .find(|c| c.id == id && c.family_id == family_id)
            .map(|client| {
                changes.apply(client);
                client.clone()
            }))
    }
}

#[async_trait]
impl AssignmentRepository for MemoryStore {
    async fn assigned_caregiver_ids(&self, family_id: Uuid, client_id: Uuid) -> StoreResult<Vec<Uuid>> {
        let tables = self.tables.read().await;
        let mut ids: Vec<Uuid> = tables
            .assignments
            .iter()
            .filter(|a| a.family_id == family_id && a.client_id == client_id)
            .map(|a| a.caregiver_id)
            .collect();
        ids.sort();
        Ok(ids)
    }

    async fn assigned_client_ids(&self, family_id: Uuid, caregiver_id: Uuid) -> StoreResult<Vec<Uuid>> {
        let tables = self.tables.read().await;
        let mut ids: Vec<Uuid> = tables
            .assignments
            .iter()
            .filter(|a| a.family_id == family_id && a.caregiver_id == caregiver_id)
            .map(|a| a.client_id)
            .collect();
        ids.sort();
        Ok(ids)
    }

    async fn assigned_clients(&self, family_id: Uuid, caregiver_id: Uuid) -> StoreResult<Vec<ClientSummary>> {
        let tables = self.tables.read().await;
        let mut clients: Vec<ClientSummary> = tables
            .assignments
            .iter()
            .filter(|a| a.family_id == family_id && a.caregiver_id == caregiver_id)
            .filter_map(|a| {
                tables
                    .clients
                    .iter()
                    .find(|c| c.id == a.client_id && c.family_id == family_id)
            })
            .map(ClientSummary::from)
            .collect();
        clients.sort_by(|a, b| a.full_name.cmp(&b.full_name));
        Ok(clients)
    }

    async fn is_assigned(&self, family_id: Uuid, caregiver_id: Uuid, client_id: Uuid) -> StoreResult<bool> {
        let tables = self.tables.read().await;
        Ok(tables.assignments.iter().any(|a| {
            a.family_id == family_id && a.caregiver_id == caregiver_id && a.client_id == client_id
        }))
    }

    async fn replace_assignments(
        &self,
        family_id: Uuid,
        client_id: Uuid,
        caregiver_ids: &[Uuid],
    ) -> StoreResult<()> {
        self.check_writable()?;
        let mut tables = self.tables.write().await;
        tables
            .assignments
            .retain(|a| !(a.family_id == family_id && a.client_id == client_id));
        for &caregiver_id in caregiver_ids {
            let row = Assignment {
                family_id,
                client_id,
                caregiver_id,
            };
            if !tables.assignments.contains(&row) {
                tables.assignments.push(row);
            }
        }
        Ok(())
    }
}

#[async_trait]
impl LogRepository for MemoryStore {
    async fn list_logs(&self, family_id: Uuid, filter: &LogFilter) -> StoreResult<Vec<LogEntry>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<(usize, &DailyLog)> = tables
            .logs
            .iter()
            .enumerate()
            .filter(|(_, l)| l.family_id == family_id && filter.matches(l.client_id))
            .collect();
        rows.sort_by(|(ia, a), (ib, b)| b.date.cmp(&a.date).then(ib.cmp(ia)));

        Ok(rows
            .into_iter()
            .filter_map(|(_, log)| {
                let client = tables.clients.iter().find(|c| c.id == log.client_id)?;
                let caregiver = tables.caregivers.iter().find(|c| c.id == log.caregiver_id)?;
                Some(LogEntry {
                    id: log.id,
                    date: log.date,
                    bp: log.bp.clone(),
                    meals: log.meals,
                    visits: log.visits,
                    notes: log.notes.clone(),
                    created_at: log.created_at,
                    updated_at: log.updated_at,
                    client_id: log.client_id,
                    client_name: client.full_name.clone(),
                    caregiver_id: log.caregiver_id,
                    caregiver_name: caregiver.full_name.clone(),
                })
            })
            .collect())
    }

    async fn insert_log(&self, family_id: Uuid, id: Uuid, draft: LogDraft) -> StoreResult<DailyLog> {
        self.check_writable()?;
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let row = DailyLog {
            id,
            family_id,
            client_id: draft.client_id,
            caregiver_id: draft.caregiver_id,
            date: draft.date,
            bp: draft.bp,
            meals: draft.meals,
            visits: draft.visits,
            notes: draft.notes,
            created_at: now,
            updated_at: now,
        };
        tables.logs.push(row.clone());
        Ok(row)
    }

    async fn update_log(&self, scope: LogScope, draft: LogDraft) -> StoreResult<Option<DailyLog>> {
        self.check_writable()?;
        let mut tables = self.tables.write().await;
        let Some(log) = tables.logs.iter_mut().find(|l| {
            l.id == scope.log_id
                && l.family_id == scope.family_id
                && scope.author.map(|a| a == l.caregiver_id).unwrap_or(true)
        }) else {
            return Ok(None);
        };
        log.client_id = draft.client_id;
        log.caregiver_id = draft.caregiver_id;
        log.date = draft.date;
        log.bp = draft.bp;
        log.meals = draft.meals;
        log.visits = draft.visits;
        log.notes = draft.notes;
        log.updated_at = Utc::now();
        Ok(Some(log.clone()))
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
