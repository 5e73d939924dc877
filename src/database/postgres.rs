// database/postgres.rs - Store implementation over a Postgres pool

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{types::Json, FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{
    Caregiver, CaregiverChanges, Client, ClientChanges, ClientSummary, DailyLog, LogDraft,
    LogEntry, LogFilter, LogScope, NewCaregiver, NewClient, NewProfile, Profile, ProfileChanges,
};
use crate::database::repository::{
    AssignmentRepository, CaregiverRepository, ClientRepository, LogRepository,
    ProfileRepository, Store, StoreResult,
};
use crate::types::{Meals, Role, Visits};

const PROFILE_COLUMNS: &str = "user_id, family_id, role, is_active, full_name, email, created_at";
const CAREGIVER_COLUMNS: &str = "id, user_id, family_id, full_name, email, phone, is_active, created_at";
const CLIENT_COLUMNS: &str = "id, family_id, full_name, dob, medications, insurance_company, \
     policy_number, allergies, emergency_contact_name, emergency_contact_phone, reason, \
     is_active, created_at";
const LOG_COLUMNS: &str = "id, family_id, client_id, caregiver_id, date, bp, meals, visits, \
     notes, created_at, updated_at";

#[derive(FromRow)]
struct ProfileRow {
    user_id: Uuid,
    family_id: Option<Uuid>,
    role: String,
    is_active: bool,
    full_name: Option<String>,
    email: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<ProfileRow> for Profile {
    type Error = DatabaseError;

    fn try_from(row: ProfileRow) -> Result<Self, Self::Error> {
        let role = Role::parse(&row.role)
            .ok_or_else(|| DatabaseError::Corrupt(format!("unknown role '{}'", row.role)))?;
        Ok(Profile {
            user_id: row.user_id,
            family_id: row.family_id,
            role,
            is_active: row.is_active,
            full_name: row.full_name,
            email: row.email,
            created_at: row.created_at,
        })
    }
}

#[derive(FromRow)]
struct LogRow {
    id: Uuid,
    family_id: Uuid,
    client_id: Uuid,
    caregiver_id: Uuid,
    date: NaiveDate,
    bp: Option<String>,
    meals: Json<Meals>,
    visits: Json<Visits>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<LogRow> for DailyLog {
    fn from(row: LogRow) -> Self {
        DailyLog {
            id: row.id,
            family_id: row.family_id,
            client_id: row.client_id,
            caregiver_id: row.caregiver_id,
            date: row.date,
            bp: row.bp,
            meals: row.meals.0,
            visits: row.visits.0,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(FromRow)]
struct LogEntryRow {
    id: Uuid,
    date: NaiveDate,
    bp: Option<String>,
    meals: Json<Meals>,
    visits: Json<Visits>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    client_id: Uuid,
    client_name: String,
    caregiver_id: Uuid,
    caregiver_name: String,
}

impl From<LogEntryRow> for LogEntry {
    fn from(row: LogEntryRow) -> Self {
        LogEntry {
            id: row.id,
            date: row.date,
            bp: row.bp,
            meals: row.meals.0,
            visits: row.visits.0,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
            client_id: row.client_id,
            client_name: row.client_name,
            caregiver_id: row.caregiver_id,
            caregiver_name: row.caregiver_name,
        }
    }
}

/// Map unique-key violations onto `Conflict`, everything else passes through
fn conflict_on_unique(err: sqlx::Error, what: &str) -> DatabaseError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            return DatabaseError::Conflict(format!("{} already exists", what));
        }
    }
    DatabaseError::Sqlx(err)
}

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileRepository for PgStore {
    async fn find_profile(&self, user_id: Uuid) -> StoreResult<Option<Profile>> {
        let sql = format!("SELECT {} FROM profiles WHERE user_id = $1", PROFILE_COLUMNS);
        let row = sqlx::query_as::<_, ProfileRow>(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Profile::try_from).transpose()
    }

    async fn find_profile_by_email(&self, family_id: Uuid, email: &str) -> StoreResult<Option<Profile>> {
        let sql = format!(
            "SELECT {} FROM profiles WHERE family_id = $1 AND lower(email) = lower($2)",
            PROFILE_COLUMNS
        );
        let row = sqlx::query_as::<_, ProfileRow>(&sql)
            .bind(family_id)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Profile::try_from).transpose()
    }

    async fn insert_profile(&self, profile: NewProfile) -> StoreResult<Profile> {
        let sql = format!(
            "INSERT INTO profiles (user_id, family_id, role, is_active, full_name, email) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
            PROFILE_COLUMNS
        );
        let row = sqlx::query_as::<_, ProfileRow>(&sql)
            .bind(profile.user_id)
            .bind(profile.family_id)
            .bind(profile.role.as_str())
            .bind(profile.is_active)
            .bind(&profile.full_name)
            .bind(&profile.email)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| conflict_on_unique(e, "profile"))?;
        Profile::try_from(row)
    }

    async fn list_admins(&self, family_id: Uuid) -> StoreResult<Vec<Profile>> {
        let sql = format!(
            "SELECT {} FROM profiles WHERE family_id = $1 AND role = 'admin' \
             ORDER BY full_name ASC NULLS LAST",
            PROFILE_COLUMNS
        );
        let rows = sqlx::query_as::<_, ProfileRow>(&sql)
            .bind(family_id)
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(Profile::try_from).collect()
    }

    async fn update_admin(
        &self,
        family_id: Uuid,
        user_id: Uuid,
        changes: ProfileChanges,
    ) -> StoreResult<Option<Profile>> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE profiles SET ");
        {
            let mut set = qb.separated(", ");
            if changes.is_empty() {
                set.push("user_id = user_id");
            }
            if let Some(name) = changes.full_name {
                set.push("full_name = ");
                set.push_bind_unseparated(name);
            }
            if let Some(active) = changes.is_active {
                set.push("is_active = ");
                set.push_bind_unseparated(active);
            }
        }
        qb.push(" WHERE user_id = ")
            .push_bind(user_id)
            .push(" AND family_id = ")
            .push_bind(family_id)
            .push(" AND role = 'admin' RETURNING ")
            .push(PROFILE_COLUMNS);

        let row = qb
            .build_query_as::<ProfileRow>()
            .fetch_optional(&self.pool)
            .await?;
        row.map(Profile::try_from).transpose()
    }
}

#[async_trait]
impl CaregiverRepository for PgStore {
    async fn list_caregivers(&self, family_id: Uuid) -> StoreResult<Vec<Caregiver>> {
        let sql = format!(
            "SELECT {} FROM caregivers WHERE family_id = $1 ORDER BY created_at DESC",
            CAREGIVER_COLUMNS
        );
        Ok(sqlx::query_as::<_, Caregiver>(&sql)
            .bind(family_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn find_caregiver(&self, family_id: Uuid, id: Uuid) -> StoreResult<Option<Caregiver>> {
        let sql = format!(
            "SELECT {} FROM caregivers WHERE id = $1 AND family_id = $2",
            CAREGIVER_COLUMNS
        );
        Ok(sqlx::query_as::<_, Caregiver>(&sql)
            .bind(id)
            .bind(family_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_caregiver_by_user(&self, family_id: Uuid, user_id: Uuid) -> StoreResult<Option<Caregiver>> {
        let sql = format!(
            "SELECT {} FROM caregivers WHERE user_id = $1 AND family_id = $2",
            CAREGIVER_COLUMNS
        );
        Ok(sqlx::query_as::<_, Caregiver>(&sql)
            .bind(user_id)
            .bind(family_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn provision_caregiver(&self, family_id: Uuid, caregiver: NewCaregiver) -> StoreResult<Caregiver> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO profiles (user_id, family_id, role, is_active, full_name, email) \
             VALUES ($1, $2, 'caregiver', TRUE, $3, $4) \
             ON CONFLICT (user_id) DO UPDATE SET \
                family_id = EXCLUDED.family_id, \
                role = EXCLUDED.role, \
                is_active = TRUE, \
                full_name = EXCLUDED.full_name, \
                email = EXCLUDED.email",
        )
        .bind(caregiver.user_id)
        .bind(family_id)
        .bind(&caregiver.full_name)
        .bind(&caregiver.email)
        .execute(&mut *tx)
        .await?;

        let sql = format!(
            "INSERT INTO caregivers (id, user_id, family_id, full_name, email, phone, is_active) \
             VALUES ($1, $2, $3, $4, $5, $6, TRUE) RETURNING {}",
            CAREGIVER_COLUMNS
        );
        let created = sqlx::query_as::<_, Caregiver>(&sql)
            .bind(caregiver.id)
            .bind(caregiver.user_id)
            .bind(family_id)
            .bind(&caregiver.full_name)
            .bind(&caregiver.email)
            .bind(&caregiver.phone)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| conflict_on_unique(e, "caregiver"))?;

        tx.commit().await?;
        Ok(created)
    }

    async fn update_caregiver(
        &self,
        family_id: Uuid,
        id: Uuid,
        changes: CaregiverChanges,
    ) -> StoreResult<Option<Caregiver>> {
        let active = changes.is_active;

        let mut qb = QueryBuilder::<Postgres>::new("UPDATE caregivers SET ");
        {
            let mut set = qb.separated(", ");
            if changes.is_empty() {
                set.push("id = id");
            }
            if let Some(name) = changes.full_name {
                set.push("full_name = ");
                set.push_bind_unseparated(name);
            }
            if let Some(phone) = changes.phone {
                set.push("phone = ");
                set.push_bind_unseparated(phone);
            }
            if let Some(active) = changes.is_active {
                set.push("is_active = ");
                set.push_bind_unseparated(active);
            }
        }
        qb.push(" WHERE id = ")
            .push_bind(id)
            .push(" AND family_id = ")
            .push_bind(family_id)
            .push(" RETURNING ")
            .push(CAREGIVER_COLUMNS);

        let mut tx = self.pool.begin().await?;
        let updated = qb
            .build_query_as::<Caregiver>()
            .fetch_optional(&mut *tx)
            .await?;

        if let (Some(caregiver), Some(active)) = (&updated, active) {
            sqlx::query("UPDATE profiles SET is_active = $1 WHERE user_id = $2 AND family_id = $3")
                .bind(active)
                .bind(caregiver.user_id)
                .bind(family_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(updated)
    }
}

#[async_trait]
impl ClientRepository for PgStore {
    async fn list_clients(&self, family_id: Uuid) -> StoreResult<Vec<Client>> {
        let sql = format!(
            "SELECT {} FROM clients WHERE family_id = $1 ORDER BY created_at DESC",
            CLIENT_COLUMNS
        );
        Ok(sqlx::query_as::<_, Client>(&sql)
            .bind(family_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn find_client(&self, family_id: Uuid, id: Uuid) -> StoreResult<Option<Client>> {
        let sql = format!("SELECT {} FROM clients WHERE id = $1 AND family_id = $2", CLIENT_COLUMNS);
        Ok(sqlx::query_as::<_, Client>(&sql)
            .bind(id)
            .bind(family_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn insert_client(&self, family_id: Uuid, client: NewClient) -> StoreResult<Client> {
        let sql = format!(
            "INSERT INTO clients (id, family_id, full_name, dob, medications, insurance_company, \
             policy_number, allergies, emergency_contact_name, emergency_contact_phone, reason, is_active) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, TRUE) RETURNING {}",
            CLIENT_COLUMNS
        );
        let d = client.details;
        Ok(sqlx::query_as::<_, Client>(&sql)
            .bind(client.id)
            .bind(family_id)
            .bind(client.full_name)
            .bind(d.dob)
            .bind(d.medications)
            .bind(d.insurance_company)
            .bind(d.policy_number)
            .bind(d.allergies)
            .bind(d.emergency_contact_name)
            .bind(d.emergency_contact_phone)
            .bind(d.reason)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn update_client(
        &self,
        family_id: Uuid,
        id: Uuid,
        changes: ClientChanges,
    ) -> StoreResult<Option<Client>> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE clients SET ");
        {
            let mut set = qb.separated(", ");
            if changes.is_empty() {
                set.push("id = id");
            }
            if let Some(name) = &changes.full_name {
                set.push("full_name = ");
                set.push_bind_unseparated(name.clone());
            }
            if let Some(dob) = changes.dob {
                set.push("dob = ");
                set.push_bind_unseparated(dob);
            }
            for (column, value) in changes.text_fields() {
                if let Some(value) = value {
                    set.push(format!("{} = ", column));
                    set.push_bind_unseparated(value.clone());
                }
            }
            if let Some(active) = changes.is_active {
                set.push("is_active = ");
                set.push_bind_unseparated(active);
            }
        }
        qb.push(" WHERE id = ")
            .push_bind(id)
            .push(" AND family_id = ")
            .push_bind(family_id)
            .push(" RETURNING ")
            .push(CLIENT_COLUMNS);

        Ok(qb
            .build_query_as::<Client>()
            .fetch_optional(&self.pool)
            .await?)
    }
}

#[async_trait]
impl AssignmentRepository for PgStore {
    async fn assigned_caregiver_ids(&self, family_id: Uuid, client_id: Uuid) -> StoreResult<Vec<Uuid>> {
        Ok(sqlx::query_scalar::<_, Uuid>(
            "SELECT caregiver_id FROM caregiver_clients \
             WHERE family_id = $1 AND client_id = $2 ORDER BY caregiver_id",
        )
        .bind(family_id)
        .bind(client_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn assigned_client_ids(&self, family_id: Uuid, caregiver_id: Uuid) -> StoreResult<Vec<Uuid>> {
        Ok(sqlx::query_scalar::<_, Uuid>(
            "SELECT client_id FROM caregiver_clients \
             WHERE family_id = $1 AND caregiver_id = $2 ORDER BY client_id",
        )
        .bind(family_id)
        .bind(caregiver_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn assigned_clients(&self, family_id: Uuid, caregiver_id: Uuid) -> StoreResult<Vec<ClientSummary>> {
        Ok(sqlx::query_as::<_, ClientSummary>(
            "SELECT c.id, c.full_name, c.is_active, c.created_at \
             FROM caregiver_clients cc JOIN clients c ON c.id = cc.client_id \
             WHERE cc.family_id = $1 AND c.family_id = $1 AND cc.caregiver_id = $2 \
             ORDER BY c.full_name ASC",
        )
        .bind(family_id)
        .bind(caregiver_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn is_assigned(&self, family_id: Uuid, caregiver_id: Uuid, client_id: Uuid) -> StoreResult<bool> {
        Ok(sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM caregiver_clients \
             WHERE family_id = $1 AND caregiver_id = $2 AND client_id = $3)",
        )
        .bind(family_id)
        .bind(caregiver_id)
        .bind(client_id)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn replace_assignments(
        &self,
        family_id: Uuid,
        client_id: Uuid,
        caregiver_ids: &[Uuid],
    ) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM caregiver_clients WHERE family_id = $1 AND client_id = $2")
            .bind(family_id)
            .bind(client_id)
            .execute(&mut *tx)
            .await?;

        if !caregiver_ids.is_empty() {
            sqlx::query(
                "INSERT INTO caregiver_clients (family_id, client_id, caregiver_id) \
                 SELECT $1, $2, UNNEST($3::uuid[]) ON CONFLICT DO NOTHING",
            )
            .bind(family_id)
            .bind(client_id)
            .bind(caregiver_ids.to_vec())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}

#[async_trait]
impl LogRepository for PgStore {
    async fn list_logs(&self, family_id: Uuid, filter: &LogFilter) -> StoreResult<Vec<LogEntry>> {
        let rows = sqlx::query_as::<_, LogEntryRow>(
            "SELECT l.id, l.date, l.bp, l.meals, l.visits, l.notes, l.created_at, l.updated_at, \
                    l.client_id, c.full_name AS client_name, \
                    l.caregiver_id, g.full_name AS caregiver_name \
             FROM logs l \
             JOIN clients c ON c.id = l.client_id \
             JOIN caregivers g ON g.id = l.caregiver_id \
             WHERE l.family_id = $1 \
               AND ($2::uuid IS NULL OR l.client_id = $2) \
               AND ($3::uuid[] IS NULL OR l.client_id = ANY($3)) \
             ORDER BY l.date DESC, l.created_at DESC",
        )
        .bind(family_id)
        .bind(filter.client_id)
        .bind(filter.visible_clients.clone())
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(LogEntry::from).collect())
    }

    async fn insert_log(&self, family_id: Uuid, id: Uuid, draft: LogDraft) -> StoreResult<DailyLog> {
        let sql = format!(
            "INSERT INTO logs (id, family_id, client_id, caregiver_id, date, bp, meals, visits, notes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING {}",
            LOG_COLUMNS
        );
        let row = sqlx::query_as::<_, LogRow>(&sql)
            .bind(id)
            .bind(family_id)
            .bind(draft.client_id)
            .bind(draft.caregiver_id)
            .bind(draft.date)
            .bind(draft.bp)
            .bind(Json(draft.meals))
            .bind(Json(draft.visits))
            .bind(draft.notes)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.into())
    }

    async fn update_log(&self, scope: LogScope, draft: LogDraft) -> StoreResult<Option<DailyLog>> {
        let sql = format!(
            "UPDATE logs SET client_id = $1, caregiver_id = $2, date = $3, bp = $4, meals = $5, \
             visits = $6, notes = $7, updated_at = now() \
             WHERE id = $8 AND family_id = $9 AND ($10::uuid IS NULL OR caregiver_id = $10) \
             RETURNING {}",
            LOG_COLUMNS
        );
        let row = sqlx::query_as::<_, LogRow>(&sql)
            .bind(draft.client_id)
            .bind(draft.caregiver_id)
            .bind(draft.date)
            .bind(draft.bp)
            .bind(Json(draft.meals))
            .bind(Json(draft.visits))
            .bind(draft.notes)
            .bind(scope.log_id)
            .bind(scope.family_id)
            .bind(scope.author)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(DailyLog::from))
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        DatabaseManager::health_check(&self.pool).await
    }
}
