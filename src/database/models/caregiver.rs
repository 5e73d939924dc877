use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Care-staff record linked to a caregiver login
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct Caregiver {
    pub id: Uuid,
    pub user_id: Uuid,
    pub family_id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewCaregiver {
    pub id: Uuid,
    pub user_id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
}

/// Validated partial update. `phone: Some(None)` clears the phone number.
#[derive(Debug, Clone, Default)]
pub struct CaregiverChanges {
    pub full_name: Option<String>,
    pub phone: Option<Option<String>>,
    pub is_active: Option<bool>,
}

impl CaregiverChanges {
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none() && self.phone.is_none() && self.is_active.is_none()
    }
}
