use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::Role;

/// One per authenticated identity. Role and active flag gate all access.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    pub user_id: Uuid,
    pub family_id: Option<Uuid>,
    pub role: Role,
    pub is_active: bool,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewProfile {
    pub user_id: Uuid,
    pub family_id: Uuid,
    pub role: Role,
    pub is_active: bool,
    pub full_name: String,
    pub email: String,
}

/// Changes applied to an admin profile; `None` leaves the column alone
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub full_name: Option<String>,
    pub is_active: Option<bool>,
}

impl ProfileChanges {
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none() && self.is_active.is_none()
    }
}
