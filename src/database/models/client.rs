use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Care recipient
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct Client {
    pub id: Uuid,
    pub family_id: Uuid,
    pub full_name: String,
    pub dob: Option<NaiveDate>,
    pub medications: Option<String>,
    pub insurance_company: Option<String>,
    pub policy_number: Option<String>,
    pub allergies: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
    pub reason: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Short form used by client pickers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct ClientSummary {
    pub id: Uuid,
    pub full_name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&Client> for ClientSummary {
    fn from(client: &Client) -> Self {
        Self {
            id: client.id,
            full_name: client.full_name.clone(),
            is_active: client.is_active,
            created_at: client.created_at,
        }
    }
}

/// Free-text detail fields shared by create and update
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientDetails {
    pub dob: Option<NaiveDate>,
    pub medications: Option<String>,
    pub insurance_company: Option<String>,
    pub policy_number: Option<String>,
    pub allergies: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
    pub reason: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewClient {
    pub id: Uuid,
    pub full_name: String,
    pub details: ClientDetails,
}

/// Validated partial update; each nullable field is tri-state
#[derive(Debug, Clone, Default)]
pub struct ClientChanges {
    pub full_name: Option<String>,
    pub dob: Option<Option<NaiveDate>>,
    pub medications: Option<Option<String>>,
    pub insurance_company: Option<Option<String>>,
    pub policy_number: Option<Option<String>>,
    pub allergies: Option<Option<String>>,
    pub emergency_contact_name: Option<Option<String>>,
    pub emergency_contact_phone: Option<Option<String>>,
    pub reason: Option<Option<String>>,
    pub is_active: Option<bool>,
}

impl ClientChanges {
    /// Nullable text columns paired with their column names
    pub fn text_fields(&self) -> [(&'static str, &Option<Option<String>>); 7] {
        [
            ("medications", &self.medications),
            ("insurance_company", &self.insurance_company),
            ("policy_number", &self.policy_number),
            ("allergies", &self.allergies),
            ("emergency_contact_name", &self.emergency_contact_name),
            ("emergency_contact_phone", &self.emergency_contact_phone),
            ("reason", &self.reason),
        ]
    }

    pub fn is_empty(&self) -> bool {
        self.full_name.is_none()
            && self.dob.is_none()
            && self.is_active.is_none()
            && self.text_fields().iter().all(|(_, v)| v.is_none())
    }

    /// Apply the changes to an in-memory copy of the row
    pub fn apply(&self, client: &mut Client) {
        if let Some(name) = &self.full_name {
            client.full_name = name.clone();
        }
        if let Some(dob) = self.dob {
            client.dob = dob;
        }
        if let Some(v) = &self.medications {
            client.medications = v.clone();
        }
        if let Some(v) = &self.insurance_company {
            client.insurance_company = v.clone();
        }
        if let Some(v) = &self.policy_number {
            client.policy_number = v.clone();
        }
        if let Some(v) = &self.allergies {
            client.allergies = v.clone();
        }
        if let Some(v) = &self.emergency_contact_name {
            client.emergency_contact_name = v.clone();
        }
        if let Some(v) = &self.emergency_contact_phone {
            client.emergency_contact_phone = v.clone();
        }
        if let Some(v) = &self.reason {
            client.reason = v.clone();
        }
        if let Some(active) = self.is_active {
            client.is_active = active;
        }
    }
}
