use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{Meals, Visits};

/// A dated care record for one client authored by one caregiver
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyLog {
    pub id: Uuid,
    pub family_id: Uuid,
    pub client_id: Uuid,
    pub caregiver_id: Uuid,
    pub date: NaiveDate,
    pub bp: Option<String>,
    pub meals: Meals,
    pub visits: Visits,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Log row flattened with client and caregiver names for list views
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogEntry {
    pub id: Uuid,
    pub date: NaiveDate,
    pub bp: Option<String>,
    pub meals: Meals,
    pub visits: Visits,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub client_id: Uuid,
    pub client_name: String,
    pub caregiver_id: Uuid,
    pub caregiver_name: String,
}

/// Column values written on insert and on update
#[derive(Debug, Clone)]
pub struct LogDraft {
    pub client_id: Uuid,
    pub caregiver_id: Uuid,
    pub date: NaiveDate,
    pub bp: Option<String>,
    pub meals: Meals,
    pub visits: Visits,
    pub notes: Option<String>,
}

/// Row scope for a log update
#[derive(Debug, Clone, Copy)]
pub struct LogScope {
    pub family_id: Uuid,
    pub log_id: Uuid,
    /// When set, only logs authored by this caregiver match
    pub author: Option<Uuid>,
}

#[derive(Debug, Clone, Default)]
pub struct LogFilter {
    pub client_id: Option<Uuid>,
    /// Restrict to these clients (caregiver visibility). `Some(vec![])` matches nothing.
    pub visible_clients: Option<Vec<Uuid>>,
}

impl LogFilter {
    pub fn matches(&self, client_id: Uuid) -> bool {
        if let Some(wanted) = self.client_id {
            if wanted != client_id {
                return false;
            }
        }
        match &self.visible_clients {
            Some(ids) => ids.contains(&client_id),
            None => true,
        }
    }
}
