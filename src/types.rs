/// Shared types used across the codebase

use serde::{Deserialize, Deserializer, Serialize};

/// Role carried by a profile. Gates every privileged request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Caregiver,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Caregiver => "caregiver",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Role::Admin),
            "caregiver" => Some(Role::Caregiver),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Yes/No answer as the log forms send it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum YesNo {
    Yes,
    No,
}

/// Meals taken: breakfast, lunch, dinner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meals {
    pub b: YesNo,
    pub l: YesNo,
    pub d: YesNo,
}

/// Visits received: occupational therapy, physical therapy, nurse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visits {
    pub ot: YesNo,
    pub pt: YesNo,
    pub n: YesNo,
}

/// Tri-state field for partial updates.
///
/// `None` = field absent (leave unchanged), `Some(None)` = explicit `null`
/// (clear), `Some(Some(v))` = set. Use together with `#[serde(default)]`.
pub type Patch<T> = Option<Option<T>>;

pub fn patch_field<'de, T, D>(deserializer: D) -> Result<Patch<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Trim a string and treat the empty result as missing
pub fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Normalize an email address for storage and comparison
pub fn normalize_email(value: &str) -> Option<String> {
    non_empty(value).map(|e| e.to_lowercase())
}
