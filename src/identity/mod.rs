//! Identity service collaborator.
//!
//! Owns accounts and sessions: resolves bearer tokens to identities,
//! sends invitations and password-reset emails, and creates or deletes
//! accounts. Profiles, roles and tenancy live in the data store.

pub mod hosted;
pub mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

pub use hosted::HostedIdentity;
pub use memory::MemoryIdentity;

/// Account as reported by the identity service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
}

/// Confirmed account created directly by an admin
#[derive(Debug, Clone)]
pub struct NewIdentity {
    pub email: String,
    pub password: Option<String>,
    pub metadata: Value,
}

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("Identity service not configured: {0}")]
    NotConfigured(&'static str),

    #[error("Invalid or expired session token")]
    InvalidToken,

    #[error("Identity service error: {status} - {message}")]
    Rejected { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Parse error: {0}")]
    Parse(String),
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolve a session token to its identity
    async fn get_user(&self, token: &str) -> Result<Identity, IdentityError>;

    /// Create a pending identity and email it a link to `redirect_to`
    async fn invite_user_by_email(
        &self,
        email: &str,
        redirect_to: &str,
        metadata: Value,
    ) -> Result<Identity, IdentityError>;

    async fn create_user(&self, request: NewIdentity) -> Result<Identity, IdentityError>;

    async fn delete_user(&self, user_id: Uuid) -> Result<(), IdentityError>;

    async fn send_password_reset(&self, email: &str, redirect_to: &str) -> Result<(), IdentityError>;
}
