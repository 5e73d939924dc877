// identity/memory.rs - In-process identity service for tests and local demos

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Duration;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Identity, IdentityError, IdentityProvider, NewIdentity};
use crate::auth::{Claims, TokenIssuer, TokenVerifier};

/// Email the service would have sent
#[derive(Debug, Clone, PartialEq)]
pub struct SentEmail {
    pub email: String,
    pub redirect_to: String,
}

#[derive(Debug, Clone)]
struct Account {
    identity: Identity,
    metadata: Value,
}

#[derive(Default)]
struct Mailbox {
    invitations: Vec<SentEmail>,
    password_resets: Vec<SentEmail>,
}

/// Identity service double that mints real HS256 session tokens
pub struct MemoryIdentity {
    issuer: TokenIssuer,
    verifier: TokenVerifier,
    accounts: RwLock<Vec<Account>>,
    mailbox: RwLock<Mailbox>,
    reject_invites: AtomicBool,
}

impl MemoryIdentity {
    pub fn new(secret: &str) -> Self {
        Self {
            issuer: TokenIssuer::new(secret),
            verifier: TokenVerifier::new(secret),
            accounts: RwLock::new(Vec::new()),
            mailbox: RwLock::new(Mailbox::default()),
            reject_invites: AtomicBool::new(false),
        }
    }

    /// Create a confirmed account directly
    pub async fn register(&self, email: &str) -> Result<Identity, IdentityError> {
        self.add_account(email, Value::Null).await
    }

    /// Session token for an existing account
    pub async fn token_for(&self, user_id: Uuid) -> Result<String, IdentityError> {
        let accounts = self.accounts.read().await;
        let account = accounts
            .iter()
            .find(|a| a.identity.id == user_id)
            .ok_or(IdentityError::InvalidToken)?;
        let claims = Claims::new(user_id, account.identity.email.clone(), Duration::hours(1));
        self.issuer
            .issue(&claims)
            .map_err(|e| IdentityError::Parse(e.to_string()))
    }

    pub async fn find_by_email(&self, email: &str) -> Option<Identity> {
        let accounts = self.accounts.read().await;
        accounts
            .iter()
            .find(|a| a.identity.email.as_deref() == Some(email))
            .map(|a| a.identity.clone())
    }

    pub async fn metadata(&self, user_id: Uuid) -> Option<Value> {
        let accounts = self.accounts.read().await;
        accounts
            .iter()
            .find(|a| a.identity.id == user_id)
            .map(|a| a.metadata.clone())
    }

    pub async fn invitations(&self) -> Vec<SentEmail> {
        self.mailbox.read().await.invitations.clone()
    }

    pub async fn password_resets(&self) -> Vec<SentEmail> {
        self.mailbox.read().await.password_resets.clone()
    }

    /// Make invitations fail the way the hosted service does on bad input
    pub fn reject_invites(&self, reject: bool) {
        self.reject_invites.store(reject, Ordering::SeqCst);
    }

    async fn add_account(&self, email: &str, metadata: Value) -> Result<Identity, IdentityError> {
        let mut accounts = self.accounts.write().await;
        if accounts
            .iter()
            .any(|a| a.identity.email.as_deref() == Some(email))
        {
            return Err(IdentityError::Rejected {
                status: 422,
                message: "A user with this email address has already been registered".to_string(),
            });
        }
        let identity = Identity {
            id: Uuid::new_v4(),
            email: Some(email.to_string()),
        };
        accounts.push(Account {
            identity: identity.clone(),
            metadata,
        });
        Ok(identity)
    }
}

#[async_trait]
impl IdentityProvider for MemoryIdentity {
    async fn get_user(&self, token: &str) -> Result<Identity, IdentityError> {
        let claims = self
            .verifier
            .verify(token)
            .map_err(|_| IdentityError::InvalidToken)?;
        let accounts = self.accounts.read().await;
        accounts
            .iter()
            .find(|a| a.identity.id == claims.sub)
            .map(|a| a.identity.clone())
            .ok_or(IdentityError::InvalidToken)
    }

    async fn invite_user_by_email(
        &self,
        email: &str,
        redirect_to: &str,
        metadata: Value,
    ) -> Result<Identity, IdentityError> {
        if self.reject_invites.load(Ordering::SeqCst) {
            return Err(IdentityError::Rejected {
                status: 422,
                message: "Unable to validate email address: invalid format".to_string(),
            });
        }
        let identity = self.add_account(email, metadata).await?;
        self.mailbox.write().await.invitations.push(SentEmail {
            email: email.to_string(),
            redirect_to: redirect_to.to_string(),
        });
        Ok(identity)
    }

    async fn create_user(&self, request: NewIdentity) -> Result<Identity, IdentityError> {
        self.add_account(&request.email, request.metadata).await
    }

    async fn delete_user(&self, user_id: Uuid) -> Result<(), IdentityError> {
        let mut accounts = self.accounts.write().await;
        let before = accounts.len();
        accounts.retain(|a| a.identity.id != user_id);
        if accounts.len() == before {
            return Err(IdentityError::Rejected {
                status: 404,
                message: "User not found".to_string(),
            });
        }
        Ok(())
    }

    async fn send_password_reset(&self, email: &str, redirect_to: &str) -> Result<(), IdentityError> {
        self.mailbox.write().await.password_resets.push(SentEmail {
            email: email.to_string(),
            redirect_to: redirect_to.to_string(),
        });
        Ok(())
    }
}
