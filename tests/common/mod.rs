#![allow(dead_code)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::{Response, StatusCode};
use serde_json::Value;
use uuid::Uuid;

use carefull_api::config::AppConfig;
use carefull_api::database::models::{ClientDetails, NewCaregiver, NewClient, NewProfile};
use carefull_api::database::{
    AssignmentRepository, CaregiverRepository, ClientRepository, MemoryStore, ProfileRepository,
};
use carefull_api::identity::MemoryIdentity;
use carefull_api::server;
use carefull_api::state::AppState;
use carefull_api::types::Role;

pub const JWT_SECRET: &str = "integration-test-secret";
pub const PUBLIC_URL: &str = "https://care.test";

/// Router served on a free port, backed by in-memory collaborators
pub struct TestApp {
    pub base_url: String,
    pub store: Arc<MemoryStore>,
    pub identity: Arc<MemoryIdentity>,
    client: reqwest::Client,
}

/// A signed-in admin or caregiver
pub struct Member {
    pub user_id: Uuid,
    pub family_id: Uuid,
    pub token: String,
    /// Set for caregivers
    pub caregiver_id: Option<Uuid>,
}

impl TestApp {
    pub async fn spawn() -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let mut config = AppConfig::development();
        config.server.public_url = Some(PUBLIC_URL.to_string());

        let store = Arc::new(MemoryStore::new());
        let identity = Arc::new(MemoryIdentity::new(JWT_SECRET));
        let state = AppState::new(config, store.clone(), identity.clone());

        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind test listener")?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, server::app(state)).await;
        });

        let app = Self {
            base_url,
            store,
            identity,
            client: reqwest::Client::new(),
        };
        app.wait_ready(Duration::from_secs(5)).await?;
        Ok(app)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if let Ok(resp) = self.client.get(self.url("/health")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(25)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get(&self, path: &str, token: &str) -> Result<Response> {
        Ok(self.client.get(self.url(path)).bearer_auth(token).send().await?)
    }

    pub async fn post(&self, path: &str, token: &str, body: Value) -> Result<Response> {
        Ok(self
            .client
            .post(self.url(path))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?)
    }

    pub async fn patch(&self, path: &str, token: &str, body: Value) -> Result<Response> {
        Ok(self
            .client
            .patch(self.url(path))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?)
    }

    pub fn raw(&self) -> &reqwest::Client {
        &self.client
    }

    /// Active admin in `family_id`
    pub async fn admin(&self, family_id: Uuid, email: &str) -> Result<Member> {
        let identity = self.identity.register(email).await?;
        self.store
            .insert_profile(NewProfile {
                user_id: identity.id,
                family_id,
                role: Role::Admin,
                is_active: true,
                full_name: format!("Admin {}", email),
                email: email.to_string(),
            })
            .await?;
        let token = self.identity.token_for(identity.id).await?;
        Ok(Member {
            user_id: identity.id,
            family_id,
            token,
            caregiver_id: None,
        })
    }

    /// Active caregiver in `family_id` with profile and roster row
    pub async fn caregiver(&self, family_id: Uuid, email: &str, full_name: &str) -> Result<Member> {
        let identity = self.identity.register(email).await?;
        let caregiver = self
            .store
            .provision_caregiver(
                family_id,
                NewCaregiver {
                    id: Uuid::new_v4(),
                    user_id: identity.id,
                    full_name: full_name.to_string(),
                    email: email.to_string(),
                    phone: None,
                },
            )
            .await?;
        let token = self.identity.token_for(identity.id).await?;
        Ok(Member {
            user_id: identity.id,
            family_id,
            token,
            caregiver_id: Some(caregiver.id),
        })
    }

    pub async fn client_record(&self, family_id: Uuid, full_name: &str) -> Result<Uuid> {
        let client = self
            .store
            .insert_client(
                family_id,
                NewClient {
                    id: Uuid::new_v4(),
                    full_name: full_name.to_string(),
                    details: ClientDetails::default(),
                },
            )
            .await?;
        Ok(client.id)
    }

    pub async fn assign(&self, family_id: Uuid, client_id: Uuid, caregiver_ids: &[Uuid]) -> Result<()> {
        self.store
            .replace_assignments(family_id, client_id, caregiver_ids)
            .await?;
        Ok(())
    }
}

/// Status plus parsed JSON body
pub async fn read(resp: Response) -> Result<(StatusCode, Value)> {
    let status = resp.status();
    let body = resp.json::<Value>().await?;
    Ok((status, body))
}

pub fn meals_all(value: &str) -> Value {
    serde_json::json!({ "b": value, "l": value, "d": value })
}

pub fn visits_all(value: &str) -> Value {
    serde_json::json!({ "ot": value, "pt": value, "n": value })
}
