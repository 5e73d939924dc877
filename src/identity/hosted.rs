// identity/hosted.rs - REST client for the hosted auth service (`/auth/v1`)

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use super::{Identity, IdentityError, IdentityProvider, NewIdentity};
use crate::auth::TokenVerifier;
use crate::config::IdentityConfig;

#[derive(Clone)]
pub struct HostedIdentity {
    client: reqwest::Client,
    base_url: String,
    service_key: String,
    anon_key: String,
    verifier: Option<TokenVerifier>,
}

/// The service reports failures under several different keys
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    msg: Option<String>,
    message: Option<String>,
    error_description: Option<String>,
    error: Option<String>,
}

impl ErrorBody {
    fn into_message(self) -> Option<String> {
        self.msg
            .or(self.message)
            .or(self.error_description)
            .or(self.error)
    }
}

impl HostedIdentity {
    pub fn new(config: &IdentityConfig) -> Result<Self, IdentityError> {
        let base_url = config
            .url
            .clone()
            .ok_or(IdentityError::NotConfigured("IDENTITY_URL"))?;
        let service_key = config
            .service_key
            .clone()
            .ok_or(IdentityError::NotConfigured("IDENTITY_SERVICE_KEY"))?;
        let anon_key = config.anon_key.clone().unwrap_or_else(|| service_key.clone());

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            service_key,
            anon_key,
            verifier: config.jwt_secret.as_deref().map(TokenVerifier::new),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1{}", self.base_url, path)
    }

    fn privileged(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
    }

    async fn expect_identity(response: Response) -> Result<Identity, IdentityError> {
        let response = Self::check(response).await?;
        let body: Value = response
            .json()
            .await
            .map_err(|e| IdentityError::Parse(format!("Failed to parse response: {e}")))?;

        // Admin endpoints return the user directly; some versions wrap it in `user`
        let user = body.get("user").cloned().unwrap_or(body);
        serde_json::from_value(user)
            .map_err(|e| IdentityError::Parse(format!("Unexpected user payload: {e}")))
    }

    async fn check(response: Response) -> Result<Response, IdentityError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .ok()
            .and_then(ErrorBody::into_message)
            .unwrap_or_else(|| {
                if text.is_empty() {
                    status.to_string()
                } else {
                    text
                }
            });

        Err(IdentityError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl IdentityProvider for HostedIdentity {
    async fn get_user(&self, token: &str) -> Result<Identity, IdentityError> {
        if let Some(verifier) = &self.verifier {
            let claims = verifier.verify(token).map_err(|e| {
                tracing::debug!("Local token verification failed: {}", e);
                IdentityError::InvalidToken
            })?;
            return Ok(Identity {
                id: claims.sub,
                email: claims.email,
            });
        }

        let response = self
            .client
            .get(self.endpoint("/user"))
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
            .send()
            .await?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(IdentityError::InvalidToken),
            _ => Self::expect_identity(response).await,
        }
    }

    async fn invite_user_by_email(
        &self,
        email: &str,
        redirect_to: &str,
        metadata: Value,
    ) -> Result<Identity, IdentityError> {
        let request = self
            .client
            .post(self.endpoint("/invite"))
            .query(&[("redirect_to", redirect_to)])
            .json(&json!({ "email": email, "data": metadata }));

        let response = self.privileged(request).send().await?;
        Self::expect_identity(response).await
    }

    async fn create_user(&self, request: NewIdentity) -> Result<Identity, IdentityError> {
        let mut body = json!({
            "email": request.email,
            "email_confirm": true,
            "user_metadata": request.metadata,
        });
        if let Some(password) = request.password {
            body["password"] = json!(password);
        }

        let builder = self.client.post(self.endpoint("/admin/users")).json(&body);
        let response = self.privileged(builder).send().await?;
        Self::expect_identity(response).await
    }

    async fn delete_user(&self, user_id: Uuid) -> Result<(), IdentityError> {
        let builder = self
            .client
            .delete(self.endpoint(&format!("/admin/users/{}", user_id)));
        let response = self.privileged(builder).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn send_password_reset(&self, email: &str, redirect_to: &str) -> Result<(), IdentityError> {
        let response = self
            .client
            .post(self.endpoint("/recover"))
            .query(&[("redirect_to", redirect_to)])
            .header("apikey", &self.anon_key)
            .json(&json!({ "email": email }))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}
