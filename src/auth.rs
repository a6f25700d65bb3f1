//! OAuth2 client-credentials token provider for the catalog API.
//!
//! The token is cached in the provider and refreshed lazily once its
//! `expires_in` has elapsed. Nothing here is global: the provider is created
//! per run and handed to [`crate::catalog::TidalCatalog`].

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::debug;

use crate::traits::TokenProvider;

/// Tokens are refreshed this long before the server says they expire.
const EXPIRY_MARGIN: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

struct CachedToken {
    value: String,
    expires_at: Option<Instant>,
}

impl CachedToken {
    fn is_fresh(&self, now: Instant) -> bool {
        match self.expires_at {
            Some(at) => now + EXPIRY_MARGIN < at,
            None => true,
        }
    }
}

/// Client-credentials grant against the catalog's auth endpoint.
pub struct ClientCredentials {
    client: reqwest::Client,
    auth_url: String,
    client_id: String,
    client_secret: String,
    cached: Mutex<Option<CachedToken>>,
}

impl ClientCredentials {
    pub fn new(
        client: reqwest::Client,
        auth_url: &str,
        client_id: String,
        client_secret: String,
    ) -> Self {
        Self {
            client,
            auth_url: auth_url.to_string(),
            client_id,
            client_secret,
            cached: Mutex::new(None),
        }
    }

    async fn request_token(&self) -> Result<CachedToken> {
        let response = self
            .client
            .post(&self.auth_url)
            .header(
                reqwest::header::AUTHORIZATION,
                basic_auth_header(&self.client_id, &self.client_secret),
            )
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .with_context(|| format!("Token request to {} failed", self.auth_url))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("Token endpoint returned {}: {}", status, body);
        }

        let token: TokenResponse = response
            .json()
            .await
            .context("Invalid token response")?;
        debug!(expires_in = ?token.expires_in, "access token refreshed");

        Ok(CachedToken {
            value: token.access_token,
            expires_at: token
                .expires_in
                .map(|secs| Instant::now() + Duration::from_secs(secs)),
        })
    }
}

#[async_trait]
impl TokenProvider for ClientCredentials {
    async fn access_token(&self) -> Result<String> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref() {
            if token.is_fresh(Instant::now()) {
                return Ok(token.value.clone());
            }
        }
        let token = self.request_token().await?;
        let value = token.value.clone();
        *cached = Some(token);
        Ok(value)
    }
}

/// A fixed token, for callers that obtained one elsewhere.
pub struct StaticToken(pub String);

#[async_trait]
impl TokenProvider for StaticToken {
    async fn access_token(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}

/// `Basic <base64(id:secret)>`.
pub fn basic_auth_header(client_id: &str, client_secret: &str) -> String {
    format!(
        "Basic {}",
        STANDARD.encode(format!("{}:{}", client_id, client_secret))
    )
}
