//! OAuth2 authorization-code login against the platform

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use rand::{distributions::Alphanumeric, Rng};
use reqwest::{Client, Url};
use roster_common::OAuthConfig;
use serde::Deserialize;

/// Scope needed to read the caller's identity
const SCOPE: &str = "identify";

const STATE_LEN: usize = 32;

/// The authenticated account as the provider reports it
#[derive(Debug, Clone, Deserialize)]
pub struct Identity {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub global_name: Option<String>,
}

impl Identity {
    pub fn display_name(&self) -> &str {
        self.global_name.as_deref().unwrap_or(&self.username)
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Random CSRF state for one login attempt
pub fn generate_state() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(STATE_LEN)
        .map(char::from)
        .collect()
}

#[derive(Clone)]
pub struct OAuthClient {
    http: Client,
    config: OAuthConfig,
}

impl OAuthClient {
    /// Build the client
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be constructed
    pub fn new(config: OAuthConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .context("failed to build OAuth HTTP client")?;
        Ok(Self { http, config })
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base.trim_end_matches('/'), path)
    }

    /// Provider page the browser is sent to
    ///
    /// # Errors
    /// Returns an error if the configured authorize URL is malformed
    pub fn authorize_url(&self, state: &str) -> Result<Url> {
        Url::parse_with_params(
            &self.config.authorize_url,
            &[
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", self.config.callback_url.as_str()),
                ("response_type", "code"),
                ("scope", SCOPE),
                ("state", state),
            ],
        )
        .context("invalid authorize URL")
    }

    /// Trade an authorization code for an access token
    ///
    /// # Errors
    /// Returns an error if the provider rejects the code or is unreachable
    pub async fn exchange_code(&self, code: &str) -> Result<String> {
        let resp = self
            .http
            .post(self.api_url("/oauth2/token"))
            .form(&[
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.config.callback_url.as_str()),
            ])
            .send()
            .await
            .context("POST /oauth2/token failed")?;

        if !resp.status().is_success() {
            return Err(anyhow!("POST /oauth2/token → {}", resp.status()));
        }
        let token: TokenResponse = resp.json().await.context("deserialising token")?;
        Ok(token.access_token)
    }

    /// Identity behind an access token
    ///
    /// # Errors
    /// Returns an error if the provider rejects the token or is unreachable
    pub async fn fetch_identity(&self, access_token: &str) -> Result<Identity> {
        let resp = self
            .http
            .get(self.api_url("/users/@me"))
            .bearer_auth(access_token)
            .send()
            .await
            .context("GET /users/@me failed")?;

        if !resp.status().is_success() {
            return Err(anyhow!("GET /users/@me → {}", resp.status()));
        }
        resp.json().await.context("deserialising identity")
    }
}

impl std::fmt::Debug for OAuthClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthClient")
            .field("client_id", &self.config.client_id)
            .field("callback_url", &self.config.callback_url)
            .finish_non_exhaustive()
    }
}
