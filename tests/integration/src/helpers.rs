//! Test helpers for integration tests
//!
//! Provides a test server with seeded state, session cookie minting, and
//! response assertions.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use reqwest::{header, redirect, Client, Response, StatusCode};
use roster_api::{create_app, oauth::OAuthClient, AppState};
use roster_bot::BotHandle;
use roster_common::{AppConfig, SessionService};
use roster_core::MemberId;
use roster_service::testing::{test_context_with, RecordingPlatform, TestOptions};
use roster_service::ServiceContext;
use serde::{de::DeserializeOwned, Serialize};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Name of the session cookie the server issues
pub const SESSION_COOKIE: &str = "roster_session";

/// Name of the login CSRF state cookie
pub const OAUTH_STATE_COOKIE: &str = "roster_oauth_state";

const TEST_SECRET: &str = "integration-test-session-secret";

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    pub ctx: Arc<ServiceContext>,
    pub platform: Arc<RecordingPlatform>,
    sessions: SessionService,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a server with default options
    pub async fn start() -> Result<Self> {
        Self::start_with(TestOptions::default()).await
    }

    /// Start a server whose context is built from `options`
    pub async fn start_with(options: TestOptions) -> Result<Self> {
        Self::start_with_config(test_config(&options), options).await
    }

    /// Start a server with an explicit configuration
    pub async fn start_with_config(config: AppConfig, options: TestOptions) -> Result<Self> {
        let (ctx, platform) = test_context_with(options).await;
        let ctx = Arc::new(ctx);

        let oauth = OAuthClient::new(config.oauth.clone())?;
        let sessions = SessionService::new(&config.session.secret, config.session.ttl_secs);
        let state = AppState::new(Arc::clone(&ctx), oauth, BotHandle::offline(), config);
        let app = create_app(state);

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        // Redirects are asserted, not followed
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .redirect(redirect::Policy::none())
            .build()?;

        Ok(Self {
            addr,
            client,
            ctx,
            platform,
            sessions,
            _handle: handle,
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path)
    }

    /// `Cookie` header value carrying a fresh session for `user_id`
    pub fn session_cookie(&self, user_id: &str, name: &str) -> Result<String> {
        let token = self.sessions.issue(&MemberId::new(user_id), Some(name))?;
        Ok(format!("{SESSION_COOKIE}={token}"))
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        Ok(self.client.get(self.url(path)).send().await?)
    }

    /// Make a GET request with a session cookie
    pub async fn get_as(&self, path: &str, cookie: &str) -> Result<Response> {
        Ok(self
            .client
            .get(self.url(path))
            .header(header::COOKIE, cookie)
            .send()
            .await?)
    }

    /// Make an empty POST request with a session cookie
    pub async fn post_as(&self, path: &str, cookie: &str) -> Result<Response> {
        Ok(self
            .client
            .post(self.url(path))
            .header(header::COOKIE, cookie)
            .send()
            .await?)
    }

    /// Make a POST request with a JSON body and a session cookie
    pub async fn post_json_as<T: Serialize>(
        &self,
        path: &str,
        cookie: &str,
        body: &T,
    ) -> Result<Response> {
        Ok(self
            .client
            .post(self.url(path))
            .header(header::COOKIE, cookie)
            .json(body)
            .send()
            .await?)
    }
}

/// Configuration for a test server
///
/// The rate limit is raised so parallel tests never trip it.
pub fn test_config(options: &TestOptions) -> AppConfig {
    let mut config = AppConfig::default();
    config.session.secret = TEST_SECRET.to_string();
    config.rate_limit.requests_per_second = 1000;
    config.rate_limit.burst = 1000;
    config.access = options.access.clone();
    config.birthday = options.birthday.clone();
    config
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(
    response: Response,
    expected_status: StatusCode,
) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(response.json().await?)
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(())
}

/// Assert a 303 redirect to `location`
pub fn assert_redirect(response: &Response, location: &str) {
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok()),
        Some(location)
    );
}

/// Every `Set-Cookie` header for `name`
pub fn set_cookies(response: &Response, name: &str) -> Vec<String> {
    let prefix = format!("{name}=");
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter(|v| v.starts_with(&prefix))
        .map(str::to_string)
        .collect()
}

/// The first `Set-Cookie` header for `name`, if the response sets one
pub fn set_cookie(response: &Response, name: &str) -> Option<String> {
    set_cookies(response, name).into_iter().next()
}

/// `name=value` part of a `Set-Cookie` header, usable as a `Cookie` header
pub fn cookie_pair(set_cookie: &str) -> &str {
    set_cookie.split(';').next().unwrap_or(set_cookie)
}

/// Whether a `Set-Cookie` header deletes its cookie
pub fn is_removal(set_cookie: &str) -> bool {
    set_cookie.contains("Max-Age=0")
}
