//! Application state
//!
//! Holds the shared state for the Axum application: the service context,
//! the session signer, the OAuth client, and the bot handle.

use std::sync::Arc;

use roster_bot::BotHandle;
use roster_common::{AppConfig, SessionService};
use roster_service::ServiceContext;

use crate::oauth::OAuthClient;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    service_context: Arc<ServiceContext>,
    sessions: Arc<SessionService>,
    oauth: Arc<OAuthClient>,
    bot: BotHandle,
    config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(
        service_context: Arc<ServiceContext>,
        oauth: OAuthClient,
        bot: BotHandle,
        config: AppConfig,
    ) -> Self {
        let sessions = SessionService::new(&config.session.secret, config.session.ttl_secs);
        Self {
            service_context,
            sessions: Arc::new(sessions),
            oauth: Arc::new(oauth),
            bot,
            config: Arc::new(config),
        }
    }

    pub fn service_context(&self) -> &ServiceContext {
        &self.service_context
    }

    pub fn sessions(&self) -> &SessionService {
        &self.sessions
    }

    pub fn oauth(&self) -> &OAuthClient {
        &self.oauth
    }

    pub fn bot(&self) -> &BotHandle {
        &self.bot
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Whether cookies carry the `Secure` attribute
    pub fn secure_cookies(&self) -> bool {
        self.config.session.cookie_secure
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("service_context", &"ServiceContext")
            .field("bot_online", &self.bot.is_online())
            .field("config", &"AppConfig")
            .finish()
    }
}
