//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file when
//! present). Absent values fall back to defaults that keep the process up;
//! a malformed value is an error.

use roster_core::{MatchMode, RoleId};
use serde::Deserialize;
use std::env;
use std::str::FromStr;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ServerConfig,
    pub database: DatabaseConfig,
    pub oauth: OAuthConfig,
    pub bot: BotConfig,
    pub access: AccessConfig,
    pub session: SessionConfig,
    pub birthday: BirthdayConfig,
    pub sync: SyncConfig,
    pub rate_limit: RateLimitConfig,
}

/// General application settings
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub name: String,
    pub env: Environment,
    /// Emit JSON log lines instead of the pretty format
    pub log_json: bool,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

/// HTTP listener configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// SQLite configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// OAuth2 client registration with the identity provider
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub callback_url: String,
    pub authorize_url: String,
    /// Base used for the token exchange and the identity lookup
    pub api_base: String,
}

impl OAuthConfig {
    /// Whether login can work at all
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.client_id.is_empty() && !self.client_secret.is_empty()
    }
}

/// Bot credentials and the guild it serves
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub token: Option<String>,
    pub guild_id: Option<String>,
    pub api_base: String,
    /// Capacity of the inbound event queue
    pub event_queue_capacity: usize,
}

/// Fixed role ids that short-circuit permission resolution
#[derive(Debug, Clone, Default)]
pub struct AccessConfig {
    /// Grants admin and login outright
    pub admin_role_id: Option<RoleId>,
    /// Grants admin and login outright
    pub special_role_id: Option<RoleId>,
    /// Grants the right to edit the login-eligible role list
    pub web_admin_role_id: Option<RoleId>,
}

/// Session cookie configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub secret: String,
    /// Session lifetime in seconds
    pub ttl_secs: i64,
    pub cookie_secure: bool,
}

/// Birthday automation configuration
#[derive(Debug, Clone)]
pub struct BirthdayConfig {
    /// Offset from UTC used to decide what "today" is
    pub utc_offset_minutes: i32,
    pub sweep_interval_secs: u64,
    pub match_mode: MatchMode,
    /// Take the celebratory role back from yesterday's matches
    pub revoke_previous_day: bool,
}

/// Mirror refresh configuration
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub refresh_interval_secs: u64,
}

/// Rate limiting configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub requests_per_second: u32,
    pub burst: u32,
}

// Default value functions
fn default_app_name() -> String {
    "roster".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_database_url() -> String {
    "sqlite://roster.db?mode=rwc".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_api_base() -> String {
    "https://discord.com/api/v10".to_string()
}

fn default_authorize_url() -> String {
    "https://discord.com/oauth2/authorize".to_string()
}

fn default_callback_url() -> String {
    format!("http://localhost:{}/callback", default_port())
}

fn default_event_queue_capacity() -> usize {
    1024
}

fn default_session_ttl() -> i64 {
    86400 // 1 day
}

fn default_utc_offset_minutes() -> i32 {
    540 // UTC+09:00
}

fn default_sweep_interval() -> u64 {
    86400
}

fn default_refresh_interval() -> u64 {
    3600
}

fn default_requests_per_second() -> u32 {
    10
}

fn default_burst() -> u32 {
    50
}

/// Read a variable, treating an empty value as absent
fn optional(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Read and parse a variable, falling back when absent
fn parsed<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match optional(key) {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key, raw)),
    }
}

fn flag(key: &'static str, default: bool) -> Result<bool, ConfigError> {
    match optional(key).map(|v| v.to_ascii_lowercase()) {
        None => Ok(default),
        Some(v) if matches!(v.as_str(), "1" | "true" | "yes" | "on") => Ok(true),
        Some(v) if matches!(v.as_str(), "0" | "false" | "no" | "off") => Ok(false),
        Some(v) => Err(ConfigError::InvalidValue(key, v)),
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if a variable is present but cannot be parsed
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let env = optional("APP_ENV")
            .and_then(|s| match s.to_lowercase().as_str() {
                "production" => Some(Environment::Production),
                "staging" => Some(Environment::Staging),
                "development" => Some(Environment::Development),
                _ => None,
            })
            .unwrap_or_default();

        let api_base = optional("DISCORD_API_BASE").unwrap_or_else(default_api_base);

        Ok(Self {
            app: AppSettings {
                name: optional("APP_NAME").unwrap_or_else(default_app_name),
                env,
                log_json: optional("LOG_FORMAT")
                    .map_or(env.is_production(), |f| f.eq_ignore_ascii_case("json")),
            },
            api: ServerConfig {
                host: optional("API_HOST").unwrap_or_else(default_host),
                port: parsed("API_PORT", default_port())?,
            },
            database: DatabaseConfig {
                url: optional("DATABASE_URL").unwrap_or_else(default_database_url),
                max_connections: parsed("DATABASE_MAX_CONNECTIONS", default_max_connections())?,
            },
            oauth: OAuthConfig {
                client_id: optional("DISCORD_CLIENT_ID").unwrap_or_default(),
                client_secret: optional("DISCORD_CLIENT_SECRET").unwrap_or_default(),
                callback_url: optional("CALLBACK_URL").unwrap_or_else(default_callback_url),
                authorize_url: optional("DISCORD_AUTHORIZE_URL")
                    .unwrap_or_else(default_authorize_url),
                api_base: api_base.clone(),
            },
            bot: BotConfig {
                token: optional("DISCORD_BOT_TOKEN"),
                guild_id: optional("DISCORD_GUILD_ID"),
                api_base,
                event_queue_capacity: parsed(
                    "EVENT_QUEUE_CAPACITY",
                    default_event_queue_capacity(),
                )?,
            },
            access: AccessConfig {
                admin_role_id: optional("ADMIN_ROLE_ID").map(RoleId::new),
                special_role_id: optional("SPECIAL_ROLE_ID").map(RoleId::new),
                web_admin_role_id: optional("WEB_ADMIN_ROLE_ID").map(RoleId::new),
            },
            session: SessionConfig {
                secret: optional("SESSION_SECRET").unwrap_or_default(),
                ttl_secs: parsed("SESSION_TTL_SECS", default_session_ttl())?,
                cookie_secure: flag("SESSION_COOKIE_SECURE", env.is_production())?,
            },
            birthday: BirthdayConfig {
                utc_offset_minutes: parsed(
                    "BIRTHDAY_UTC_OFFSET_MINUTES",
                    default_utc_offset_minutes(),
                )?,
                sweep_interval_secs: parsed(
                    "BIRTHDAY_SWEEP_INTERVAL_SECS",
                    default_sweep_interval(),
                )?,
                match_mode: parsed("BIRTHDAY_MATCH_MODE", MatchMode::default())?,
                revoke_previous_day: flag("BIRTHDAY_REVOKE_PREVIOUS_DAY", true)?,
            },
            sync: SyncConfig {
                refresh_interval_secs: parsed(
                    "MIRROR_REFRESH_INTERVAL_SECS",
                    default_refresh_interval(),
                )?,
            },
            rate_limit: RateLimitConfig {
                requests_per_second: parsed(
                    "RATE_LIMIT_REQUESTS_PER_SECOND",
                    default_requests_per_second(),
                )?,
                burst: parsed("RATE_LIMIT_BURST", default_burst())?,
            },
        })
    }

    /// Names of settings whose absence disables part of the system
    ///
    /// Logged as warnings at startup; none of them stop the process.
    #[must_use]
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.oauth.client_id.is_empty() {
            missing.push("DISCORD_CLIENT_ID");
        }
        if self.oauth.client_secret.is_empty() {
            missing.push("DISCORD_CLIENT_SECRET");
        }
        if self.bot.token.is_none() {
            missing.push("DISCORD_BOT_TOKEN");
        }
        if self.bot.guild_id.is_none() {
            missing.push("DISCORD_GUILD_ID");
        }
        if self.session.secret.is_empty() {
            missing.push("SESSION_SECRET");
        }
        missing
    }
}

impl Default for AppConfig {
    /// Every value at its default, as if the environment were empty
    fn default() -> Self {
        let api_base = default_api_base();
        Self {
            app: AppSettings {
                name: default_app_name(),
                env: Environment::Development,
                log_json: false,
            },
            api: ServerConfig {
                host: default_host(),
                port: default_port(),
            },
            database: DatabaseConfig {
                url: default_database_url(),
                max_connections: default_max_connections(),
            },
            oauth: OAuthConfig {
                client_id: String::new(),
                client_secret: String::new(),
                callback_url: default_callback_url(),
                authorize_url: default_authorize_url(),
                api_base: api_base.clone(),
            },
            bot: BotConfig {
                token: None,
                guild_id: None,
                api_base,
                event_queue_capacity: default_event_queue_capacity(),
            },
            access: AccessConfig::default(),
            session: SessionConfig {
                secret: String::new(),
                ttl_secs: default_session_ttl(),
                cookie_secure: false,
            },
            birthday: BirthdayConfig {
                utc_offset_minutes: default_utc_offset_minutes(),
                sweep_interval_secs: default_sweep_interval(),
                match_mode: MatchMode::default(),
                revoke_previous_day: true,
            },
            sync: SyncConfig {
                refresh_interval_secs: default_refresh_interval(),
            },
            rate_limit: RateLimitConfig {
                requests_per_second: default_requests_per_second(),
                burst: default_burst(),
            },
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
