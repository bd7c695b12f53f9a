//! Configuration structs

mod app_config;

pub use app_config::{
    AccessConfig, AppConfig, AppSettings, BirthdayConfig, BotConfig, ConfigError, DatabaseConfig,
    Environment, OAuthConfig, RateLimitConfig, ServerConfig, SessionConfig, SyncConfig,
};
