//! Platform REST client

mod discord;
mod unconfigured;

pub use discord::DiscordClient;
pub use unconfigured::UnconfiguredPlatform;

use std::sync::Arc;

use roster_common::BotConfig;
use roster_core::traits::{PlatformClient, PlatformError};
use tracing::warn;

/// Platform client for `config`, or a stand-in that fails every call
pub fn platform_client(config: &BotConfig) -> Arc<dyn PlatformClient> {
    match DiscordClient::new(config) {
        Ok(client) => Arc::new(client),
        Err(PlatformError::NotConfigured(missing)) => {
            warn!(missing, "Bot not configured, platform calls disabled");
            Arc::new(UnconfiguredPlatform::new(missing))
        }
        Err(e) => {
            warn!(error = %e, "Failed to build platform client");
            Arc::new(UnconfiguredPlatform::new("DISCORD_BOT_TOKEN"))
        }
    }
}
