//! REST client for the platform's v10 HTTP API

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use roster_common::BotConfig;
use roster_core::traits::{
    NewChannel, PlatformClient, PlatformError, PlatformMember, PlatformResult, PlatformRole,
};
use roster_core::value_objects::{ChannelId, MemberId, RoleId};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::events::{
    ChannelPayload, CreateChannelBody, InteractionCallback, MemberPayload, RolePayload,
    UserPayload, CHANNEL_GUILD_TEXT,
};

/// Members per page when listing the guild (platform maximum)
const MEMBER_PAGE_SIZE: usize = 1000;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

const USER_AGENT: &str = concat!("roster-bot/", env!("CARGO_PKG_VERSION"));

/// Bot-token authenticated client bound to one guild
#[derive(Clone)]
pub struct DiscordClient {
    http: Client,
    api_base: String,
    token: String,
    guild_id: String,
}

impl DiscordClient {
    /// Build a client from configuration
    ///
    /// # Errors
    /// Returns `PlatformError::NotConfigured` when the token or guild is unset
    pub fn new(config: &BotConfig) -> PlatformResult<Self> {
        let token = config
            .token
            .clone()
            .ok_or(PlatformError::NotConfigured("DISCORD_BOT_TOKEN"))?;
        let guild_id = config
            .guild_id
            .clone()
            .ok_or(PlatformError::NotConfigured("DISCORD_GUILD_ID"))?;

        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| PlatformError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            token,
            guild_id,
        })
    }

    pub fn guild_id(&self) -> &str {
        &self.guild_id
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    fn guild_url(&self, path: &str) -> String {
        self.url(&format!("/guilds/{}{}", self.guild_id, path))
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.header(reqwest::header::AUTHORIZATION, format!("Bot {}", self.token))
    }

    /// Send a request and turn non-success statuses into errors
    async fn send(&self, request: RequestBuilder) -> PlatformResult<Response> {
        let response = self
            .authorized(request)
            .send()
            .await
            .map_err(|e| PlatformError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::UNAUTHORIZED {
            return Err(PlatformError::Unauthorized);
        }

        let message = response.text().await.unwrap_or_default();
        Err(PlatformError::Http {
            status: status.as_u16(),
            message,
        })
    }

    async fn json<T: DeserializeOwned>(response: Response) -> PlatformResult<T> {
        response
            .json::<T>()
            .await
            .map_err(|e| PlatformError::Decode(e.to_string()))
    }
}

impl std::fmt::Debug for DiscordClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordClient")
            .field("api_base", &self.api_base)
            .field("guild_id", &self.guild_id)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

#[async_trait]
impl PlatformClient for DiscordClient {
    #[instrument(skip(self))]
    async fn verify_credentials(&self) -> PlatformResult<String> {
        let response = self.send(self.http.get(self.url("/users/@me"))).await?;
        let user: UserPayload = Self::json(response).await?;
        Ok(user.username)
    }

    #[instrument(skip(self))]
    async fn fetch_member(&self, user_id: &MemberId) -> PlatformResult<Option<PlatformMember>> {
        let request = self.http.get(self.guild_url(&format!("/members/{user_id}")));
        match self.send(request).await {
            Ok(response) => {
                let member: MemberPayload = Self::json(response).await?;
                Ok(Some(member.into()))
            }
            Err(PlatformError::Http { status: 404, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    #[instrument(skip(self))]
    async fn list_members(&self) -> PlatformResult<Vec<PlatformMember>> {
        let mut members = Vec::new();
        let mut after = String::from("0");

        loop {
            let request = self.http.get(self.guild_url("/members")).query(&[
                ("limit", MEMBER_PAGE_SIZE.to_string()),
                ("after", after.clone()),
            ]);
            let page: Vec<MemberPayload> = Self::json(self.send(request).await?).await?;
            let page_len = page.len();
            debug!(page_len, "Fetched member page");

            let Some(last) = page.last() else { break };
            after = last.user.id.clone();
            members.extend(page.into_iter().map(PlatformMember::from));

            if page_len < MEMBER_PAGE_SIZE {
                break;
            }
        }

        Ok(members)
    }

    #[instrument(skip(self))]
    async fn list_roles(&self) -> PlatformResult<Vec<PlatformRole>> {
        let response = self.send(self.http.get(self.guild_url("/roles"))).await?;
        let roles: Vec<RolePayload> = Self::json(response).await?;
        Ok(roles.into_iter().map(PlatformRole::from).collect())
    }

    #[instrument(skip(self))]
    async fn add_role(&self, user_id: &MemberId, role_id: &RoleId) -> PlatformResult<()> {
        let url = self.guild_url(&format!("/members/{user_id}/roles/{role_id}"));
        self.send(self.http.put(url)).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn remove_role(&self, user_id: &MemberId, role_id: &RoleId) -> PlatformResult<()> {
        let url = self.guild_url(&format!("/members/{user_id}/roles/{role_id}"));
        self.send(self.http.delete(url)).await?;
        Ok(())
    }

    #[instrument(skip(self, channel), fields(name = %channel.name))]
    async fn create_channel(&self, channel: &NewChannel) -> PlatformResult<ChannelId> {
        let body = CreateChannelBody {
            name: &channel.name,
            kind: CHANNEL_GUILD_TEXT,
            parent_id: channel.parent_id.as_ref().map(ChannelId::as_str),
        };
        let response = self
            .send(self.http.post(self.guild_url("/channels")).json(&body))
            .await?;
        let created: ChannelPayload = Self::json(response).await?;
        Ok(ChannelId::new(created.id))
    }

    #[instrument(skip(self, interaction_token, content))]
    async fn reply(
        &self,
        interaction_id: &str,
        interaction_token: &str,
        content: &str,
        ephemeral: bool,
    ) -> PlatformResult<()> {
        // Interaction callbacks are authorized by the token in the path
        let url = self.url(&format!(
            "/interactions/{interaction_id}/{interaction_token}/callback"
        ));
        let body = InteractionCallback::message(content, ephemeral);
        let response = self
            .http
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| PlatformError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PlatformError::Http {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }
        Ok(())
    }
}
