//! Test support: a recording platform double and context constructors
//!
//! Compiled for this crate's unit tests and, through the `testing` feature,
//! for the bot, the API and the integration tests.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use roster_common::{AccessConfig, AppConfig, BirthdayConfig};
use roster_core::traits::{
    FixedClock, NewChannel, PlatformClient, PlatformError, PlatformMember, PlatformResult,
    PlatformRole,
};
use roster_core::value_objects::{ChannelId, MemberId, Permissions, RoleId};
use roster_db::create_memory_pool;

use crate::services::ServiceContext;

/// A reply sent to a command interaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentReply {
    pub interaction_id: String,
    pub content: String,
    pub ephemeral: bool,
}

#[derive(Debug, Default)]
struct Recorded {
    members: HashMap<MemberId, PlatformMember>,
    roles: Vec<PlatformRole>,
    added: Vec<(MemberId, RoleId)>,
    removed: Vec<(MemberId, RoleId)>,
    channels: Vec<NewChannel>,
    replies: Vec<SentReply>,
    failing_roles: HashSet<RoleId>,
    failing_channels: HashSet<String>,
    reject_credentials: bool,
}

/// In-memory platform that records every outbound action
#[derive(Debug, Default)]
pub struct RecordingPlatform {
    state: Mutex<Recorded>,
}

impl RecordingPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a member in the fake guild
    pub fn add_member(&self, member: PlatformMember) {
        self.state
            .lock()
            .members
            .insert(member.user_id.clone(), member);
    }

    pub fn set_roles(&self, roles: Vec<PlatformRole>) {
        self.state.lock().roles = roles;
    }

    /// Make every add/remove of `role_id` fail
    pub fn fail_role(&self, role_id: RoleId) {
        self.state.lock().failing_roles.insert(role_id);
    }

    /// Make creating a channel with this name fail
    pub fn fail_channel(&self, name: &str) {
        self.state.lock().failing_channels.insert(name.to_string());
    }

    pub fn reject_credentials(&self) {
        self.state.lock().reject_credentials = true;
    }

    pub fn added_roles(&self) -> Vec<(MemberId, RoleId)> {
        self.state.lock().added.clone()
    }

    pub fn removed_roles(&self) -> Vec<(MemberId, RoleId)> {
        self.state.lock().removed.clone()
    }

    pub fn created_channels(&self) -> Vec<NewChannel> {
        self.state.lock().channels.clone()
    }

    pub fn replies(&self) -> Vec<SentReply> {
        self.state.lock().replies.clone()
    }
}

fn refused(what: &str) -> PlatformError {
    PlatformError::Http {
        status: 403,
        message: format!("{what} refused"),
    }
}

#[async_trait]
impl PlatformClient for RecordingPlatform {
    async fn verify_credentials(&self) -> PlatformResult<String> {
        if self.state.lock().reject_credentials {
            return Err(PlatformError::Unauthorized);
        }
        Ok("roster-test-bot".to_string())
    }

    async fn fetch_member(&self, user_id: &MemberId) -> PlatformResult<Option<PlatformMember>> {
        Ok(self.state.lock().members.get(user_id).cloned())
    }

    async fn list_members(&self) -> PlatformResult<Vec<PlatformMember>> {
        let mut members: Vec<_> = self.state.lock().members.values().cloned().collect();
        members.sort_by(|a, b| a.user_id.cmp(&b.user_id));
        Ok(members)
    }

    async fn list_roles(&self) -> PlatformResult<Vec<PlatformRole>> {
        Ok(self.state.lock().roles.clone())
    }

    async fn add_role(&self, user_id: &MemberId, role_id: &RoleId) -> PlatformResult<()> {
        let mut state = self.state.lock();
        if state.failing_roles.contains(role_id) {
            return Err(refused("add role"));
        }
        if let Some(member) = state.members.get_mut(user_id) {
            if !member.role_ids.contains(role_id) {
                member.role_ids.push(role_id.clone());
            }
        }
        state.added.push((user_id.clone(), role_id.clone()));
        Ok(())
    }

    async fn remove_role(&self, user_id: &MemberId, role_id: &RoleId) -> PlatformResult<()> {
        let mut state = self.state.lock();
        if state.failing_roles.contains(role_id) {
            return Err(refused("remove role"));
        }
        if let Some(member) = state.members.get_mut(user_id) {
            member.role_ids.retain(|r| r != role_id);
        }
        state.removed.push((user_id.clone(), role_id.clone()));
        Ok(())
    }

    async fn create_channel(&self, channel: &NewChannel) -> PlatformResult<ChannelId> {
        let mut state = self.state.lock();
        if state.failing_channels.contains(&channel.name) {
            return Err(refused("create channel"));
        }
        state.channels.push(channel.clone());
        Ok(ChannelId::new(format!("channel-{}", state.channels.len())))
    }

    async fn reply(
        &self,
        interaction_id: &str,
        _interaction_token: &str,
        content: &str,
        ephemeral: bool,
    ) -> PlatformResult<()> {
        self.state.lock().replies.push(SentReply {
            interaction_id: interaction_id.to_string(),
            content: content.to_string(),
            ephemeral,
        });
        Ok(())
    }
}

/// Knobs for [`test_context_with`]
#[derive(Debug, Clone)]
pub struct TestOptions {
    /// Pin the clock; wall clock when `None`
    pub now: Option<DateTime<Utc>>,
    pub birthday: BirthdayConfig,
    pub access: AccessConfig,
}

impl Default for TestOptions {
    fn default() -> Self {
        Self {
            now: None,
            birthday: AppConfig::default().birthday,
            access: AccessConfig::default(),
        }
    }
}

/// Context on a private in-memory database with a recording platform
pub async fn test_context() -> (ServiceContext, Arc<RecordingPlatform>) {
    test_context_with(TestOptions::default()).await
}

pub async fn test_context_with(options: TestOptions) -> (ServiceContext, Arc<RecordingPlatform>) {
    let pool = create_memory_pool().await.expect("in-memory pool");
    let platform = Arc::new(RecordingPlatform::new());

    let mut builder = ServiceContext::builder()
        .pool(pool)
        .platform(platform.clone())
        .access(options.access)
        .birthday(options.birthday);
    if let Some(now) = options.now {
        builder = builder.clock(Arc::new(FixedClock(now)));
    }

    (builder.build().expect("test context"), platform)
}

/// Platform role with raw permission bits
pub fn platform_role(id: &str, name: &str, bits: i64) -> PlatformRole {
    PlatformRole {
        id: RoleId::new(id),
        name: name.to_string(),
        permissions: Permissions::from_i64(bits),
    }
}
