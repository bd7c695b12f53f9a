//! Settings store
//!
//! Durable key/value pairs with an in-process read cache. Writes go to
//! storage first and then to the cache, so a failed write leaves the cache
//! untouched.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use roster_core::traits::SettingRepository;
use roster_core::value_objects::{ChannelId, RoleId};
use serde::Serialize;
use tracing::{info, instrument, warn};

use super::error::ServiceResult;

/// Persisted setting keys
pub mod keys {
    pub const AUTO_ROLE_IDS: &str = "autoRoleIds";
    /// Single-id key written by older deployments
    pub const AUTO_ROLE_ID_LEGACY: &str = "autoRoleId";
    pub const LOGIN_ROLE_IDS: &str = "loginRoleIds";
    pub const BIRTHDAY_CATEGORY_ID: &str = "birthdayCategoryId";
    pub const BIRTHDAY_CHANNEL_FORMAT: &str = "birthdayChannelFormat";
    pub const BIRTHDAY_ROLE_ID: &str = "birthdayRoleId";
}

/// Channel name template used when none is stored
pub const DEFAULT_CHANNEL_FORMAT: &str = "happy-birthday-{user}";

/// Placeholder replaced by the member's display name
pub const USER_PLACEHOLDER: &str = "{user}";

/// Birthday automation settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BirthdaySettings {
    /// Category new channels are created under
    pub category_id: Option<ChannelId>,
    pub channel_format: String,
    /// Celebratory role granted for the day
    pub role_id: Option<RoleId>,
}

impl Default for BirthdaySettings {
    fn default() -> Self {
        Self {
            category_id: None,
            channel_format: DEFAULT_CHANNEL_FORMAT.to_string(),
            role_id: None,
        }
    }
}

impl BirthdaySettings {
    /// Channel name for one member
    pub fn channel_name(&self, display_name: &str) -> String {
        self.channel_format.replace(USER_PLACEHOLDER, display_name)
    }
}

/// Parse a stored id list
///
/// Lists are written as JSON arrays. A bare comma separated value, as left by
/// older deployments, is accepted too. Blank entries are dropped and
/// duplicates collapse to their first occurrence.
pub fn parse_id_list(raw: &str) -> Vec<String> {
    let items: Vec<String> = match serde_json::from_str::<Vec<String>>(raw) {
        Ok(items) => items,
        Err(_) => raw.split(',').map(str::to_string).collect(),
    };

    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        let item = item.trim();
        if !item.is_empty() && !out.iter().any(|seen| seen == item) {
            out.push(item.to_string());
        }
    }
    out
}

fn encode_id_list(ids: &[RoleId]) -> String {
    let mut unique: Vec<&str> = Vec::with_capacity(ids.len());
    for id in ids {
        let id = id.as_str().trim();
        if !id.is_empty() && !unique.contains(&id) {
            unique.push(id);
        }
    }
    // Serializing a list of strings cannot fail
    serde_json::to_string(&unique).unwrap_or_else(|_| "[]".to_string())
}

/// Write-through settings cache
pub struct SettingsStore {
    repo: Arc<dyn SettingRepository>,
    cache: RwLock<HashMap<String, String>>,
}

impl SettingsStore {
    pub fn new(repo: Arc<dyn SettingRepository>) -> Self {
        Self {
            repo,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Load every stored pair into the cache
    ///
    /// # Errors
    /// Returns the storage error; the previous cache content is kept
    #[instrument(skip(self))]
    pub async fn reload(&self) -> ServiceResult<usize> {
        let pairs = self.repo.list().await?;
        let count = pairs.len();
        *self.cache.write() = pairs.into_iter().collect();
        info!(count, "Settings loaded");
        Ok(count)
    }

    /// Cached value for `key`
    pub fn get(&self, key: &str) -> Option<String> {
        self.cache.read().get(key).cloned()
    }

    /// Persist `value` under `key`, then cache it
    ///
    /// # Errors
    /// Returns the storage error; the cache is not touched
    #[instrument(skip(self, value))]
    pub async fn set(&self, key: &str, value: &str) -> ServiceResult<()> {
        self.repo.set(key, value).await?;
        self.cache.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    /// First key in `keys` holding a non-blank value
    ///
    /// Callers supply their compiled default when every key is absent.
    pub fn resolve_with_fallback(&self, keys: &[&str]) -> Option<String> {
        let cache = self.cache.read();
        keys.iter()
            .filter_map(|key| cache.get(*key))
            .find(|value| !value.trim().is_empty())
            .cloned()
    }

    fn role_ids(&self, keys: &[&str]) -> Vec<RoleId> {
        self.resolve_with_fallback(keys)
            .map(|raw| parse_id_list(&raw).into_iter().map(RoleId::new).collect())
            .unwrap_or_default()
    }

    /// Roles granted to every new member
    pub fn auto_role_ids(&self) -> Vec<RoleId> {
        self.role_ids(&[keys::AUTO_ROLE_IDS, keys::AUTO_ROLE_ID_LEGACY])
    }

    /// Roles whose holders may log in to the dashboard
    pub fn login_role_ids(&self) -> Vec<RoleId> {
        self.role_ids(&[keys::LOGIN_ROLE_IDS])
    }

    pub fn birthday_settings(&self) -> BirthdaySettings {
        let scalar = |key: &str| {
            self.resolve_with_fallback(&[key])
                .map(|v| v.trim().to_string())
        };

        BirthdaySettings {
            category_id: scalar(keys::BIRTHDAY_CATEGORY_ID).map(ChannelId::new),
            channel_format: scalar(keys::BIRTHDAY_CHANNEL_FORMAT)
                .unwrap_or_else(|| DEFAULT_CHANNEL_FORMAT.to_string()),
            role_id: scalar(keys::BIRTHDAY_ROLE_ID).map(RoleId::new),
        }
    }

    /// Replace the auto-role list
    pub async fn set_auto_role_ids(&self, ids: &[RoleId]) -> ServiceResult<()> {
        self.set(keys::AUTO_ROLE_IDS, &encode_id_list(ids)).await
    }

    /// Replace the login-eligible role list
    pub async fn set_login_role_ids(&self, ids: &[RoleId]) -> ServiceResult<()> {
        self.set(keys::LOGIN_ROLE_IDS, &encode_id_list(ids)).await
    }

    /// Store all birthday settings; `None` clears a value
    pub async fn set_birthday_settings(&self, settings: &BirthdaySettings) -> ServiceResult<()> {
        let format = settings.channel_format.trim();
        if !format.contains(USER_PLACEHOLDER) {
            warn!(format, "Birthday channel format has no {{user}} placeholder");
        }

        self.set(
            keys::BIRTHDAY_CATEGORY_ID,
            settings.category_id.as_ref().map_or("", ChannelId::as_str),
        )
        .await?;
        self.set(keys::BIRTHDAY_CHANNEL_FORMAT, format).await?;
        self.set(
            keys::BIRTHDAY_ROLE_ID,
            settings.role_id.as_ref().map_or("", RoleId::as_str),
        )
        .await
    }
}

impl std::fmt::Debug for SettingsStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsStore")
            .field("cached", &self.cache.read().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_db::{create_memory_pool, SqliteSettingRepository};

    async fn store() -> (SettingsStore, Arc<SqliteSettingRepository>) {
        let pool = create_memory_pool().await.unwrap();
        let repo = Arc::new(SqliteSettingRepository::new(pool));
        (SettingsStore::new(repo.clone()), repo)
    }

    fn ids(raw: &[&str]) -> Vec<RoleId> {
        raw.iter().map(|id| RoleId::new(*id)).collect()
    }

    #[test]
    fn test_parse_id_list_json() {
        assert_eq!(parse_id_list(r#"["r1","r2","r1"]"#), vec!["r1", "r2"]);
        assert!(parse_id_list("[]").is_empty());
    }

    #[test]
    fn test_parse_id_list_comma_fallback() {
        assert_eq!(parse_id_list("r1, r2,,r3"), vec!["r1", "r2", "r3"]);
        assert_eq!(parse_id_list("r1"), vec!["r1"]);
        assert!(parse_id_list("  ").is_empty());
    }

    #[test]
    fn test_channel_name() {
        let settings = BirthdaySettings::default();
        assert_eq!(settings.channel_name("alice"), "happy-birthday-alice");
    }

    #[tokio::test]
    async fn test_absent_keys_use_defaults() {
        let (store, _) = store().await;
        assert!(store.auto_role_ids().is_empty());
        assert!(store.login_role_ids().is_empty());
        assert_eq!(store.birthday_settings(), BirthdaySettings::default());
    }

    #[tokio::test]
    async fn test_auto_roles_fall_back_to_legacy_key() {
        let (store, _) = store().await;
        store.set(keys::AUTO_ROLE_ID_LEGACY, "r9").await.unwrap();
        assert_eq!(store.auto_role_ids(), ids(&["r9"]));

        store.set_auto_role_ids(&ids(&["r1", "r2"])).await.unwrap();
        assert_eq!(store.auto_role_ids(), ids(&["r1", "r2"]));
    }

    #[tokio::test]
    async fn test_explicit_empty_list_overrides_legacy() {
        let (store, _) = store().await;
        store.set(keys::AUTO_ROLE_ID_LEGACY, "r9").await.unwrap();
        store.set_auto_role_ids(&[]).await.unwrap();
        assert!(store.auto_role_ids().is_empty());
    }

    #[tokio::test]
    async fn test_write_through_and_reload() {
        let (store, repo) = store().await;
        store.set_login_role_ids(&ids(&["r1", "r1"])).await.unwrap();
        assert_eq!(
            repo.get(keys::LOGIN_ROLE_IDS).await.unwrap().as_deref(),
            Some(r#"["r1"]"#)
        );

        let fresh = SettingsStore::new(repo);
        assert!(fresh.login_role_ids().is_empty());
        assert_eq!(fresh.reload().await.unwrap(), 1);
        assert_eq!(fresh.login_role_ids(), ids(&["r1"]));
    }

    #[tokio::test]
    async fn test_birthday_settings_round_trip_and_clear() {
        let (store, _) = store().await;
        let settings = BirthdaySettings {
            category_id: Some(ChannelId::new("c1")),
            channel_format: "bday-{user}".to_string(),
            role_id: Some(RoleId::new("r5")),
        };
        store.set_birthday_settings(&settings).await.unwrap();
        assert_eq!(store.birthday_settings(), settings);

        store
            .set_birthday_settings(&BirthdaySettings {
                category_id: None,
                channel_format: String::new(),
                role_id: None,
            })
            .await
            .unwrap();
        assert_eq!(store.birthday_settings(), BirthdaySettings::default());
    }
}
