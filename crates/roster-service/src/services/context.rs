//! Service context - dependency container for services
//!
//! Holds the repositories, the platform client, the clock, and the
//! process-scoped state objects (settings cache, attendance log). Built once
//! at startup and shared by `Arc` between the web surface and the bot.

use std::sync::Arc;

use roster_common::{AccessConfig, AppConfig, BirthdayConfig};
use roster_core::traits::{
    BirthdayRepository, Clock, MemberRepository, PlatformClient, RoleRepository,
    SettingRepository, SystemClock,
};
use roster_db::{
    SqliteBirthdayRepository, SqliteMemberRepository, SqlitePool, SqliteRoleRepository,
    SqliteSettingRepository,
};

use super::attendance::AttendanceLog;
use super::error::{ServiceError, ServiceResult};
use super::settings::SettingsStore;

/// Service context containing all dependencies
#[derive(Clone)]
pub struct ServiceContext {
    // Database pool
    pool: SqlitePool,

    // Repositories
    member_repo: Arc<dyn MemberRepository>,
    role_repo: Arc<dyn RoleRepository>,
    birthday_repo: Arc<dyn BirthdayRepository>,

    // Process-scoped state
    settings: Arc<SettingsStore>,
    attendance: Arc<AttendanceLog>,

    // Outbound
    platform: Arc<dyn PlatformClient>,
    clock: Arc<dyn Clock>,

    // Fixed configuration
    access: AccessConfig,
    birthday: BirthdayConfig,
}

impl ServiceContext {
    /// Start building a context
    pub fn builder() -> ServiceContextBuilder {
        ServiceContextBuilder::new()
    }

    /// Wire every repository to one SQLite pool
    pub fn sqlite(
        pool: SqlitePool,
        platform: Arc<dyn PlatformClient>,
        config: &AppConfig,
    ) -> Self {
        Self {
            member_repo: Arc::new(SqliteMemberRepository::new(pool.clone())),
            role_repo: Arc::new(SqliteRoleRepository::new(pool.clone())),
            birthday_repo: Arc::new(SqliteBirthdayRepository::new(pool.clone())),
            settings: Arc::new(SettingsStore::new(Arc::new(SqliteSettingRepository::new(
                pool.clone(),
            )))),
            attendance: Arc::new(AttendanceLog::new()),
            platform,
            clock: Arc::new(SystemClock),
            access: config.access.clone(),
            birthday: config.birthday.clone(),
            pool,
        }
    }

    /// Swap the clock (tests pin it to a day)
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    // === Database Pool ===

    /// Get the SQLite connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    // === Repositories ===

    /// Get the member repository
    pub fn member_repo(&self) -> &dyn MemberRepository {
        self.member_repo.as_ref()
    }

    /// Get the role repository
    pub fn role_repo(&self) -> &dyn RoleRepository {
        self.role_repo.as_ref()
    }

    /// Get the birthday repository
    pub fn birthday_repo(&self) -> &dyn BirthdayRepository {
        self.birthday_repo.as_ref()
    }

    // === Process-scoped state ===

    /// Get the settings store
    pub fn settings(&self) -> &SettingsStore {
        self.settings.as_ref()
    }

    /// Get the attendance log
    pub fn attendance(&self) -> &AttendanceLog {
        self.attendance.as_ref()
    }

    // === Outbound ===

    /// Get the platform client
    pub fn platform(&self) -> &dyn PlatformClient {
        self.platform.as_ref()
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    // === Configuration ===

    /// Fixed role ids used by permission resolution
    pub fn access_config(&self) -> &AccessConfig {
        &self.access
    }

    pub fn birthday_config(&self) -> &BirthdayConfig {
        &self.birthday
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("pool", &"SqlitePool")
            .field("repositories", &"...")
            .field("access", &self.access)
            .field("birthday", &self.birthday)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom dependencies
pub struct ServiceContextBuilder {
    pool: Option<SqlitePool>,
    member_repo: Option<Arc<dyn MemberRepository>>,
    role_repo: Option<Arc<dyn RoleRepository>>,
    setting_repo: Option<Arc<dyn SettingRepository>>,
    birthday_repo: Option<Arc<dyn BirthdayRepository>>,
    platform: Option<Arc<dyn PlatformClient>>,
    clock: Arc<dyn Clock>,
    access: AccessConfig,
    birthday: BirthdayConfig,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self {
            pool: None,
            member_repo: None,
            role_repo: None,
            setting_repo: None,
            birthday_repo: None,
            platform: None,
            clock: Arc::new(SystemClock),
            access: AccessConfig::default(),
            birthday: AppConfig::default().birthday,
        }
    }

    pub fn pool(mut self, pool: SqlitePool) -> Self {
        self.pool = Some(pool);
        self
    }

    pub fn member_repo(mut self, repo: Arc<dyn MemberRepository>) -> Self {
        self.member_repo = Some(repo);
        self
    }

    pub fn role_repo(mut self, repo: Arc<dyn RoleRepository>) -> Self {
        self.role_repo = Some(repo);
        self
    }

    pub fn setting_repo(mut self, repo: Arc<dyn SettingRepository>) -> Self {
        self.setting_repo = Some(repo);
        self
    }

    pub fn birthday_repo(mut self, repo: Arc<dyn BirthdayRepository>) -> Self {
        self.birthday_repo = Some(repo);
        self
    }

    pub fn platform(mut self, platform: Arc<dyn PlatformClient>) -> Self {
        self.platform = Some(platform);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn access(mut self, access: AccessConfig) -> Self {
        self.access = access;
        self
    }

    pub fn birthday(mut self, birthday: BirthdayConfig) -> Self {
        self.birthday = birthday;
        self
    }

    /// Build the ServiceContext
    ///
    /// Repositories not given explicitly are backed by the pool.
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if the pool or platform is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        let pool = self
            .pool
            .ok_or_else(|| ServiceError::validation("pool is required"))?;
        let platform = self
            .platform
            .ok_or_else(|| ServiceError::validation("platform is required"))?;

        let setting_repo = self
            .setting_repo
            .unwrap_or_else(|| Arc::new(SqliteSettingRepository::new(pool.clone())));

        Ok(ServiceContext {
            member_repo: self
                .member_repo
                .unwrap_or_else(|| Arc::new(SqliteMemberRepository::new(pool.clone()))),
            role_repo: self
                .role_repo
                .unwrap_or_else(|| Arc::new(SqliteRoleRepository::new(pool.clone()))),
            birthday_repo: self
                .birthday_repo
                .unwrap_or_else(|| Arc::new(SqliteBirthdayRepository::new(pool.clone()))),
            settings: Arc::new(SettingsStore::new(setting_repo)),
            attendance: Arc::new(AttendanceLog::new()),
            platform,
            clock: self.clock,
            access: self.access,
            birthday: self.birthday,
            pool,
        })
    }
}

impl Default for ServiceContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
