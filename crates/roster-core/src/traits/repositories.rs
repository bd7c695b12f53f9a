//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation. Upserts are idempotent: repeating the same
//! write leaves storage unchanged.

use async_trait::async_trait;

use crate::entities::{BirthdayEntry, Member, Role};
use crate::error::DomainError;
use crate::value_objects::{MemberId, RoleId};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Member Repository
// ============================================================================

#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// Find member by ID
    async fn find_by_id(&self, id: &MemberId) -> RepoResult<Option<Member>>;

    /// List all mirrored members ordered by display name
    async fn list(&self) -> RepoResult<Vec<Member>>;

    /// Insert or fully replace a member and its role set
    async fn upsert(&self, member: &Member) -> RepoResult<()>;

    /// Delete a member; deleting a missing member is not an error
    async fn delete(&self, id: &MemberId) -> RepoResult<()>;

    /// Replace the whole mirror with a bulk snapshot
    async fn replace_all(&self, members: &[Member]) -> RepoResult<()>;

    /// Store the cached admin flag
    async fn set_admin_snapshot(&self, id: &MemberId, is_admin: bool) -> RepoResult<()>;
}

// ============================================================================
// Role Repository
// ============================================================================

#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// Find role by ID
    async fn find_by_id(&self, id: &RoleId) -> RepoResult<Option<Role>>;

    /// Find the subset of `ids` that is known; unknown ids are skipped
    async fn find_by_ids(&self, ids: &[RoleId]) -> RepoResult<Vec<Role>>;

    /// List all roles ordered by name
    async fn list(&self) -> RepoResult<Vec<Role>>;

    /// Insert or replace a role
    async fn upsert(&self, role: &Role) -> RepoResult<()>;

    /// Delete a role; deleting a missing role is not an error
    async fn delete(&self, id: &RoleId) -> RepoResult<()>;

    /// Replace the whole registry with a bulk snapshot
    async fn replace_all(&self, roles: &[Role]) -> RepoResult<()>;
}

// ============================================================================
// Setting Repository
// ============================================================================

#[async_trait]
pub trait SettingRepository: Send + Sync {
    /// Read one value
    async fn get(&self, key: &str) -> RepoResult<Option<String>>;

    /// Read every stored pair (used to warm the in-process cache)
    async fn list(&self) -> RepoResult<Vec<(String, String)>>;

    /// Write one value, last writer wins
    async fn set(&self, key: &str, value: &str) -> RepoResult<()>;
}

// ============================================================================
// Birthday Repository
// ============================================================================

#[async_trait]
pub trait BirthdayRepository: Send + Sync {
    /// Find the entry for one identity
    async fn find_by_user(&self, user_id: &MemberId) -> RepoResult<Option<BirthdayEntry>>;

    /// Entries whose stored date equals `date` (`YYYY-MM-DD`) exactly
    async fn find_by_date(&self, date: &str) -> RepoResult<Vec<BirthdayEntry>>;

    /// Entries whose stored date ends with `month_day` (`MM-DD`)
    async fn find_by_month_day(&self, month_day: &str) -> RepoResult<Vec<BirthdayEntry>>;

    /// List all entries ordered by date
    async fn list(&self) -> RepoResult<Vec<BirthdayEntry>>;

    /// Insert or overwrite the entry for `entry.user_id`
    async fn upsert(&self, entry: &BirthdayEntry) -> RepoResult<()>;
}
