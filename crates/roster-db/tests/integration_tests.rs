//! Integration tests for roster-db repositories
//!
//! Each test runs against its own private in-memory SQLite database.
//!
//! ```bash
//! cargo test -p roster-db --test integration_tests
//! ```

use roster_core::entities::{BirthdayEntry, Member, Role};
use roster_core::traits::{
    BirthdayRepository, MemberRepository, RoleRepository, SettingRepository,
};
use roster_core::value_objects::{BirthdayDate, MemberId, Permissions, RoleId};
use roster_db::{
    create_memory_pool, SqliteBirthdayRepository, SqliteMemberRepository, SqlitePool,
    SqliteRoleRepository, SqliteSettingRepository,
};

async fn pool() -> SqlitePool {
    create_memory_pool().await.expect("in-memory pool")
}

fn member(id: &str, name: Option<&str>, roles: &[&str]) -> Member {
    Member::new(
        MemberId::new(id),
        name.map(str::to_string),
        roles.iter().map(|r| RoleId::new(*r)),
    )
}

fn role(id: &str, name: &str, bits: i64) -> Role {
    Role::new(RoleId::new(id), name.to_string(), Permissions::from_i64(bits))
}

// ============================================================================
// Members
// ============================================================================

#[tokio::test]
async fn test_member_upsert_and_find() {
    let repo = SqliteMemberRepository::new(pool().await);
    repo.upsert(&member("u1", Some("Alice"), &["r1", "r2"]))
        .await
        .unwrap();

    let found = repo.find_by_id(&MemberId::new("u1")).await.unwrap().unwrap();
    assert_eq!(found.display_name.as_deref(), Some("Alice"));
    assert_eq!(found.role_count(), 2);
    assert!(found.has_role(&RoleId::new("r2")));

    assert!(repo.find_by_id(&MemberId::new("nobody")).await.unwrap().is_none());
}

#[tokio::test]
async fn test_member_upsert_replaces_role_set() {
    let repo = SqliteMemberRepository::new(pool().await);
    repo.upsert(&member("u1", Some("Alice"), &["r1", "r2"]))
        .await
        .unwrap();
    repo.upsert(&member("u1", Some("Alicia"), &["r3"]))
        .await
        .unwrap();

    let found = repo.find_by_id(&MemberId::new("u1")).await.unwrap().unwrap();
    assert_eq!(found.display_name.as_deref(), Some("Alicia"));
    assert_eq!(
        found.role_ids.into_iter().collect::<Vec<_>>(),
        vec![RoleId::new("r3")]
    );
}

#[tokio::test]
async fn test_member_upsert_is_idempotent() {
    let repo = SqliteMemberRepository::new(pool().await);
    let m = member("u1", Some("Alice"), &["r1"]);
    repo.upsert(&m).await.unwrap();
    let first = repo.find_by_id(&m.id).await.unwrap().unwrap();

    repo.upsert(&m).await.unwrap();
    repo.upsert(&m).await.unwrap();
    let again = repo.find_by_id(&m.id).await.unwrap().unwrap();

    assert_eq!(first.display_name, again.display_name);
    assert_eq!(first.role_ids, again.role_ids);
    assert_eq!(repo.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_member_delete_cascades_roles() {
    let pool = pool().await;
    let repo = SqliteMemberRepository::new(pool.clone());
    repo.upsert(&member("u1", None, &["r1"])).await.unwrap();
    repo.delete(&MemberId::new("u1")).await.unwrap();
    // Deleting again is fine
    repo.delete(&MemberId::new("u1")).await.unwrap();

    let links: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM member_roles")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(links, 0);
}

#[tokio::test]
async fn test_member_list_orders_by_name() {
    let repo = SqliteMemberRepository::new(pool().await);
    repo.upsert(&member("u2", Some("bob"), &[])).await.unwrap();
    repo.upsert(&member("u1", Some("Alice"), &["r1"])).await.unwrap();

    let names: Vec<_> = repo
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|m| m.label().to_string())
        .collect();
    assert_eq!(names, vec!["Alice", "bob"]);
}

#[tokio::test]
async fn test_member_replace_all_drops_departed() {
    let repo = SqliteMemberRepository::new(pool().await);
    repo.upsert(&member("gone", Some("Gone"), &["r1"])).await.unwrap();
    repo.upsert(&member("u1", Some("Alice"), &[])).await.unwrap();

    repo.replace_all(&[member("u1", Some("Alice"), &["r9"]), member("u2", None, &[])])
        .await
        .unwrap();

    let ids: Vec<_> = repo.list().await.unwrap().into_iter().map(|m| m.id).collect();
    assert_eq!(ids.len(), 2);
    assert!(!ids.contains(&MemberId::new("gone")));
    let u1 = repo.find_by_id(&MemberId::new("u1")).await.unwrap().unwrap();
    assert!(u1.has_role(&RoleId::new("r9")));
}

#[tokio::test]
async fn test_admin_snapshot_survives_sync() {
    let repo = SqliteMemberRepository::new(pool().await);
    let id = MemberId::new("u1");
    repo.upsert(&member("u1", None, &[])).await.unwrap();
    repo.set_admin_snapshot(&id, true).await.unwrap();

    repo.upsert(&member("u1", Some("Alice"), &[])).await.unwrap();
    assert!(repo.find_by_id(&id).await.unwrap().unwrap().is_admin);
}

// ============================================================================
// Roles
// ============================================================================

#[tokio::test]
async fn test_role_upsert_find_and_delete() {
    let repo = SqliteRoleRepository::new(pool().await);
    repo.upsert(&role("r1", "Admin", 8)).await.unwrap();
    repo.upsert(&role("r1", "Administrators", 8)).await.unwrap();

    let found = repo.find_by_id(&RoleId::new("r1")).await.unwrap().unwrap();
    assert_eq!(found.name, "Administrators");
    assert!(found.is_administrator());

    repo.delete(&RoleId::new("r1")).await.unwrap();
    assert!(repo.find_by_id(&RoleId::new("r1")).await.unwrap().is_none());
}

#[tokio::test]
async fn test_role_permissions_keep_unknown_bits() {
    let repo = SqliteRoleRepository::new(pool().await);
    let bits = (1_i64 << 45) | (1 << 3);
    repo.upsert(&role("r1", "Odd", bits)).await.unwrap();

    let found = repo.find_by_id(&RoleId::new("r1")).await.unwrap().unwrap();
    assert_eq!(found.permissions.to_i64(), bits);
}

#[tokio::test]
async fn test_role_find_by_ids_skips_unknown() {
    let repo = SqliteRoleRepository::new(pool().await);
    repo.upsert(&role("r1", "Zeta", 0)).await.unwrap();
    repo.upsert(&role("r2", "Alpha", 0)).await.unwrap();

    let found = repo
        .find_by_ids(&[RoleId::new("r1"), RoleId::new("missing"), RoleId::new("r2")])
        .await
        .unwrap();
    let names: Vec<_> = found.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Alpha", "Zeta"]);

    assert!(repo.find_by_ids(&[]).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_role_replace_all() {
    let repo = SqliteRoleRepository::new(pool().await);
    repo.upsert(&role("old", "Old", 0)).await.unwrap();
    repo.replace_all(&[role("r1", "New", 8)]).await.unwrap();

    let all = repo.list().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, RoleId::new("r1"));
}

// ============================================================================
// Settings
// ============================================================================

#[tokio::test]
async fn test_settings_last_writer_wins() {
    let repo = SqliteSettingRepository::new(pool().await);
    assert!(repo.get("autoRoleIds").await.unwrap().is_none());

    repo.set("autoRoleIds", "[\"r1\"]").await.unwrap();
    repo.set("autoRoleIds", "[\"r2\"]").await.unwrap();
    repo.set("birthdayRoleId", "r9").await.unwrap();

    assert_eq!(repo.get("autoRoleIds").await.unwrap().as_deref(), Some("[\"r2\"]"));
    assert_eq!(repo.list().await.unwrap().len(), 2);
}

// ============================================================================
// Birthdays
// ============================================================================

fn entry(user: &str, date: &str) -> BirthdayEntry {
    BirthdayEntry::new(
        MemberId::new(user),
        BirthdayDate::parse(date).unwrap(),
        Some(MemberId::new("admin")),
    )
}

#[tokio::test]
async fn test_birthday_upsert_overwrites() {
    let repo = SqliteBirthdayRepository::new(pool().await);
    repo.upsert(&entry("u1", "2024-03-10")).await.unwrap();
    repo.upsert(&entry("u1", "2024-04-01")).await.unwrap();

    let found = repo.find_by_user(&MemberId::new("u1")).await.unwrap().unwrap();
    assert_eq!(found.date.as_str(), "2024-04-01");
    assert_eq!(found.registered_by, Some(MemberId::new("admin")));
    assert_eq!(repo.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_birthday_find_by_date_and_month_day() {
    let repo = SqliteBirthdayRepository::new(pool().await);
    repo.upsert(&entry("u1", "2024-03-10")).await.unwrap();
    repo.upsert(&entry("u2", "1990-03-10")).await.unwrap();
    repo.upsert(&entry("u3", "2024-03-11")).await.unwrap();

    let exact = repo.find_by_date("2024-03-10").await.unwrap();
    assert_eq!(exact.len(), 1);
    assert_eq!(exact[0].user_id, MemberId::new("u1"));

    let yearly = repo.find_by_month_day("03-10").await.unwrap();
    assert_eq!(yearly.len(), 2);
}

#[tokio::test]
async fn test_corrupt_birthday_row_is_an_error() {
    let pool = pool().await;
    sqlx::query("INSERT INTO birthdays (user_id, date, updated_at) VALUES ('u1', '10-03-2024', '2024-01-01T00:00:00Z')")
        .execute(&pool)
        .await
        .unwrap();

    let repo = SqliteBirthdayRepository::new(pool);
    let err = repo.find_by_user(&MemberId::new("u1")).await.unwrap_err();
    assert_eq!(err.code(), "DATABASE_ERROR");
}
