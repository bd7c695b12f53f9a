//! SQLite implementation of MemberRepository

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::collections::{HashMap, HashSet};
use tracing::instrument;

use roster_core::entities::Member;
use roster_core::error::DomainError;
use roster_core::traits::{MemberRepository, RepoResult};
use roster_core::value_objects::MemberId;

use crate::mappers::{member_with_roles, MemberInsert};
use crate::models::{MemberModel, MemberRoleModel};

use super::error::map_db_error;

/// SQLite implementation of MemberRepository
#[derive(Clone)]
pub struct SqliteMemberRepository {
    pool: SqlitePool,
}

impl SqliteMemberRepository {
    /// Create a new SqliteMemberRepository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Load role IDs for a member
    async fn load_role_ids(&self, member_id: &str) -> Result<Vec<String>, DomainError> {
        sqlx::query_scalar::<_, String>(
            r#"
            SELECT role_id FROM member_roles WHERE member_id = ?1 ORDER BY role_id
            "#,
        )
        .bind(member_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)
    }

    /// Upsert the member row and replace its role set inside `tx`
    ///
    /// The cached admin flag is only written on first insert; it has its own
    /// setter so a plain sync does not clobber the last resolved value.
    async fn write_member(
        tx: &mut Transaction<'_, Sqlite>,
        member: &MemberInsert<'_>,
    ) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO members (id, display_name, is_admin, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(id) DO UPDATE SET
                display_name = excluded.display_name,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(member.id)
        .bind(member.display_name)
        .bind(member.is_admin)
        .bind(Utc::now())
        .execute(&mut **tx)
        .await
        .map_err(map_db_error)?;

        sqlx::query("DELETE FROM member_roles WHERE member_id = ?1")
            .bind(member.id)
            .execute(&mut **tx)
            .await
            .map_err(map_db_error)?;

        for role_id in &member.role_ids {
            sqlx::query(
                r#"
                INSERT OR IGNORE INTO member_roles (member_id, role_id) VALUES (?1, ?2)
                "#,
            )
            .bind(member.id)
            .bind(*role_id)
            .execute(&mut **tx)
            .await
            .map_err(map_db_error)?;
        }

        Ok(())
    }
}

#[async_trait]
impl MemberRepository for SqliteMemberRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: &MemberId) -> RepoResult<Option<Member>> {
        let result = sqlx::query_as::<_, MemberModel>(
            r#"
            SELECT id, display_name, is_admin, updated_at
            FROM members
            WHERE id = ?1
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        match result {
            Some(model) => {
                let role_ids = self.load_role_ids(&model.id).await?;
                Ok(Some(member_with_roles(model, role_ids)))
            }
            None => Ok(None),
        }
    }

    #[instrument(skip(self))]
    async fn list(&self) -> RepoResult<Vec<Member>> {
        let models = sqlx::query_as::<_, MemberModel>(
            r#"
            SELECT id, display_name, is_admin, updated_at
            FROM members
            ORDER BY COALESCE(display_name, id) COLLATE NOCASE, id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        let links = sqlx::query_as::<_, MemberRoleModel>(
            r#"
            SELECT member_id, role_id FROM member_roles ORDER BY role_id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        let mut roles_by_member: HashMap<String, Vec<String>> = HashMap::new();
        for link in links {
            roles_by_member
                .entry(link.member_id)
                .or_default()
                .push(link.role_id);
        }

        Ok(models
            .into_iter()
            .map(|model| {
                let role_ids = roles_by_member.remove(&model.id).unwrap_or_default();
                member_with_roles(model, role_ids)
            })
            .collect())
    }

    #[instrument(skip(self, member), fields(member_id = %member.id))]
    async fn upsert(&self, member: &Member) -> RepoResult<()> {
        let insert = MemberInsert::new(member);
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;
        Self::write_member(&mut tx, &insert).await?;
        tx.commit().await.map_err(map_db_error)?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &MemberId) -> RepoResult<()> {
        sqlx::query("DELETE FROM members WHERE id = ?1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;
        Ok(())
    }

    #[instrument(skip(self, members), fields(count = members.len()))]
    async fn replace_all(&self, members: &[Member]) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let existing = sqlx::query_scalar::<_, String>("SELECT id FROM members")
            .fetch_all(&mut *tx)
            .await
            .map_err(map_db_error)?;

        let keep: HashSet<&str> = members.iter().map(|m| m.id.as_str()).collect();
        for stale in existing.iter().filter(|id| !keep.contains(id.as_str())) {
            sqlx::query("DELETE FROM members WHERE id = ?1")
                .bind(stale)
                .execute(&mut *tx)
                .await
                .map_err(map_db_error)?;
        }

        for member in members {
            Self::write_member(&mut tx, &MemberInsert::new(member)).await?;
        }

        tx.commit().await.map_err(map_db_error)?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn set_admin_snapshot(&self, id: &MemberId, is_admin: bool) -> RepoResult<()> {
        sqlx::query("UPDATE members SET is_admin = ?2 WHERE id = ?1")
            .bind(id.as_str())
            .bind(is_admin)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;
        Ok(())
    }
}
