//! SQLite implementation of RoleRepository

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use std::collections::HashSet;
use tracing::instrument;

use roster_core::entities::Role;
use roster_core::error::DomainError;
use roster_core::traits::{RepoResult, RoleRepository};
use roster_core::value_objects::RoleId;

use crate::mappers::RoleInsert;
use crate::models::RoleModel;

use super::error::map_db_error;

/// SQLite implementation of RoleRepository
#[derive(Clone)]
pub struct SqliteRoleRepository {
    pool: SqlitePool,
}

impl SqliteRoleRepository {
    /// Create a new SqliteRoleRepository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn write_role(conn: &mut SqliteConnection, role: &RoleInsert<'_>) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO roles (id, name, permissions, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                permissions = excluded.permissions,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(role.id)
        .bind(role.name)
        .bind(role.permissions)
        .bind(Utc::now())
        .execute(conn)
        .await
        .map_err(map_db_error)?;
        Ok(())
    }
}

#[async_trait]
impl RoleRepository for SqliteRoleRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: &RoleId) -> RepoResult<Option<Role>> {
        let result = sqlx::query_as::<_, RoleModel>(
            r#"
            SELECT id, name, permissions, updated_at
            FROM roles
            WHERE id = ?1
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Role::from))
    }

    #[instrument(skip(self))]
    async fn find_by_ids(&self, ids: &[RoleId]) -> RepoResult<Vec<Role>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder: QueryBuilder<'_, Sqlite> =
            QueryBuilder::new("SELECT id, name, permissions, updated_at FROM roles WHERE id IN (");
        let mut separated = builder.separated(", ");
        for id in ids {
            separated.push_bind(id.as_str());
        }
        separated.push_unseparated(") ORDER BY name COLLATE NOCASE, id");

        let results = builder
            .build_query_as::<RoleModel>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(results.into_iter().map(Role::from).collect())
    }

    #[instrument(skip(self))]
    async fn list(&self) -> RepoResult<Vec<Role>> {
        let results = sqlx::query_as::<_, RoleModel>(
            r#"
            SELECT id, name, permissions, updated_at
            FROM roles
            ORDER BY name COLLATE NOCASE, id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Role::from).collect())
    }

    #[instrument(skip(self, role), fields(role_id = %role.id))]
    async fn upsert(&self, role: &Role) -> RepoResult<()> {
        let mut conn = self.pool.acquire().await.map_err(map_db_error)?;
        Self::write_role(&mut conn, &RoleInsert::new(role)).await
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &RoleId) -> RepoResult<()> {
        sqlx::query("DELETE FROM roles WHERE id = ?1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;
        Ok(())
    }

    #[instrument(skip(self, roles), fields(count = roles.len()))]
    async fn replace_all(&self, roles: &[Role]) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let existing = sqlx::query_scalar::<_, String>("SELECT id FROM roles")
            .fetch_all(&mut *tx)
            .await
            .map_err(map_db_error)?;

        let keep: HashSet<&str> = roles.iter().map(|r| r.id.as_str()).collect();
        for stale in existing.iter().filter(|id| !keep.contains(id.as_str())) {
            sqlx::query("DELETE FROM roles WHERE id = ?1")
                .bind(stale)
                .execute(&mut *tx)
                .await
                .map_err(map_db_error)?;
        }

        for role in roles {
            Self::write_role(&mut tx, &RoleInsert::new(role)).await?;
        }

        tx.commit().await.map_err(map_db_error)?;
        Ok(())
    }
}
