//! SQLite implementation of BirthdayRepository

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::instrument;

use roster_core::entities::BirthdayEntry;
use roster_core::traits::{BirthdayRepository, RepoResult};
use roster_core::value_objects::MemberId;

use crate::mappers::BirthdayInsert;
use crate::models::BirthdayModel;

use super::error::map_db_error;

/// SQLite implementation of BirthdayRepository
#[derive(Clone)]
pub struct SqliteBirthdayRepository {
    pool: SqlitePool,
}

impl SqliteBirthdayRepository {
    /// Create a new SqliteBirthdayRepository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn into_entries(models: Vec<BirthdayModel>) -> RepoResult<Vec<BirthdayEntry>> {
    models.into_iter().map(BirthdayEntry::try_from).collect()
}

#[async_trait]
impl BirthdayRepository for SqliteBirthdayRepository {
    #[instrument(skip(self))]
    async fn find_by_user(&self, user_id: &MemberId) -> RepoResult<Option<BirthdayEntry>> {
        let result = sqlx::query_as::<_, BirthdayModel>(
            r#"
            SELECT user_id, date, registered_by, updated_at
            FROM birthdays
            WHERE user_id = ?1
            "#,
        )
        .bind(user_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(BirthdayEntry::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_date(&self, date: &str) -> RepoResult<Vec<BirthdayEntry>> {
        let results = sqlx::query_as::<_, BirthdayModel>(
            r#"
            SELECT user_id, date, registered_by, updated_at
            FROM birthdays
            WHERE date = ?1
            ORDER BY user_id
            "#,
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        into_entries(results)
    }

    #[instrument(skip(self))]
    async fn find_by_month_day(&self, month_day: &str) -> RepoResult<Vec<BirthdayEntry>> {
        // Dates are fixed-width, so the suffix starts at character 6
        let results = sqlx::query_as::<_, BirthdayModel>(
            r#"
            SELECT user_id, date, registered_by, updated_at
            FROM birthdays
            WHERE substr(date, 6) = ?1
            ORDER BY user_id
            "#,
        )
        .bind(month_day)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        into_entries(results)
    }

    #[instrument(skip(self))]
    async fn list(&self) -> RepoResult<Vec<BirthdayEntry>> {
        let results = sqlx::query_as::<_, BirthdayModel>(
            r#"
            SELECT user_id, date, registered_by, updated_at
            FROM birthdays
            ORDER BY substr(date, 6), user_id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        into_entries(results)
    }

    #[instrument(skip(self, entry), fields(user_id = %entry.user_id))]
    async fn upsert(&self, entry: &BirthdayEntry) -> RepoResult<()> {
        let insert = BirthdayInsert::new(entry);
        sqlx::query(
            r#"
            INSERT INTO birthdays (user_id, date, registered_by, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(user_id) DO UPDATE SET
                date = excluded.date,
                registered_by = excluded.registered_by,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(insert.user_id)
        .bind(insert.date)
        .bind(insert.registered_by)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;
        Ok(())
    }
}
