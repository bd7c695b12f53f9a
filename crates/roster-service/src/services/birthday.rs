//! Birthday registration and the daily sweep

use chrono::{FixedOffset, NaiveDate, Offset, Utc};
use roster_core::entities::BirthdayEntry;
use roster_core::traits::NewChannel;
use roster_core::value_objects::{BirthdayDate, MatchMode, MemberId, RoleId};
use roster_core::DomainError;
use serde::Serialize;
use tracing::{error, info, instrument, warn};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::permission::PermissionResolver;
use super::settings::BirthdaySettings;

/// Outcome of one sweep
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    pub date: NaiveDate,
    pub matched: usize,
    pub roles_granted: usize,
    pub roles_revoked: usize,
    pub channels_created: usize,
    /// Matches no longer in the guild
    pub skipped: usize,
    pub failures: usize,
}

impl SweepReport {
    fn new(date: NaiveDate) -> Self {
        Self {
            date,
            matched: 0,
            roles_granted: 0,
            roles_revoked: 0,
            channels_created: 0,
            skipped: 0,
            failures: 0,
        }
    }
}

pub struct BirthdayService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> BirthdayService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Register `target`'s birthday on behalf of `invoker`
    ///
    /// # Errors
    /// - `PermissionDenied` when the invoker is not an admin
    /// - `InvalidBirthdayDate` when `raw_date` is not a real `YYYY-MM-DD` date
    #[instrument(skip(self))]
    pub async fn register(
        &self,
        invoker: &MemberId,
        target: &MemberId,
        raw_date: &str,
    ) -> ServiceResult<BirthdayEntry> {
        PermissionResolver::new(self.ctx).require_admin(invoker).await?;

        if target.as_str().trim().is_empty() {
            return Err(DomainError::ValidationError(
                "Choose the member whose birthday you are registering.".to_string(),
            )
            .into());
        }
        let date = BirthdayDate::parse(raw_date.trim())?;
        let entry = BirthdayEntry::new(target.clone(), date, Some(invoker.clone()));
        self.ctx.birthday_repo().upsert(&entry).await?;

        info!(date = %entry.date, "Birthday registered");
        Ok(entry)
    }

    /// All entries ordered by date
    pub async fn list(&self) -> ServiceResult<Vec<BirthdayEntry>> {
        Ok(self.ctx.birthday_repo().list().await?)
    }

    pub async fn find(&self, user_id: &MemberId) -> ServiceResult<Option<BirthdayEntry>> {
        Ok(self.ctx.birthday_repo().find_by_user(user_id).await?)
    }

    /// Today's calendar day in the configured zone
    pub fn today(&self) -> NaiveDate {
        let offset_minutes = self.ctx.birthday_config().utc_offset_minutes;
        let zone = offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| {
                warn!(offset_minutes, "UTC offset out of range, using UTC");
                Utc.fix()
            });
        self.ctx.clock().now().with_timezone(&zone).date_naive()
    }

    /// Entries firing on `day` under the configured match mode
    pub async fn matches_for(&self, day: NaiveDate) -> ServiceResult<Vec<BirthdayEntry>> {
        let repo = self.ctx.birthday_repo();
        let entries = match self.ctx.birthday_config().match_mode {
            MatchMode::Exact => {
                repo.find_by_date(BirthdayDate::from_naive(day).as_str())
                    .await?
            }
            MatchMode::Anniversary => {
                repo.find_by_month_day(BirthdayDate::from_naive(day).month_day())
                    .await?
            }
        };
        Ok(entries)
    }

    /// Grant roles and open channels for today's birthdays
    ///
    /// Per-member failures are counted and logged; the sweep always finishes.
    #[instrument(skip(self))]
    pub async fn sweep(&self) -> SweepReport {
        let today = self.today();
        let settings = self.ctx.settings().birthday_settings();
        let mut report = SweepReport::new(today);

        match self.matches_for(today).await {
            Ok(entries) => {
                report.matched = entries.len();
                for entry in &entries {
                    self.celebrate(entry, &settings, &mut report).await;
                }
            }
            Err(e) => {
                error!(error = %e, "Failed to load today's birthdays");
                report.failures += 1;
            }
        }

        if self.ctx.birthday_config().revoke_previous_day {
            if let (Some(role_id), Some(yesterday)) = (&settings.role_id, today.pred_opt()) {
                self.revoke(yesterday, role_id, &mut report).await;
            }
        }

        info!(
            date = %report.date,
            matched = report.matched,
            roles_granted = report.roles_granted,
            roles_revoked = report.roles_revoked,
            channels_created = report.channels_created,
            skipped = report.skipped,
            failures = report.failures,
            "Birthday sweep finished"
        );
        report
    }

    async fn celebrate(
        &self,
        entry: &BirthdayEntry,
        settings: &BirthdaySettings,
        report: &mut SweepReport,
    ) {
        let platform = self.ctx.platform();
        let user_id = &entry.user_id;

        let member = match platform.fetch_member(user_id).await {
            Ok(Some(member)) => member,
            Ok(None) => {
                info!(user_id = %user_id, "Birthday member left the guild, skipping");
                report.skipped += 1;
                return;
            }
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "Failed to fetch birthday member");
                report.failures += 1;
                return;
            }
        };

        if let Some(role_id) = &settings.role_id {
            match platform.add_role(user_id, role_id).await {
                Ok(()) => report.roles_granted += 1,
                Err(e) => {
                    warn!(user_id = %user_id, role_id = %role_id, error = %e, "Failed to grant birthday role");
                    report.failures += 1;
                }
            }
        }

        let channel = NewChannel {
            name: settings.channel_name(member.label()),
            parent_id: settings.category_id.clone(),
        };
        match platform.create_channel(&channel).await {
            Ok(channel_id) => {
                info!(user_id = %user_id, channel_id = %channel_id, name = %channel.name, "Birthday channel created");
                report.channels_created += 1;
            }
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "Failed to create birthday channel");
                report.failures += 1;
            }
        }
    }

    async fn revoke(&self, yesterday: NaiveDate, role_id: &RoleId, report: &mut SweepReport) {
        let entries = match self.matches_for(yesterday).await {
            Ok(entries) => entries,
            Err(e) => {
                error!(error = %e, "Failed to load yesterday's birthdays");
                report.failures += 1;
                return;
            }
        };

        let platform = self.ctx.platform();
        for entry in entries {
            let member = match platform.fetch_member(&entry.user_id).await {
                Ok(Some(member)) => member,
                Ok(None) => continue,
                Err(e) => {
                    warn!(user_id = %entry.user_id, error = %e, "Failed to fetch member for revoke");
                    report.failures += 1;
                    continue;
                }
            };
            if !member.role_ids.contains(role_id) {
                continue;
            }
            match platform.remove_role(&entry.user_id, role_id).await {
                Ok(()) => report.roles_revoked += 1,
                Err(e) => {
                    warn!(user_id = %entry.user_id, error = %e, "Failed to revoke birthday role");
                    report.failures += 1;
                }
            }
        }
    }
}
