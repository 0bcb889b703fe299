use chrono::{Duration, NaiveDate, Utc};
use log::{debug, info, warn};
use std::collections::HashSet;
use std::sync::Arc;

use super::streaks_model::{EndOfDayOutcome, StreakInfo, StreakKey, StreakLevel};
use super::streaks_traits::{StreakRepositoryTrait, StreakServiceTrait};
use crate::accounts::AccountRepositoryTrait;
use crate::constants::{SHIELD_WEEKLY_QUOTA, STREAK_LOOKBACK_DAYS};
use crate::db::DbTransactionExecutor;
use crate::errors::Result;
use crate::events::{DomainEvent, DomainEventSink, ShieldSource};
use crate::journal::JournalRepositoryTrait;
use crate::progress::ProgressRepositoryTrait;
use crate::tasks::TaskRepositoryTrait;
use crate::utils::time_utils::week_bounds;
use async_trait::async_trait;

/// The streak engine.
///
/// Owns the account-level day bookkeeping (end-of-day settlement, the replay
/// recalculation, the incremental activity path) and the shield inventory
/// policy. Per-event counter transitions are pure and live in the model; the
/// in-transaction helpers in `streaks_engine` let sibling services fold
/// streak effects into their own transactions.
pub struct StreakService<E: DbTransactionExecutor + Send + Sync + Clone> {
    streak_repository: Arc<dyn StreakRepositoryTrait>,
    account_repository: Arc<dyn AccountRepositoryTrait>,
    journal_repository: Arc<dyn JournalRepositoryTrait>,
    progress_repository: Arc<dyn ProgressRepositoryTrait>,
    task_repository: Arc<dyn TaskRepositoryTrait>,
    event_sink: Arc<dyn DomainEventSink>,
    transaction_executor: E,
}

impl<E: DbTransactionExecutor + Send + Sync + Clone> StreakService<E> {
    pub fn new(
        streak_repository: Arc<dyn StreakRepositoryTrait>,
        account_repository: Arc<dyn AccountRepositoryTrait>,
        journal_repository: Arc<dyn JournalRepositoryTrait>,
        progress_repository: Arc<dyn ProgressRepositoryTrait>,
        task_repository: Arc<dyn TaskRepositoryTrait>,
        event_sink: Arc<dyn DomainEventSink>,
        transaction_executor: E,
    ) -> Self {
        Self {
            streak_repository,
            account_repository,
            journal_repository,
            progress_repository,
            task_repository,
            event_sink,
            transaction_executor,
        }
    }

    /// True when `date` has a COMPLETED/PARTIAL task completion or any
    /// progress entry.
    fn has_real_activity(&self, account_id: &str, date: NaiveDate) -> Result<bool> {
        if self
            .task_repository
            .has_activity_completion_on(account_id, date)?
        {
            return Ok(true);
        }
        self.progress_repository.has_entry_on(account_id, date)
    }

    /// Walks backward from `today` counting streak-continuing days.
    ///
    /// A day continues on real activity or a shield-protected journal entry.
    /// Today additionally continues if merely journaled, tolerating same-day
    /// look-back before end-of-day processing has run and flagged the entry.
    fn replay_maintained_streak(&self, account_id: &str, today: NaiveDate) -> Result<i32> {
        let from = today - Duration::days(STREAK_LOOKBACK_DAYS);

        let mut continuing_days: HashSet<NaiveDate> = HashSet::new();
        continuing_days.extend(
            self.task_repository
                .completion_dates_since(account_id, from)?,
        );
        continuing_days.extend(self.progress_repository.entry_dates_since(account_id, from)?);
        continuing_days.extend(self.journal_repository.protected_dates_since(account_id, from)?);
        if self.journal_repository.exists_on(account_id, today)? {
            continuing_days.insert(today);
        }

        let mut count: i32 = 0;
        let mut day = today;
        while i64::from(count) < STREAK_LOOKBACK_DAYS && continuing_days.contains(&day) {
            count += 1;
            match day.pred_opt() {
                Some(previous) => day = previous,
                None => break,
            }
        }
        Ok(count)
    }

    /// Rebuilds the account-level record from a replay; optionally advances
    /// the last-activity anchor in the same transaction.
    fn recalculate_and_store(
        &self,
        account_id: &str,
        today: NaiveDate,
        anchor_activity: bool,
    ) -> Result<StreakInfo> {
        let count = self.replay_maintained_streak(account_id, today)?;
        let key = StreakKey::account(account_id);
        let now = Utc::now().naive_utc();

        debug!(
            "Recalculated maintained streak for account {}: {} day(s)",
            account_id, count
        );

        self.transaction_executor.execute(|conn| {
            let mut record = self
                .streak_repository
                .find_streak_in_tx(conn, &key)?
                .unwrap_or_else(|| StreakInfo::zero(&key, now));
            record.current_maintained_streak = count;
            record.best_maintained_streak = record.best_maintained_streak.max(count);
            record.last_updated_at = now;
            self.streak_repository.upsert_streak_in_tx(conn, &record)?;
            if anchor_activity {
                self.account_repository
                    .set_last_activity_on_in_tx(conn, account_id, today)?;
            }
            Ok::<_, crate::Error>(record)
        })
    }
}

#[async_trait]
impl<E: DbTransactionExecutor + Send + Sync + Clone> StreakServiceTrait for StreakService<E> {
    fn get_streak(
        &self,
        account_id: &str,
        level: StreakLevel,
        goal_id: Option<&str>,
        task_id: Option<&str>,
    ) -> Result<StreakInfo> {
        let key = StreakKey::for_level(level, account_id, goal_id, task_id)?;
        match self.streak_repository.find_streak(&key)? {
            Some(info) => Ok(info),
            None => Ok(StreakInfo::zero(&key, Utc::now().naive_utc())),
        }
    }

    async fn process_end_of_day(
        &self,
        account_id: &str,
        date: NaiveDate,
    ) -> Result<EndOfDayOutcome> {
        let has_real_activity = self.has_real_activity(account_id, date)?;
        let key = StreakKey::account(account_id);
        let now = Utc::now().naive_utc();

        let (outcome, shield_balance) = self.transaction_executor.execute(|conn| {
            let mut record = self
                .streak_repository
                .find_streak_in_tx(conn, &key)?
                .unwrap_or_else(|| StreakInfo::zero(&key, now));

            if has_real_activity {
                record.current_maintained_streak += 1;
                record.best_maintained_streak = record
                    .best_maintained_streak
                    .max(record.current_maintained_streak);
                record.last_updated_at = now;
                self.streak_repository.upsert_streak_in_tx(conn, &record)?;
                return Ok::<_, crate::Error>((EndOfDayOutcome::Advanced, None));
            }

            // No real activity: a journaled day plus an available shield
            // preserves the streak.
            if let Some(entry) = self
                .journal_repository
                .first_entry_on_in_tx(conn, account_id, date)?
            {
                let account = self.account_repository.get_account_in_tx(conn, account_id)?;
                let (week_start, week_end) = week_bounds(date);
                let used_this_week = self.journal_repository.protected_count_in_week_in_tx(
                    conn, account_id, week_start, week_end,
                )?;
                if account.shield_count > 0 && used_this_week < SHIELD_WEEKLY_QUOTA {
                    let balance = account.shield_count - 1;
                    self.account_repository
                        .set_shield_count_in_tx(conn, account_id, balance)?;
                    self.journal_repository
                        .mark_shield_protected_in_tx(conn, &entry.id)?;
                    return Ok((EndOfDayOutcome::ShieldConsumed, Some(balance)));
                }
            }

            if record.current_maintained_streak > 0 {
                record.current_maintained_streak = 0;
                record.last_updated_at = now;
                self.streak_repository.upsert_streak_in_tx(conn, &record)?;
                return Ok((EndOfDayOutcome::StreakReset, None));
            }

            Ok((EndOfDayOutcome::Unchanged, None))
        })?;

        match outcome {
            EndOfDayOutcome::ShieldConsumed => {
                info!(
                    "Consumed a shield for account {} on {} (balance: {})",
                    account_id,
                    date,
                    shield_balance.unwrap_or_default()
                );
                self.event_sink.emit(DomainEvent::shield_consumed(
                    account_id,
                    date,
                    shield_balance.unwrap_or_default(),
                ));
            }
            EndOfDayOutcome::StreakReset => {
                info!("Streak reset for account {} on {}", account_id, date);
                self.event_sink.emit(DomainEvent::streak_reset(account_id));
            }
            EndOfDayOutcome::Advanced | EndOfDayOutcome::Unchanged => {}
        }

        Ok(outcome)
    }

    async fn recalculate_streak(&self, account_id: &str, today: NaiveDate) -> Result<StreakInfo> {
        self.recalculate_and_store(account_id, today, false)
    }

    async fn on_activity_recorded(&self, account_id: &str, today: NaiveDate) -> Result<()> {
        let account = self.account_repository.get_account(account_id)?;
        let now = Utc::now().naive_utc();

        match account.last_activity_on {
            // Duplicate same-day events are a no-op.
            Some(last) if last == today => Ok(()),
            // Yesterday: cheap increment, no replay.
            Some(last) if last.succ_opt() == Some(today) => {
                let key = StreakKey::account(account_id);
                self.transaction_executor.execute(|conn| {
                    let mut record = self
                        .streak_repository
                        .find_streak_in_tx(conn, &key)?
                        .unwrap_or_else(|| StreakInfo::zero(&key, now));
                    record.current_maintained_streak += 1;
                    record.best_maintained_streak = record
                        .best_maintained_streak
                        .max(record.current_maintained_streak);
                    record.last_updated_at = now;
                    self.streak_repository.upsert_streak_in_tx(conn, &record)?;
                    self.account_repository
                        .set_last_activity_on_in_tx(conn, account_id, today)?;
                    Ok::<_, crate::Error>(())
                })
            }
            // First activity ever, or a stale anchor: replay history.
            stale => {
                if let Some(last) = stale {
                    warn!(
                        "Stale activity anchor for account {} ({}), replaying streak history",
                        account_id, last
                    );
                }
                self.recalculate_and_store(account_id, today, true)?;
                Ok(())
            }
        }
    }

    async fn award_journal_shield(&self, account_id: &str, date: NaiveDate) -> Result<bool> {
        let awarded = self.transaction_executor.execute(|conn| {
            super::streaks_engine::try_award_journal_shield_in_tx(
                self.account_repository.as_ref(),
                self.journal_repository.as_ref(),
                conn,
                account_id,
                date,
            )
        })?;

        if let Some(balance) = awarded {
            info!(
                "Awarded a journal shield to account {} (balance: {})",
                account_id, balance
            );
            self.event_sink.emit(DomainEvent::shield_awarded(
                account_id,
                ShieldSource::Journal,
                balance,
            ));
        }
        Ok(awarded.is_some())
    }
}
