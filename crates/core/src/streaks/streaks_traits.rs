use chrono::NaiveDate;
use diesel::sqlite::SqliteConnection;

use super::streaks_model::{EndOfDayOutcome, StreakInfo, StreakKey, StreakLevel};
use crate::errors::Result;
use async_trait::async_trait;

/// Trait defining the contract for streak repository operations.
pub trait StreakRepositoryTrait: Send + Sync {
    fn find_streak(&self, key: &StreakKey) -> Result<Option<StreakInfo>>;
    fn find_streak_in_tx(
        &self,
        conn: &mut SqliteConnection,
        key: &StreakKey,
    ) -> Result<Option<StreakInfo>>;
    /// Inserts or updates the record identified by the info's key.
    fn upsert_streak_in_tx(&self, conn: &mut SqliteConnection, info: &StreakInfo) -> Result<()>;
}

/// Trait defining the contract for streak engine operations.
#[async_trait]
pub trait StreakServiceTrait: Send + Sync {
    /// Returns the matching record or a zero-valued default, never an
    /// absence.
    fn get_streak(
        &self,
        account_id: &str,
        level: StreakLevel,
        goal_id: Option<&str>,
        task_id: Option<&str>,
    ) -> Result<StreakInfo>;

    /// Settles one day for an account: advance on real activity, spend a
    /// shield on a journaled day, or reset.
    async fn process_end_of_day(&self, account_id: &str, date: NaiveDate)
        -> Result<EndOfDayOutcome>;

    /// Replays up to a year of history to rebuild the account-level
    /// maintained streak.
    async fn recalculate_streak(&self, account_id: &str, today: NaiveDate) -> Result<StreakInfo>;

    /// Incremental update when activity is recorded. Idempotent for repeated
    /// same-day events; falls back to a full replay when the last recorded
    /// activity is stale.
    async fn on_activity_recorded(&self, account_id: &str, today: NaiveDate) -> Result<()>;

    /// Awards a shield for journaling, subject to the weekly quota and the
    /// inventory cap. Returns whether a shield was awarded.
    async fn award_journal_shield(&self, account_id: &str, date: NaiveDate) -> Result<bool>;
}
