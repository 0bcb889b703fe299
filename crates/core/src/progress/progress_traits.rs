use chrono::NaiveDate;
use diesel::sqlite::SqliteConnection;

use super::progress_model::{NewProgressEntry, ProgressEntry, ProgressEntryUpdate};
use crate::errors::Result;
use async_trait::async_trait;

/// Trait defining the contract for progress ledger repository operations.
///
/// Entry lookups scope through the owning goal's account, so a foreign
/// entry id behaves like a missing one.
pub trait ProgressRepositoryTrait: Send + Sync {
    fn get_entry(&self, account_id: &str, entry_id: &str) -> Result<ProgressEntry>;
    fn list_entries(&self, goal_id: &str) -> Result<Vec<ProgressEntry>>;
    /// True when the account logged any progress entry on `date`.
    fn has_entry_on(&self, account_id: &str, date: NaiveDate) -> Result<bool>;
    /// Distinct entry dates on or after `from`.
    fn entry_dates_since(&self, account_id: &str, from: NaiveDate) -> Result<Vec<NaiveDate>>;

    fn get_entry_in_tx(
        &self,
        conn: &mut SqliteConnection,
        account_id: &str,
        entry_id: &str,
    ) -> Result<ProgressEntry>;
    fn entries_for_goal_in_tx(
        &self,
        conn: &mut SqliteConnection,
        goal_id: &str,
    ) -> Result<Vec<ProgressEntry>>;
    fn insert_entry_in_tx(
        &self,
        conn: &mut SqliteConnection,
        new_entry: NewProgressEntry,
    ) -> Result<ProgressEntry>;
    fn update_entry_in_tx(
        &self,
        conn: &mut SqliteConnection,
        update: ProgressEntryUpdate,
    ) -> Result<ProgressEntry>;
    fn delete_entry_in_tx(&self, conn: &mut SqliteConnection, entry_id: &str) -> Result<usize>;
}

/// Trait defining the contract for progress ledger service operations.
#[async_trait]
pub trait ProgressServiceTrait: Send + Sync {
    fn list_entries(&self, account_id: &str, goal_id: &str) -> Result<Vec<ProgressEntry>>;
    async fn add_entry(&self, account_id: &str, new_entry: NewProgressEntry)
        -> Result<ProgressEntry>;
    async fn update_entry(
        &self,
        account_id: &str,
        update: ProgressEntryUpdate,
    ) -> Result<ProgressEntry>;
    async fn delete_entry(&self, account_id: &str, entry_id: &str) -> Result<()>;
}
