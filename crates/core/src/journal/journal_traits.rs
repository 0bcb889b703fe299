use chrono::NaiveDate;
use diesel::sqlite::SqliteConnection;

use super::journal_model::{JournalEntry, NewJournalEntry};
use crate::errors::Result;
use async_trait::async_trait;

/// Trait defining the contract for journal repository operations.
pub trait JournalRepositoryTrait: Send + Sync {
    fn get_entry(&self, account_id: &str, entry_id: &str) -> Result<JournalEntry>;
    fn list_entries(
        &self,
        account_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<JournalEntry>>;
    fn exists_on(&self, account_id: &str, date: NaiveDate) -> Result<bool>;
    /// Dates of shield-protected entries on or after `from`.
    fn protected_dates_since(&self, account_id: &str, from: NaiveDate) -> Result<Vec<NaiveDate>>;

    fn insert_entry_in_tx(
        &self,
        conn: &mut SqliteConnection,
        new_entry: NewJournalEntry,
    ) -> Result<JournalEntry>;
    fn delete_entry_in_tx(
        &self,
        conn: &mut SqliteConnection,
        account_id: &str,
        entry_id: &str,
    ) -> Result<usize>;
    /// The day's earliest entry, if any.
    fn first_entry_on_in_tx(
        &self,
        conn: &mut SqliteConnection,
        account_id: &str,
        date: NaiveDate,
    ) -> Result<Option<JournalEntry>>;
    fn mark_shield_protected_in_tx(
        &self,
        conn: &mut SqliteConnection,
        entry_id: &str,
    ) -> Result<()>;
    /// Shield-protected entries inside one Monday-Sunday window; this count
    /// is the weekly shield-usage quota tracker.
    fn protected_count_in_week_in_tx(
        &self,
        conn: &mut SqliteConnection,
        account_id: &str,
        week_start: NaiveDate,
        week_end: NaiveDate,
    ) -> Result<i64>;
}

/// Trait defining the contract for journal service operations.
#[async_trait]
pub trait JournalServiceTrait: Send + Sync {
    fn get_entry(&self, account_id: &str, entry_id: &str) -> Result<JournalEntry>;
    fn list_entries(
        &self,
        account_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<JournalEntry>>;
    async fn create_entry(&self, new_entry: NewJournalEntry) -> Result<JournalEntry>;
    async fn delete_entry(&self, account_id: &str, entry_id: &str) -> Result<()>;
}
