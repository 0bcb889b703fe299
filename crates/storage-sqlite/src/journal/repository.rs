use chrono::{NaiveDate, Utc};
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;
use uuid::Uuid;

use waypoint_core::db::DbPool;
use waypoint_core::errors::{Error, Result};
use waypoint_core::journal::{JournalEntry, JournalRepositoryTrait, NewJournalEntry};

use super::model::JournalEntryDB;
use crate::db::get_connection;
use crate::errors::StorageError;
use crate::schema::journal_entries;

pub struct JournalRepository {
    pool: Arc<DbPool>,
}

impl JournalRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        JournalRepository { pool }
    }
}

impl JournalRepositoryTrait for JournalRepository {
    fn get_entry(&self, account_id: &str, entry_id: &str) -> Result<JournalEntry> {
        let mut conn = get_connection(&self.pool)?;
        let row = journal_entries::table
            .filter(journal_entries::id.eq(entry_id))
            .filter(journal_entries::account_id.eq(account_id))
            .first::<JournalEntryDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        row.map(JournalEntry::from)
            .ok_or_else(|| Error::NotFound(format!("Journal entry {entry_id}")))
    }

    fn list_entries(
        &self,
        account_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<JournalEntry>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = journal_entries::table
            .filter(journal_entries::account_id.eq(account_id))
            .filter(journal_entries::entry_date.ge(from))
            .filter(journal_entries::entry_date.le(to))
            .order((journal_entries::entry_date.asc(), journal_entries::created_at.asc()))
            .load::<JournalEntryDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(JournalEntry::from).collect())
    }

    fn exists_on(&self, account_id: &str, date: NaiveDate) -> Result<bool> {
        let mut conn = get_connection(&self.pool)?;
        let count = journal_entries::table
            .filter(journal_entries::account_id.eq(account_id))
            .filter(journal_entries::entry_date.eq(date))
            .count()
            .get_result::<i64>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(count > 0)
    }

    fn protected_dates_since(&self, account_id: &str, from: NaiveDate) -> Result<Vec<NaiveDate>> {
        let mut conn = get_connection(&self.pool)?;
        let mut dates = journal_entries::table
            .filter(journal_entries::account_id.eq(account_id))
            .filter(journal_entries::shield_protected.eq(true))
            .filter(journal_entries::entry_date.ge(from))
            .select(journal_entries::entry_date)
            .load::<NaiveDate>(&mut conn)
            .map_err(StorageError::from)?;
        dates.sort_unstable();
        dates.dedup();
        Ok(dates)
    }

    fn insert_entry_in_tx(
        &self,
        conn: &mut SqliteConnection,
        new_entry: NewJournalEntry,
    ) -> Result<JournalEntry> {
        let row = JournalEntryDB {
            id: new_entry.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            account_id: new_entry.account_id,
            entry_date: new_entry.entry_date,
            content: new_entry.content,
            shield_protected: false,
            created_at: Utc::now().naive_utc(),
        };
        diesel::insert_into(journal_entries::table)
            .values(&row)
            .execute(conn)
            .map_err(StorageError::from)?;
        Ok(JournalEntry::from(row))
    }

    fn delete_entry_in_tx(
        &self,
        conn: &mut SqliteConnection,
        account_id: &str,
        entry_id: &str,
    ) -> Result<usize> {
        Ok(diesel::delete(
            journal_entries::table
                .filter(journal_entries::id.eq(entry_id))
                .filter(journal_entries::account_id.eq(account_id)),
        )
        .execute(conn)
        .map_err(StorageError::from)?)
    }

    fn first_entry_on_in_tx(
        &self,
        conn: &mut SqliteConnection,
        account_id: &str,
        date: NaiveDate,
    ) -> Result<Option<JournalEntry>> {
        let row = journal_entries::table
            .filter(journal_entries::account_id.eq(account_id))
            .filter(journal_entries::entry_date.eq(date))
            .order(journal_entries::created_at.asc())
            .first::<JournalEntryDB>(conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(row.map(JournalEntry::from))
    }

    fn mark_shield_protected_in_tx(
        &self,
        conn: &mut SqliteConnection,
        entry_id: &str,
    ) -> Result<()> {
        let updated = diesel::update(journal_entries::table.find(entry_id))
            .set(journal_entries::shield_protected.eq(true))
            .execute(conn)
            .map_err(StorageError::from)?;
        if updated == 0 {
            return Err(Error::NotFound(format!("Journal entry {entry_id}")));
        }
        Ok(())
    }

    fn protected_count_in_week_in_tx(
        &self,
        conn: &mut SqliteConnection,
        account_id: &str,
        week_start: NaiveDate,
        week_end: NaiveDate,
    ) -> Result<i64> {
        Ok(journal_entries::table
            .filter(journal_entries::account_id.eq(account_id))
            .filter(journal_entries::shield_protected.eq(true))
            .filter(journal_entries::entry_date.ge(week_start))
            .filter(journal_entries::entry_date.le(week_end))
            .count()
            .get_result::<i64>(conn)
            .map_err(StorageError::from)?)
    }
}
