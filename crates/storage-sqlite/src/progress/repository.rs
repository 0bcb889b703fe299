use chrono::{Duration, NaiveDate, NaiveDateTime, Utc};
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;
use uuid::Uuid;

use waypoint_core::db::DbPool;
use waypoint_core::errors::{Error, Result};
use waypoint_core::progress::{
    NewProgressEntry, ProgressEntry, ProgressEntryUpdate, ProgressRepositoryTrait,
};

use super::model::ProgressEntryDB;
use crate::db::get_connection;
use crate::errors::StorageError;
use crate::schema::{goals, progress_entries};

pub struct ProgressRepository {
    pool: Arc<DbPool>,
}

fn day_bounds(date: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    let start = date.and_hms_opt(0, 0, 0).expect("midnight exists");
    (start, start + Duration::days(1))
}

impl ProgressRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        ProgressRepository { pool }
    }

    fn fetch_scoped(
        conn: &mut SqliteConnection,
        account_id: &str,
        entry_id: &str,
    ) -> Result<ProgressEntry> {
        let row = progress_entries::table
            .inner_join(goals::table)
            .filter(progress_entries::id.eq(entry_id))
            .filter(goals::account_id.eq(account_id))
            .select(ProgressEntryDB::as_select())
            .first::<ProgressEntryDB>(conn)
            .optional()
            .map_err(StorageError::from)?;
        row.map(ProgressEntry::from)
            .ok_or_else(|| Error::NotFound(format!("Progress entry {entry_id}")))
    }
}

impl ProgressRepositoryTrait for ProgressRepository {
    fn get_entry(&self, account_id: &str, entry_id: &str) -> Result<ProgressEntry> {
        let mut conn = get_connection(&self.pool)?;
        Self::fetch_scoped(&mut conn, account_id, entry_id)
    }

    fn list_entries(&self, goal_id: &str) -> Result<Vec<ProgressEntry>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = progress_entries::table
            .filter(progress_entries::goal_id.eq(goal_id))
            .order(progress_entries::created_at.asc())
            .load::<ProgressEntryDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(ProgressEntry::from).collect())
    }

    fn has_entry_on(&self, account_id: &str, date: NaiveDate) -> Result<bool> {
        let mut conn = get_connection(&self.pool)?;
        let (day_start, day_end) = day_bounds(date);
        let count = progress_entries::table
            .inner_join(goals::table)
            .filter(goals::account_id.eq(account_id))
            .filter(progress_entries::created_at.ge(day_start))
            .filter(progress_entries::created_at.lt(day_end))
            .count()
            .get_result::<i64>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(count > 0)
    }

    fn entry_dates_since(&self, account_id: &str, from: NaiveDate) -> Result<Vec<NaiveDate>> {
        let mut conn = get_connection(&self.pool)?;
        let since = from.and_hms_opt(0, 0, 0).expect("midnight exists");
        let timestamps = progress_entries::table
            .inner_join(goals::table)
            .filter(goals::account_id.eq(account_id))
            .filter(progress_entries::created_at.ge(since))
            .select(progress_entries::created_at)
            .load::<NaiveDateTime>(&mut conn)
            .map_err(StorageError::from)?;
        let mut dates: Vec<NaiveDate> = timestamps.into_iter().map(|ts| ts.date()).collect();
        dates.sort_unstable();
        dates.dedup();
        Ok(dates)
    }

    fn get_entry_in_tx(
        &self,
        conn: &mut SqliteConnection,
        account_id: &str,
        entry_id: &str,
    ) -> Result<ProgressEntry> {
        Self::fetch_scoped(conn, account_id, entry_id)
    }

    fn entries_for_goal_in_tx(
        &self,
        conn: &mut SqliteConnection,
        goal_id: &str,
    ) -> Result<Vec<ProgressEntry>> {
        let rows = progress_entries::table
            .filter(progress_entries::goal_id.eq(goal_id))
            .order(progress_entries::created_at.asc())
            .load::<ProgressEntryDB>(conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(ProgressEntry::from).collect())
    }

    fn insert_entry_in_tx(
        &self,
        conn: &mut SqliteConnection,
        new_entry: NewProgressEntry,
    ) -> Result<ProgressEntry> {
        let now = Utc::now().naive_utc();
        let row = ProgressEntryDB {
            id: new_entry.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            goal_id: new_entry.goal_id,
            value: new_entry.value.to_string(),
            note: new_entry.note,
            created_at: now,
            updated_at: now,
        };
        diesel::insert_into(progress_entries::table)
            .values(&row)
            .execute(conn)
            .map_err(StorageError::from)?;
        Ok(ProgressEntry::from(row))
    }

    fn update_entry_in_tx(
        &self,
        conn: &mut SqliteConnection,
        update: ProgressEntryUpdate,
    ) -> Result<ProgressEntry> {
        let existing = progress_entries::table
            .find(&update.id)
            .first::<ProgressEntryDB>(conn)
            .optional()
            .map_err(StorageError::from)?
            .ok_or_else(|| Error::NotFound(format!("Progress entry {}", update.id)))?;

        let value = update
            .value
            .map(|v| v.to_string())
            .unwrap_or(existing.value);
        let note = update.note.or(existing.note);

        diesel::update(progress_entries::table.find(&update.id))
            .set((
                progress_entries::value.eq(value),
                progress_entries::note.eq(note),
                progress_entries::updated_at.eq(Utc::now().naive_utc()),
            ))
            .execute(conn)
            .map_err(StorageError::from)?;

        let row = progress_entries::table
            .find(&update.id)
            .first::<ProgressEntryDB>(conn)
            .map_err(StorageError::from)?;
        Ok(ProgressEntry::from(row))
    }

    fn delete_entry_in_tx(&self, conn: &mut SqliteConnection, entry_id: &str) -> Result<usize> {
        Ok(
            diesel::delete(progress_entries::table.find(entry_id))
                .execute(conn)
                .map_err(StorageError::from)?,
        )
    }
}
