//! Database models for journal entries.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use waypoint_core::journal::JournalEntry;

/// Database model for journal entries.
#[derive(
    Queryable,
    Identifiable,
    Insertable,
    AsChangeset,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::journal_entries)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct JournalEntryDB {
    pub id: String,
    pub account_id: String,
    pub entry_date: NaiveDate,
    pub content: String,
    pub shield_protected: bool,
    pub created_at: NaiveDateTime,
}

impl From<JournalEntryDB> for JournalEntry {
    fn from(db: JournalEntryDB) -> Self {
        Self {
            id: db.id,
            account_id: db.account_id,
            entry_date: db.entry_date,
            content: db.content,
            shield_protected: db.shield_protected,
            created_at: db.created_at,
        }
    }
}
