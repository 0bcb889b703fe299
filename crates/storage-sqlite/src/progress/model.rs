//! Database models for progress entries.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use waypoint_core::goals::parse_decimal_string_tolerant;
use waypoint_core::progress::ProgressEntry;

/// Database model for progress entries. Values are stored as text, matching
/// the free-form history of the numeric columns.
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
#[diesel(table_name = crate::schema::progress_entries)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct ProgressEntryDB {
    pub id: String,
    pub goal_id: String,
    pub value: String,
    pub note: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<ProgressEntryDB> for ProgressEntry {
    fn from(db: ProgressEntryDB) -> Self {
        Self {
            value: parse_decimal_string_tolerant(&db.value, "value"),
            id: db.id,
            goal_id: db.goal_id,
            note: db.note,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}
