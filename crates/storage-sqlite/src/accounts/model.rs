//! Database models for accounts.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// Database model for accounts.
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
#[diesel(table_name = crate::schema::accounts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct AccountDB {
    pub id: String,
    pub name: String,
    pub shield_count: i32,
    pub last_activity_on: Option<NaiveDate>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<AccountDB> for waypoint_core::accounts::Account {
    fn from(db: AccountDB) -> Self {
        Self {
            id: db.id,
            name: db.name,
            shield_count: db.shield_count,
            last_activity_on: db.last_activity_on,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}
