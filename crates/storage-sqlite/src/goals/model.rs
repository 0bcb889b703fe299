//! Database models for goals.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use log::warn;
use serde::{Deserialize, Serialize};

use waypoint_core::goals::{parse_decimal_string_tolerant, Goal, GoalStatus};

/// Database model for goals.
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
#[diesel(table_name = crate::schema::goals)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct GoalDB {
    pub id: String,
    pub account_id: String,
    pub title: String,
    pub description: Option<String>,
    pub target_value: String,
    pub unit: String,
    pub current_progress: String,
    pub status: String,
    pub previous_status: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub target_date: Option<NaiveDate>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Parses a stored status string, falling back to ACTIVE on rows written
/// before a status existed.
pub(crate) fn parse_status(value: &str, goal_id: &str) -> GoalStatus {
    GoalStatus::parse(value).unwrap_or_else(|| {
        warn!("Unknown status '{}' on goal {}, treating as ACTIVE", value, goal_id);
        GoalStatus::Active
    })
}

impl From<GoalDB> for Goal {
    fn from(db: GoalDB) -> Self {
        let status = parse_status(&db.status, &db.id);
        let previous_status = db.previous_status.as_deref().map(|s| parse_status(s, &db.id));
        Self {
            current_progress: parse_decimal_string_tolerant(
                &db.current_progress,
                "current_progress",
            ),
            id: db.id,
            account_id: db.account_id,
            title: db.title,
            description: db.description,
            target_value: db.target_value,
            unit: db.unit,
            status,
            previous_status,
            start_date: db.start_date,
            target_date: db.target_date,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}
