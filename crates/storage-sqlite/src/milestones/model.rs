//! Database models for milestones.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use waypoint_core::milestones::Milestone;

/// Database model for milestones.
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
#[diesel(table_name = crate::schema::milestones)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct MilestoneDB {
    pub id: String,
    pub goal_id: String,
    pub percentage: i32,
    pub description: String,
    pub achieved: bool,
    pub achieved_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

impl From<MilestoneDB> for Milestone {
    fn from(db: MilestoneDB) -> Self {
        Self {
            id: db.id,
            goal_id: db.goal_id,
            percentage: db.percentage,
            description: db.description,
            achieved: db.achieved,
            achieved_at: db.achieved_at,
            created_at: db.created_at,
        }
    }
}
