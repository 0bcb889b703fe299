//! Database models for streak records.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use waypoint_core::streaks::StreakInfo;

/// Database model for streak records.
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
#[diesel(table_name = crate::schema::streaks)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct StreakInfoDB {
    pub id: String,
    pub account_id: String,
    pub goal_id: Option<String>,
    pub task_id: Option<String>,
    pub current_maintained_streak: i32,
    pub best_maintained_streak: i32,
    pub current_perfect_streak: i32,
    pub best_perfect_streak: i32,
    pub last_updated_at: NaiveDateTime,
}

impl From<StreakInfoDB> for StreakInfo {
    fn from(db: StreakInfoDB) -> Self {
        Self {
            id: db.id,
            account_id: db.account_id,
            goal_id: db.goal_id,
            task_id: db.task_id,
            current_maintained_streak: db.current_maintained_streak,
            best_maintained_streak: db.best_maintained_streak,
            current_perfect_streak: db.current_perfect_streak,
            best_perfect_streak: db.best_perfect_streak,
            last_updated_at: db.last_updated_at,
        }
    }
}

impl From<&StreakInfo> for StreakInfoDB {
    fn from(info: &StreakInfo) -> Self {
        Self {
            id: info.id.clone(),
            account_id: info.account_id.clone(),
            goal_id: info.goal_id.clone(),
            task_id: info.task_id.clone(),
            current_maintained_streak: info.current_maintained_streak,
            best_maintained_streak: info.best_maintained_streak,
            current_perfect_streak: info.current_perfect_streak,
            best_perfect_streak: info.best_perfect_streak,
            last_updated_at: info.last_updated_at,
        }
    }
}
