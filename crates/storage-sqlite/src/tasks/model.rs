//! Database models for tasks and task completions.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use log::warn;
use serde::{Deserialize, Serialize};

use waypoint_core::streaks::CompletionStatus;
use waypoint_core::tasks::{Task, TaskCompletion};

/// Database model for tasks.
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
#[diesel(table_name = crate::schema::tasks)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct TaskDB {
    pub id: String,
    pub account_id: String,
    pub goal_id: Option<String>,
    pub title: String,
    pub created_at: NaiveDateTime,
}

/// Database model for task completions.
#[derive(
    Queryable,
    Identifiable,
    Insertable,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::task_completions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct TaskCompletionDB {
    pub id: String,
    pub task_id: String,
    pub account_id: String,
    pub goal_id: Option<String>,
    pub status: String,
    pub completed_on: NaiveDate,
    pub created_at: NaiveDateTime,
}

impl From<TaskDB> for Task {
    fn from(db: TaskDB) -> Self {
        Self {
            id: db.id,
            account_id: db.account_id,
            goal_id: db.goal_id,
            title: db.title,
            created_at: db.created_at,
        }
    }
}

impl From<TaskCompletionDB> for TaskCompletion {
    fn from(db: TaskCompletionDB) -> Self {
        let status = CompletionStatus::parse(&db.status).unwrap_or_else(|| {
            warn!(
                "Unknown completion status '{}' on completion {}, treating as PENDING",
                db.status, db.id
            );
            CompletionStatus::Pending
        });
        Self {
            id: db.id,
            task_id: db.task_id,
            account_id: db.account_id,
            goal_id: db.goal_id,
            status,
            completed_on: db.completed_on,
            created_at: db.created_at,
        }
    }
}
