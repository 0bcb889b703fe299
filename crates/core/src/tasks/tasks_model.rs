//! Task domain models.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::errors::{Result, ValidationError};
use crate::streaks::CompletionStatus;

/// A recurring task, optionally attached to a goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub account_id: String,
    pub goal_id: Option<String>,
    pub title: String,
    pub created_at: NaiveDateTime,
}

/// Input model for creating a task.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub account_id: String,
    pub goal_id: Option<String>,
    pub title: String,
}

impl NewTask {
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::MissingField("title".to_string()).into());
        }
        Ok(())
    }
}

/// One recorded task outcome for one day.
///
/// `goal_id` is denormalized from the task at record time so streak replay
/// and end-of-day queries never need a join through possibly-deleted tasks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskCompletion {
    pub id: String,
    pub task_id: String,
    pub account_id: String,
    pub goal_id: Option<String>,
    pub status: CompletionStatus,
    pub completed_on: NaiveDate,
    pub created_at: NaiveDateTime,
}

/// Input model for recording a task completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTaskCompletion {
    pub task_id: String,
    pub account_id: String,
    pub goal_id: Option<String>,
    pub status: CompletionStatus,
    pub completed_on: NaiveDate,
}
