use chrono::{NaiveDate, Utc};
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;
use uuid::Uuid;

use waypoint_core::db::DbPool;
use waypoint_core::errors::{Error, Result};
use waypoint_core::tasks::{
    NewTask, NewTaskCompletion, Task, TaskCompletion, TaskRepositoryTrait,
};

use super::model::{TaskCompletionDB, TaskDB};
use crate::db::get_connection;
use crate::errors::StorageError;
use crate::schema::{task_completions, tasks};

pub struct TaskRepository {
    pool: Arc<DbPool>,
}

const ACTIVITY_STATUSES: [&str; 2] = ["COMPLETED", "PARTIAL"];

impl TaskRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        TaskRepository { pool }
    }
}

impl TaskRepositoryTrait for TaskRepository {
    fn get_task(&self, account_id: &str, task_id: &str) -> Result<Task> {
        let mut conn = get_connection(&self.pool)?;
        let row = tasks::table
            .filter(tasks::id.eq(task_id))
            .filter(tasks::account_id.eq(account_id))
            .first::<TaskDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        row.map(Task::from)
            .ok_or_else(|| Error::NotFound(format!("Task {task_id}")))
    }

    fn list_tasks(&self, account_id: &str) -> Result<Vec<Task>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = tasks::table
            .filter(tasks::account_id.eq(account_id))
            .order(tasks::created_at.asc())
            .load::<TaskDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(Task::from).collect())
    }

    fn has_activity_completion_on(&self, account_id: &str, date: NaiveDate) -> Result<bool> {
        let mut conn = get_connection(&self.pool)?;
        let count = task_completions::table
            .filter(task_completions::account_id.eq(account_id))
            .filter(task_completions::completed_on.eq(date))
            .filter(task_completions::status.eq_any(ACTIVITY_STATUSES))
            .count()
            .get_result::<i64>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(count > 0)
    }

    fn completion_dates_since(&self, account_id: &str, from: NaiveDate) -> Result<Vec<NaiveDate>> {
        let mut conn = get_connection(&self.pool)?;
        let mut dates = task_completions::table
            .filter(task_completions::account_id.eq(account_id))
            .filter(task_completions::completed_on.ge(from))
            .filter(task_completions::status.eq_any(ACTIVITY_STATUSES))
            .select(task_completions::completed_on)
            .load::<NaiveDate>(&mut conn)
            .map_err(StorageError::from)?;
        dates.sort_unstable();
        dates.dedup();
        Ok(dates)
    }

    fn insert_task_in_tx(&self, conn: &mut SqliteConnection, new_task: NewTask) -> Result<Task> {
        let row = TaskDB {
            id: new_task.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            account_id: new_task.account_id,
            goal_id: new_task.goal_id,
            title: new_task.title,
            created_at: Utc::now().naive_utc(),
        };
        diesel::insert_into(tasks::table)
            .values(&row)
            .execute(conn)
            .map_err(StorageError::from)?;
        Ok(Task::from(row))
    }

    fn delete_task_in_tx(
        &self,
        conn: &mut SqliteConnection,
        account_id: &str,
        task_id: &str,
    ) -> Result<usize> {
        Ok(diesel::delete(
            tasks::table
                .filter(tasks::id.eq(task_id))
                .filter(tasks::account_id.eq(account_id)),
        )
        .execute(conn)
        .map_err(StorageError::from)?)
    }

    fn insert_completion_in_tx(
        &self,
        conn: &mut SqliteConnection,
        new_completion: NewTaskCompletion,
    ) -> Result<TaskCompletion> {
        let row = TaskCompletionDB {
            id: Uuid::new_v4().to_string(),
            task_id: new_completion.task_id,
            account_id: new_completion.account_id,
            goal_id: new_completion.goal_id,
            status: new_completion.status.as_str().to_string(),
            completed_on: new_completion.completed_on,
            created_at: Utc::now().naive_utc(),
        };
        diesel::insert_into(task_completions::table)
            .values(&row)
            .execute(conn)
            .map_err(StorageError::from)?;
        Ok(TaskCompletion::from(row))
    }
}
