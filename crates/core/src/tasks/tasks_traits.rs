use chrono::NaiveDate;
use diesel::sqlite::SqliteConnection;

use super::tasks_model::{NewTask, NewTaskCompletion, Task, TaskCompletion};
use crate::errors::Result;
use crate::streaks::CompletionStatus;
use async_trait::async_trait;

/// Trait defining the contract for task repository operations.
pub trait TaskRepositoryTrait: Send + Sync {
    fn get_task(&self, account_id: &str, task_id: &str) -> Result<Task>;
    fn list_tasks(&self, account_id: &str) -> Result<Vec<Task>>;
    /// True when `date` has a COMPLETED or PARTIAL completion.
    fn has_activity_completion_on(&self, account_id: &str, date: NaiveDate) -> Result<bool>;
    /// Distinct dates with COMPLETED/PARTIAL completions on or after `from`.
    fn completion_dates_since(&self, account_id: &str, from: NaiveDate) -> Result<Vec<NaiveDate>>;

    fn insert_task_in_tx(&self, conn: &mut SqliteConnection, new_task: NewTask) -> Result<Task>;
    fn delete_task_in_tx(
        &self,
        conn: &mut SqliteConnection,
        account_id: &str,
        task_id: &str,
    ) -> Result<usize>;
    fn insert_completion_in_tx(
        &self,
        conn: &mut SqliteConnection,
        new_completion: NewTaskCompletion,
    ) -> Result<TaskCompletion>;
}

/// Trait defining the contract for task service operations.
#[async_trait]
pub trait TaskServiceTrait: Send + Sync {
    fn get_task(&self, account_id: &str, task_id: &str) -> Result<Task>;
    fn list_tasks(&self, account_id: &str) -> Result<Vec<Task>>;
    async fn create_task(&self, new_task: NewTask) -> Result<Task>;
    async fn delete_task(&self, account_id: &str, task_id: &str) -> Result<()>;
    /// Records a task outcome for a day and fans the transition out to the
    /// task-, goal-, and account-level streaks.
    async fn record_completion(
        &self,
        account_id: &str,
        task_id: &str,
        status: CompletionStatus,
        completed_on: NaiveDate,
    ) -> Result<TaskCompletion>;
}
