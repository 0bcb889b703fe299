use chrono::{NaiveDate, Utc};
use log::debug;
use std::sync::Arc;

use super::tasks_model::{NewTask, NewTaskCompletion, Task, TaskCompletion};
use super::tasks_traits::{TaskRepositoryTrait, TaskServiceTrait};
use crate::db::DbTransactionExecutor;
use crate::errors::{Error, Result};
use crate::goals::GoalRepositoryTrait;
use crate::streaks::{
    apply_completion_in_tx, CompletionStatus, StreakKey, StreakRepositoryTrait, StreakServiceTrait,
};
use async_trait::async_trait;

/// Service for managing tasks and recording their completions.
pub struct TaskService<E: DbTransactionExecutor + Send + Sync + Clone> {
    task_repository: Arc<dyn TaskRepositoryTrait>,
    goal_repository: Arc<dyn GoalRepositoryTrait>,
    streak_repository: Arc<dyn StreakRepositoryTrait>,
    streak_service: Arc<dyn StreakServiceTrait>,
    transaction_executor: E,
}

impl<E: DbTransactionExecutor + Send + Sync + Clone> TaskService<E> {
    pub fn new(
        task_repository: Arc<dyn TaskRepositoryTrait>,
        goal_repository: Arc<dyn GoalRepositoryTrait>,
        streak_repository: Arc<dyn StreakRepositoryTrait>,
        streak_service: Arc<dyn StreakServiceTrait>,
        transaction_executor: E,
    ) -> Self {
        Self {
            task_repository,
            goal_repository,
            streak_repository,
            streak_service,
            transaction_executor,
        }
    }
}

#[async_trait]
impl<E: DbTransactionExecutor + Send + Sync + Clone> TaskServiceTrait for TaskService<E> {
    fn get_task(&self, account_id: &str, task_id: &str) -> Result<Task> {
        self.task_repository.get_task(account_id, task_id)
    }

    fn list_tasks(&self, account_id: &str) -> Result<Vec<Task>> {
        self.task_repository.list_tasks(account_id)
    }

    async fn create_task(&self, new_task: NewTask) -> Result<Task> {
        new_task.validate()?;
        // A task may only point at a goal its owner can see.
        if let Some(goal_id) = &new_task.goal_id {
            self.goal_repository
                .get_goal(&new_task.account_id, goal_id)?;
        }
        self.transaction_executor
            .execute(|conn| self.task_repository.insert_task_in_tx(conn, new_task))
    }

    async fn delete_task(&self, account_id: &str, task_id: &str) -> Result<()> {
        let deleted = self.transaction_executor.execute(|conn| {
            self.task_repository
                .delete_task_in_tx(conn, account_id, task_id)
        })?;
        if deleted == 0 {
            return Err(Error::NotFound(format!("Task {task_id}")));
        }
        Ok(())
    }

    async fn record_completion(
        &self,
        account_id: &str,
        task_id: &str,
        status: CompletionStatus,
        completed_on: NaiveDate,
    ) -> Result<TaskCompletion> {
        let task = self.task_repository.get_task(account_id, task_id)?;
        let now = Utc::now().naive_utc();

        // One event, three records: task, owning goal (when present), and
        // account transition identically and independently.
        let mut keys = vec![StreakKey::task(
            account_id,
            task.goal_id.clone(),
            task.id.clone(),
        )];
        if let Some(goal_id) = &task.goal_id {
            keys.push(StreakKey::goal(account_id, goal_id.clone()));
        }
        keys.push(StreakKey::account(account_id));

        let completion = self.transaction_executor.execute(|conn| {
            let completion = self.task_repository.insert_completion_in_tx(
                conn,
                NewTaskCompletion {
                    task_id: task.id.clone(),
                    account_id: account_id.to_string(),
                    goal_id: task.goal_id.clone(),
                    status,
                    completed_on,
                },
            )?;
            apply_completion_in_tx(self.streak_repository.as_ref(), conn, &keys, status, now)?;
            Ok::<_, Error>(completion)
        })?;

        debug!(
            "Recorded {} completion for task {} on {}",
            status.as_str(),
            task.id,
            completed_on
        );

        if status.is_activity() {
            self.streak_service
                .on_activity_recorded(account_id, completed_on)
                .await?;
        }

        Ok(completion)
    }
}
