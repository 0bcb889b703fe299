use chrono::Utc;
use log::debug;
use std::sync::Arc;

use super::goals_model::{Goal, GoalStatus, GoalUpdate, NewGoal};
use super::goals_traits::{GoalRepositoryTrait, GoalServiceTrait};
use crate::capacity::CapacityServiceTrait;
use crate::db::DbTransactionExecutor;
use crate::errors::{Error, Result, ValidationError};
use crate::milestones::{create_default_milestones_in_tx, MilestoneRepositoryTrait};
use crate::progress::percentage_of_target;
use async_trait::async_trait;

/// Service for managing goals.
///
/// Creation is capacity-checked and seeds the default milestones in the same
/// transaction; deletion and reactivation hand the account to the capacity
/// lock manager for rebalancing.
pub struct GoalService<E: DbTransactionExecutor + Send + Sync + Clone> {
    goal_repository: Arc<dyn GoalRepositoryTrait>,
    milestone_repository: Arc<dyn MilestoneRepositoryTrait>,
    capacity_service: Arc<dyn CapacityServiceTrait>,
    transaction_executor: E,
}

impl<E: DbTransactionExecutor + Send + Sync + Clone> GoalService<E> {
    pub fn new(
        goal_repository: Arc<dyn GoalRepositoryTrait>,
        milestone_repository: Arc<dyn MilestoneRepositoryTrait>,
        capacity_service: Arc<dyn CapacityServiceTrait>,
        transaction_executor: E,
    ) -> Self {
        Self {
            goal_repository,
            milestone_repository,
            capacity_service,
            transaction_executor,
        }
    }
}

#[async_trait]
impl<E: DbTransactionExecutor + Send + Sync + Clone> GoalServiceTrait for GoalService<E> {
    fn get_goal(&self, account_id: &str, goal_id: &str) -> Result<Goal> {
        self.goal_repository.get_goal(account_id, goal_id)
    }

    fn list_goals(&self, account_id: &str) -> Result<Vec<Goal>> {
        self.goal_repository.list_goals(account_id)
    }

    async fn create_goal(&self, new_goal: NewGoal) -> Result<Goal> {
        new_goal.validate()?;
        if !self.capacity_service.can_create_goal(&new_goal.account_id)? {
            return Err(Error::CapacityExceeded(format!(
                "account {} is at its active goal limit",
                new_goal.account_id
            )));
        }

        let now = Utc::now().naive_utc();
        let goal = self.transaction_executor.execute(|conn| {
            let goal = self.goal_repository.insert_goal_in_tx(conn, new_goal)?;
            // Default milestones exist from the goal's first moment and are
            // never auto-added again.
            let percentage = percentage_of_target(goal.current_progress, &goal.target_value);
            create_default_milestones_in_tx(
                self.milestone_repository.as_ref(),
                conn,
                &goal,
                percentage,
                now,
            )?;
            Ok::<_, Error>(goal)
        })?;

        debug!("Created goal {} for account {}", goal.id, goal.account_id);
        Ok(goal)
    }

    async fn update_goal(&self, account_id: &str, update: GoalUpdate) -> Result<Goal> {
        if update.status == GoalStatus::Locked {
            return Err(ValidationError::InvalidInput(
                "Goals are locked by the capacity manager, not by edits".to_string(),
            )
            .into());
        }

        let existing = self.goal_repository.get_goal(account_id, &update.id)?;
        // LOCKED is entered and left only through the capacity manager;
        // editing around it would orphan the previous-status memo.
        if existing.status == GoalStatus::Locked {
            return Err(Error::Conflict(format!(
                "Goal {} is locked by the goal allowance and cannot be edited",
                existing.id
            )));
        }
        let reactivated =
            existing.status != GoalStatus::Active && update.status == GoalStatus::Active;
        let goal_id = update.id.clone();

        let goal = self.transaction_executor.execute(|conn| {
            self.goal_repository
                .update_goal_in_tx(conn, account_id, update)
        })?;

        if reactivated {
            // Reactivating may push the account over its allowance; the lock
            // manager decides what stays active.
            self.capacity_service
                .recalculate_locks_for_user(account_id)
                .await?;
            return self.goal_repository.get_goal(account_id, &goal_id);
        }
        Ok(goal)
    }

    async fn delete_goal(&self, account_id: &str, goal_id: &str) -> Result<()> {
        let deleted = self.transaction_executor.execute(|conn| {
            self.goal_repository
                .delete_goal_in_tx(conn, account_id, goal_id)
        })?;
        if deleted == 0 {
            return Err(Error::NotFound(format!("Goal {goal_id}")));
        }

        // A freed slot may let a locked goal come back.
        self.capacity_service
            .recalculate_locks_for_user(account_id)
            .await?;
        Ok(())
    }
}
