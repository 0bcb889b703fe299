use chrono::Utc;
use log::debug;
use std::sync::Arc;

use super::milestones_model::{Milestone, NewMilestone};
use super::milestones_traits::{MilestoneRepositoryTrait, MilestoneServiceTrait};
use crate::db::DbTransactionExecutor;
use crate::errors::{Error, Result, ValidationError};
use crate::goals::GoalRepositoryTrait;
use crate::progress::percentage_of_target;
use async_trait::async_trait;

/// Service for managing the milestone CRUD surface.
///
/// Re-evaluation on progress changes does not go through this service; the
/// progress ledger runs the pure evaluation functions inside its own
/// transaction.
pub struct MilestoneService<E: DbTransactionExecutor + Send + Sync + Clone> {
    goal_repository: Arc<dyn GoalRepositoryTrait>,
    milestone_repository: Arc<dyn MilestoneRepositoryTrait>,
    transaction_executor: E,
}

impl<E: DbTransactionExecutor + Send + Sync + Clone> MilestoneService<E> {
    pub fn new(
        goal_repository: Arc<dyn GoalRepositoryTrait>,
        milestone_repository: Arc<dyn MilestoneRepositoryTrait>,
        transaction_executor: E,
    ) -> Self {
        Self {
            goal_repository,
            milestone_repository,
            transaction_executor,
        }
    }
}

#[async_trait]
impl<E: DbTransactionExecutor + Send + Sync + Clone> MilestoneServiceTrait for MilestoneService<E> {
    fn list_milestones(&self, account_id: &str, goal_id: &str) -> Result<Vec<Milestone>> {
        let goal = self.goal_repository.get_goal(account_id, goal_id)?;
        self.milestone_repository.list_milestones(&goal.id)
    }

    async fn create_milestone(
        &self,
        account_id: &str,
        new_milestone: NewMilestone,
    ) -> Result<Milestone> {
        if new_milestone.percentage <= 0 {
            return Err(ValidationError::InvalidInput(
                "Milestone percentage must be positive".to_string(),
            )
            .into());
        }

        let goal = self
            .goal_repository
            .get_goal(account_id, &new_milestone.goal_id)?;

        let existing = self.milestone_repository.list_milestones(&goal.id)?;
        if existing
            .iter()
            .any(|m| m.percentage == new_milestone.percentage)
        {
            return Err(Error::Conflict(format!(
                "Milestone at {}% already exists for goal {}",
                new_milestone.percentage, goal.id
            )));
        }

        // A milestone created below the goal's current percentage starts out
        // achieved.
        let percentage = percentage_of_target(goal.current_progress, &goal.target_value);
        let achieved = percentage >= rust_decimal::Decimal::from(new_milestone.percentage);
        let now = Utc::now().naive_utc();

        debug!(
            "Creating milestone at {}% for goal {} (achieved at creation: {})",
            new_milestone.percentage, goal.id, achieved
        );

        let repository = self.milestone_repository.clone();
        self.transaction_executor.execute(move |conn| {
            repository.insert_milestone_in_tx(conn, new_milestone, achieved, achieved.then_some(now))
        })
    }

    async fn delete_milestone(
        &self,
        account_id: &str,
        goal_id: &str,
        milestone_id: &str,
    ) -> Result<()> {
        let goal = self.goal_repository.get_goal(account_id, goal_id)?;

        let repository = self.milestone_repository.clone();
        let goal_id_owned = goal.id.clone();
        let milestone_id_owned = milestone_id.to_string();
        let deleted = self.transaction_executor.execute(move |conn| {
            repository.delete_milestone_in_tx(conn, &goal_id_owned, &milestone_id_owned)
        })?;

        if deleted == 0 {
            return Err(Error::NotFound(format!("Milestone {milestone_id}")));
        }
        Ok(())
    }
}
