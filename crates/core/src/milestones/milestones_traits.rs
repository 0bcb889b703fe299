use chrono::NaiveDateTime;
use diesel::sqlite::SqliteConnection;

use super::milestones_model::{Milestone, NewMilestone};
use crate::errors::Result;
use async_trait::async_trait;

/// Trait defining the contract for milestone repository operations.
///
/// Owner scoping happens one level up: services resolve the goal (scoped by
/// account) before touching its milestones.
pub trait MilestoneRepositoryTrait: Send + Sync {
    fn list_milestones(&self, goal_id: &str) -> Result<Vec<Milestone>>;
    fn milestones_for_goal_in_tx(
        &self,
        conn: &mut SqliteConnection,
        goal_id: &str,
    ) -> Result<Vec<Milestone>>;
    fn insert_milestone_in_tx(
        &self,
        conn: &mut SqliteConnection,
        new_milestone: NewMilestone,
        achieved: bool,
        achieved_at: Option<NaiveDateTime>,
    ) -> Result<Milestone>;
    /// Persists re-evaluated achievement flags.
    fn save_milestone_in_tx(&self, conn: &mut SqliteConnection, milestone: &Milestone)
        -> Result<()>;
    fn delete_milestone_in_tx(
        &self,
        conn: &mut SqliteConnection,
        goal_id: &str,
        milestone_id: &str,
    ) -> Result<usize>;
}

/// Trait defining the contract for milestone service operations.
#[async_trait]
pub trait MilestoneServiceTrait: Send + Sync {
    fn list_milestones(&self, account_id: &str, goal_id: &str) -> Result<Vec<Milestone>>;
    async fn create_milestone(
        &self,
        account_id: &str,
        new_milestone: NewMilestone,
    ) -> Result<Milestone>;
    async fn delete_milestone(
        &self,
        account_id: &str,
        goal_id: &str,
        milestone_id: &str,
    ) -> Result<()>;
}
