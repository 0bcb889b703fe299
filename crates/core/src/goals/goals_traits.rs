use diesel::sqlite::SqliteConnection;
use rust_decimal::Decimal;

use super::goals_model::{Goal, GoalStatus, GoalUpdate, NewGoal};
use crate::errors::Result;
use async_trait::async_trait;

/// Trait defining the contract for goal repository operations.
///
/// All lookups are owner-scoped: a goal belonging to another account is a
/// not-found, never a leak.
pub trait GoalRepositoryTrait: Send + Sync {
    fn get_goal(&self, account_id: &str, goal_id: &str) -> Result<Goal>;
    fn list_goals(&self, account_id: &str) -> Result<Vec<Goal>>;
    /// Goals in `status`, ordered oldest-created-first.
    fn goals_by_status(&self, account_id: &str, status: GoalStatus) -> Result<Vec<Goal>>;
    fn count_by_status(&self, account_id: &str, status: GoalStatus) -> Result<i64>;
    /// Goals eligible for locking on downgrade, ordered newest-created-first.
    ///
    /// Which ACTIVE goals qualify is billing policy; the default storage
    /// implementation returns all of them. See DESIGN.md.
    fn get_lockable_goals(&self, account_id: &str) -> Result<Vec<Goal>>;

    fn get_goal_in_tx(
        &self,
        conn: &mut SqliteConnection,
        account_id: &str,
        goal_id: &str,
    ) -> Result<Goal>;
    fn insert_goal_in_tx(&self, conn: &mut SqliteConnection, new_goal: NewGoal) -> Result<Goal>;
    fn update_goal_in_tx(
        &self,
        conn: &mut SqliteConnection,
        account_id: &str,
        update: GoalUpdate,
    ) -> Result<Goal>;
    /// Persists the recomputed ledger sum and any status transition.
    fn save_progress_state_in_tx(
        &self,
        conn: &mut SqliteConnection,
        goal_id: &str,
        current_progress: Decimal,
        status: GoalStatus,
    ) -> Result<()>;
    /// Flips `status` and the `previous_status` mirror field together.
    fn set_lock_state_in_tx(
        &self,
        conn: &mut SqliteConnection,
        goal_id: &str,
        status: GoalStatus,
        previous_status: Option<GoalStatus>,
    ) -> Result<()>;
    fn delete_goal_in_tx(
        &self,
        conn: &mut SqliteConnection,
        account_id: &str,
        goal_id: &str,
    ) -> Result<usize>;
}

/// Trait defining the contract for goal service operations.
#[async_trait]
pub trait GoalServiceTrait: Send + Sync {
    fn get_goal(&self, account_id: &str, goal_id: &str) -> Result<Goal>;
    fn list_goals(&self, account_id: &str) -> Result<Vec<Goal>>;
    async fn create_goal(&self, new_goal: NewGoal) -> Result<Goal>;
    async fn update_goal(&self, account_id: &str, update: GoalUpdate) -> Result<Goal>;
    async fn delete_goal(&self, account_id: &str, goal_id: &str) -> Result<()>;
}
