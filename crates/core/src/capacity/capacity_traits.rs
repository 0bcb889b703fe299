use crate::errors::Result;
use async_trait::async_trait;

/// Trait defining the contract for capacity lock operations.
#[async_trait]
pub trait CapacityServiceTrait: Send + Sync {
    /// Re-applies the account's entitlement: premium unlocks everything,
    /// otherwise the active set is balanced against the goal allowance.
    async fn recalculate_locks_for_user(&self, account_id: &str) -> Result<()>;

    /// Unlocks (FIFO, oldest first) when under the allowance, locks (newest
    /// lockable first) when over it.
    async fn balance_goal_locks(&self, account_id: &str, max_goals: i32) -> Result<()>;

    /// Unlocks every LOCKED goal, restoring each preserved prior status.
    async fn unlock_all_goals(&self, account_id: &str) -> Result<()>;

    /// Whether creating one more goal stays within the entitlement.
    fn can_create_goal(&self, account_id: &str) -> Result<bool>;

    /// Remaining active-goal slots, floored at zero.
    fn get_remaining_slots(&self, account_id: &str) -> Result<i32>;
}
