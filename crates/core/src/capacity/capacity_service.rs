use log::{info, warn};
use std::sync::Arc;

use super::capacity_traits::CapacityServiceTrait;
use crate::db::DbTransactionExecutor;
use crate::entitlements::{Entitlements, EntitlementsProviderTrait};
use crate::errors::{Error, Result};
use crate::events::{DomainEvent, DomainEventSink};
use crate::goals::{Goal, GoalRepositoryTrait, GoalStatus};
use async_trait::async_trait;

/// The capacity lock manager.
///
/// Consumes entitlements from the billing collaborator and reconciles the
/// account's ACTIVE/LOCKED goal sets against them. Each rebalance commits all
/// of its lock/unlock pairs in one transaction, so `previous_status` is
/// non-null exactly while a goal is LOCKED.
pub struct CapacityLockService<E: DbTransactionExecutor + Send + Sync + Clone> {
    goal_repository: Arc<dyn GoalRepositoryTrait>,
    entitlements_provider: Arc<dyn EntitlementsProviderTrait>,
    event_sink: Arc<dyn DomainEventSink>,
    transaction_executor: E,
}

/// The status a locked goal returns to. An unset (or nonsensically LOCKED)
/// memo restores to ACTIVE.
fn restored_status(goal: &Goal) -> GoalStatus {
    match goal.previous_status {
        Some(GoalStatus::Locked) | None => GoalStatus::Active,
        Some(status) => status,
    }
}

impl<E: DbTransactionExecutor + Send + Sync + Clone> CapacityLockService<E> {
    pub fn new(
        goal_repository: Arc<dyn GoalRepositoryTrait>,
        entitlements_provider: Arc<dyn EntitlementsProviderTrait>,
        event_sink: Arc<dyn DomainEventSink>,
        transaction_executor: E,
    ) -> Self {
        Self {
            goal_repository,
            entitlements_provider,
            event_sink,
            transaction_executor,
        }
    }

    /// A missing or failing billing record degrades to the free tier rather
    /// than failing the caller.
    fn entitlements_or_default(&self, account_id: &str) -> Entitlements {
        match self.entitlements_provider.get_entitlements(account_id) {
            Ok(entitlements) => entitlements,
            Err(err) => {
                warn!(
                    "No entitlements for account {} ({}), assuming free tier",
                    account_id, err
                );
                Entitlements::default()
            }
        }
    }

    /// Unlocks up to `limit` of the given goals (already ordered), restoring
    /// each one's preserved status. Returns the unlocked ids.
    fn unlock_goals(&self, goals: &[Goal], limit: usize) -> Result<Vec<String>> {
        let targets: Vec<(&Goal, GoalStatus)> = goals
            .iter()
            .take(limit)
            .map(|g| (g, restored_status(g)))
            .collect();

        self.transaction_executor.execute(|conn| {
            let mut unlocked = Vec::with_capacity(targets.len());
            for (goal, status) in &targets {
                self.goal_repository
                    .set_lock_state_in_tx(conn, &goal.id, *status, None)?;
                unlocked.push(goal.id.clone());
            }
            Ok::<_, Error>(unlocked)
        })
    }
}

#[async_trait]
impl<E: DbTransactionExecutor + Send + Sync + Clone> CapacityServiceTrait
    for CapacityLockService<E>
{
    async fn recalculate_locks_for_user(&self, account_id: &str) -> Result<()> {
        let entitlements = self.entitlements_or_default(account_id);
        if entitlements.is_premium {
            self.unlock_all_goals(account_id).await
        } else {
            self.balance_goal_locks(account_id, entitlements.max_active_goals)
                .await
        }
    }

    async fn balance_goal_locks(&self, account_id: &str, max_goals: i32) -> Result<()> {
        let max_goals = i64::from(max_goals.max(0));
        let active_count = self
            .goal_repository
            .count_by_status(account_id, GoalStatus::Active)?;

        if active_count < max_goals {
            // Room freed up: unlock the oldest locked goals first.
            let locked = self
                .goal_repository
                .goals_by_status(account_id, GoalStatus::Locked)?;
            if locked.is_empty() {
                return Ok(());
            }
            let slots = usize::try_from(max_goals - active_count).unwrap_or(usize::MAX);
            let unlocked = self.unlock_goals(&locked, slots)?;
            info!(
                "Unlocked {} goal(s) for account {} (active {} of {})",
                unlocked.len(),
                account_id,
                active_count,
                max_goals
            );
            self.event_sink.emit(DomainEvent::goals_rebalanced(
                account_id,
                Vec::new(),
                unlocked,
            ));
        } else if active_count > max_goals {
            // Over quota after a downgrade: lock the newest lockable goals,
            // preserving their current status for restoration.
            let excess = usize::try_from(active_count - max_goals).unwrap_or(usize::MAX);
            let lockable = self.goal_repository.get_lockable_goals(account_id)?;
            if lockable.len() < excess {
                warn!(
                    "Account {} exceeds its goal allowance by {} but only {} goal(s) are lockable",
                    account_id,
                    excess,
                    lockable.len()
                );
            }
            let targets: Vec<&Goal> = lockable.iter().take(excess).collect();
            if targets.is_empty() {
                return Ok(());
            }

            let locked_ids = self.transaction_executor.execute(|conn| {
                let mut locked = Vec::with_capacity(targets.len());
                for goal in &targets {
                    self.goal_repository.set_lock_state_in_tx(
                        conn,
                        &goal.id,
                        GoalStatus::Locked,
                        Some(goal.status),
                    )?;
                    locked.push(goal.id.clone());
                }
                Ok::<_, Error>(locked)
            })?;

            info!(
                "Locked {} goal(s) for account {} (active {} of {})",
                locked_ids.len(),
                account_id,
                active_count,
                max_goals
            );
            self.event_sink.emit(DomainEvent::goals_rebalanced(
                account_id,
                locked_ids,
                Vec::new(),
            ));
        }

        Ok(())
    }

    async fn unlock_all_goals(&self, account_id: &str) -> Result<()> {
        let locked = self
            .goal_repository
            .goals_by_status(account_id, GoalStatus::Locked)?;
        if locked.is_empty() {
            return Ok(());
        }
        let unlocked = self.unlock_goals(&locked, locked.len())?;
        info!(
            "Unlocked all {} goal(s) for premium account {}",
            unlocked.len(),
            account_id
        );
        self.event_sink.emit(DomainEvent::goals_rebalanced(
            account_id,
            Vec::new(),
            unlocked,
        ));
        Ok(())
    }

    fn can_create_goal(&self, account_id: &str) -> Result<bool> {
        let entitlements = self.entitlements_or_default(account_id);
        if entitlements.is_premium {
            return Ok(true);
        }
        let active_count = self
            .goal_repository
            .count_by_status(account_id, GoalStatus::Active)?;
        Ok(active_count < i64::from(entitlements.max_active_goals.max(0)))
    }

    fn get_remaining_slots(&self, account_id: &str) -> Result<i32> {
        let entitlements = self.entitlements_or_default(account_id);
        let active_count = self
            .goal_repository
            .count_by_status(account_id, GoalStatus::Active)?;
        let remaining = i64::from(entitlements.max_active_goals) - active_count;
        Ok(i32::try_from(remaining.max(0)).unwrap_or(i32::MAX))
    }
}
