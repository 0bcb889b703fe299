use chrono::Utc;
use log::debug;
use rust_decimal::Decimal;
use std::sync::Arc;

use super::progress_model::{
    percentage_of_target, sum_entries, NewProgressEntry, ProgressEntry, ProgressEntryUpdate,
};
use super::progress_traits::{ProgressRepositoryTrait, ProgressServiceTrait};
use crate::accounts::AccountRepositoryTrait;
use crate::db::DbTransactionExecutor;
use crate::errors::{Error, Result};
use crate::events::{DomainEvent, DomainEventSink, ShieldSource};
use crate::goals::{Goal, GoalRepositoryTrait, GoalStatus};
use crate::milestones::{
    evaluate_on_edit, evaluate_on_increase, MilestoneRepositoryTrait,
};
use crate::streaks::{award_shields_in_tx, StreakServiceTrait};
use async_trait::async_trait;
use diesel::sqlite::SqliteConnection;

/// How a ledger mutation re-evaluates milestones.
#[derive(Clone, Copy, PartialEq)]
enum EvalMode {
    /// Entries were added: only unachieved milestones can flip, and 50/100
    /// crossings award shields.
    Increase,
    /// Entries were edited or deleted: flags move both ways, no shields.
    Edit,
}

/// Everything a ledger mutation changed beyond the entry itself, for event
/// emission after commit.
struct MutationOutcome {
    goal_id: String,
    completed_now: bool,
    newly_achieved: Vec<i32>,
    shield_balance: Option<(i32, i32)>,
}

/// The progress ledger service.
///
/// Every mutating call recomputes the owning goal's cumulative progress as a
/// pure fold over its entries, applies the one-way ACTIVE to COMPLETED
/// transition, and re-evaluates milestones - all inside one transaction with
/// the mutation.
pub struct ProgressService<E: DbTransactionExecutor + Send + Sync + Clone> {
    progress_repository: Arc<dyn ProgressRepositoryTrait>,
    goal_repository: Arc<dyn GoalRepositoryTrait>,
    milestone_repository: Arc<dyn MilestoneRepositoryTrait>,
    account_repository: Arc<dyn AccountRepositoryTrait>,
    streak_service: Arc<dyn StreakServiceTrait>,
    event_sink: Arc<dyn DomainEventSink>,
    transaction_executor: E,
}

impl<E: DbTransactionExecutor + Send + Sync + Clone> ProgressService<E> {
    pub fn new(
        progress_repository: Arc<dyn ProgressRepositoryTrait>,
        goal_repository: Arc<dyn GoalRepositoryTrait>,
        milestone_repository: Arc<dyn MilestoneRepositoryTrait>,
        account_repository: Arc<dyn AccountRepositoryTrait>,
        streak_service: Arc<dyn StreakServiceTrait>,
        event_sink: Arc<dyn DomainEventSink>,
        transaction_executor: E,
    ) -> Self {
        Self {
            progress_repository,
            goal_repository,
            milestone_repository,
            account_repository,
            streak_service,
            event_sink,
            transaction_executor,
        }
    }

    /// Recomputes the goal's derived state after a ledger mutation.
    fn recompute_in_tx(
        &self,
        conn: &mut SqliteConnection,
        account_id: &str,
        goal: &Goal,
        mode: EvalMode,
    ) -> Result<MutationOutcome> {
        let entries = self
            .progress_repository
            .entries_for_goal_in_tx(conn, &goal.id)?;
        let current = sum_entries(&entries);
        let target = goal.parsed_target();

        // One-way transition: completing is automatic, reverting never is.
        let completed_now =
            goal.status == GoalStatus::Active && target > Decimal::ZERO && current >= target;
        let status = if completed_now {
            GoalStatus::Completed
        } else {
            goal.status
        };
        self.goal_repository
            .save_progress_state_in_tx(conn, &goal.id, current, status)?;

        let percentage = percentage_of_target(current, &goal.target_value);
        let milestones = self
            .milestone_repository
            .milestones_for_goal_in_tx(conn, &goal.id)?;
        let now = Utc::now().naive_utc();
        let evaluation = match mode {
            EvalMode::Increase => evaluate_on_increase(&milestones, percentage, now),
            EvalMode::Edit => evaluate_on_edit(&milestones, percentage, now),
        };
        for milestone in &evaluation.changed {
            self.milestone_repository
                .save_milestone_in_tx(conn, milestone)?;
        }

        let shield_balance = award_shields_in_tx(
            self.account_repository.as_ref(),
            conn,
            account_id,
            evaluation.shields_earned,
        )?;

        debug!(
            "Recomputed goal {}: progress={}, percentage={}, status={}",
            goal.id,
            current,
            percentage,
            status.as_str()
        );

        Ok(MutationOutcome {
            goal_id: goal.id.clone(),
            completed_now,
            newly_achieved: evaluation.newly_achieved,
            shield_balance,
        })
    }

    fn emit_events(&self, account_id: &str, outcome: &MutationOutcome) {
        let mut events = Vec::new();
        if outcome.completed_now {
            events.push(DomainEvent::goal_completed(
                account_id,
                outcome.goal_id.clone(),
            ));
        }
        for percentage in &outcome.newly_achieved {
            events.push(DomainEvent::milestone_achieved(
                account_id,
                outcome.goal_id.clone(),
                *percentage,
            ));
        }
        if let Some((_, balance)) = outcome.shield_balance {
            events.push(DomainEvent::shield_awarded(
                account_id,
                ShieldSource::Milestone,
                balance,
            ));
        }
        self.event_sink.emit_batch(events);
    }
}

#[async_trait]
impl<E: DbTransactionExecutor + Send + Sync + Clone> ProgressServiceTrait for ProgressService<E> {
    fn list_entries(&self, account_id: &str, goal_id: &str) -> Result<Vec<ProgressEntry>> {
        let goal = self.goal_repository.get_goal(account_id, goal_id)?;
        self.progress_repository.list_entries(&goal.id)
    }

    async fn add_entry(
        &self,
        account_id: &str,
        new_entry: NewProgressEntry,
    ) -> Result<ProgressEntry> {
        let goal_id = new_entry.goal_id.clone();
        let (entry, outcome) = self.transaction_executor.execute(|conn| {
            let goal = self.goal_repository.get_goal_in_tx(conn, account_id, &goal_id)?;
            let entry = self.progress_repository.insert_entry_in_tx(conn, new_entry)?;
            let outcome = self.recompute_in_tx(conn, account_id, &goal, EvalMode::Increase)?;
            Ok::<_, Error>((entry, outcome))
        })?;

        self.emit_events(account_id, &outcome);
        self.streak_service
            .on_activity_recorded(account_id, entry.logged_on())
            .await?;

        Ok(entry)
    }

    async fn update_entry(
        &self,
        account_id: &str,
        update: ProgressEntryUpdate,
    ) -> Result<ProgressEntry> {
        let entry_id = update.id.clone();
        let (entry, outcome) = self.transaction_executor.execute(|conn| {
            let existing = self
                .progress_repository
                .get_entry_in_tx(conn, account_id, &entry_id)?;
            let goal = self
                .goal_repository
                .get_goal_in_tx(conn, account_id, &existing.goal_id)?;
            let entry = self.progress_repository.update_entry_in_tx(conn, update)?;
            let outcome = self.recompute_in_tx(conn, account_id, &goal, EvalMode::Edit)?;
            Ok::<_, Error>((entry, outcome))
        })?;

        self.emit_events(account_id, &outcome);
        Ok(entry)
    }

    async fn delete_entry(&self, account_id: &str, entry_id: &str) -> Result<()> {
        let outcome = self.transaction_executor.execute(|conn| {
            let existing = self
                .progress_repository
                .get_entry_in_tx(conn, account_id, entry_id)?;
            let goal = self
                .goal_repository
                .get_goal_in_tx(conn, account_id, &existing.goal_id)?;
            self.progress_repository
                .delete_entry_in_tx(conn, &existing.id)?;
            let outcome = self.recompute_in_tx(conn, account_id, &goal, EvalMode::Edit)?;
            Ok::<_, Error>(outcome)
        })?;

        self.emit_events(account_id, &outcome);
        Ok(())
    }
}
