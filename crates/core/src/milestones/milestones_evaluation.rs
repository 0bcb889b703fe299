//! Pure milestone re-evaluation logic.
//!
//! These functions run inside the progress ledger's transaction: they take
//! the goal's milestones and current percentage and return what changed, so
//! the caller can persist flags, award shields, and emit events atomically
//! with the ledger mutation itself.

use chrono::NaiveDateTime;
use diesel::sqlite::SqliteConnection;
use rust_decimal::Decimal;

use super::milestones_model::{Milestone, NewMilestone};
use super::milestones_traits::MilestoneRepositoryTrait;
use crate::constants::{DEFAULT_MILESTONE_PERCENTAGES, SHIELD_AWARD_PERCENTAGES};
use crate::errors::Result;
use crate::goals::Goal;

/// The result of a milestone re-evaluation pass.
#[derive(Debug, Default)]
pub struct EvaluationOutcome {
    /// Milestones whose flags changed and need persisting.
    pub changed: Vec<Milestone>,
    /// Percentages that flipped to achieved in this pass.
    pub newly_achieved: Vec<i32>,
    /// Shields earned in this pass (50%/100% crossings on the increase path).
    pub shields_earned: i32,
}

/// Re-evaluation after entries were added.
///
/// Walks currently unachieved milestones ascending by threshold and marks
/// each one the percentage now meets. The 50% and 100% thresholds each earn
/// one shield. Already-achieved milestones are left untouched.
pub fn evaluate_on_increase(
    milestones: &[Milestone],
    percentage: Decimal,
    now: NaiveDateTime,
) -> EvaluationOutcome {
    let mut outcome = EvaluationOutcome::default();

    let mut pending: Vec<&Milestone> = milestones.iter().filter(|m| !m.achieved).collect();
    pending.sort_by_key(|m| m.percentage);

    for milestone in pending {
        if percentage < Decimal::from(milestone.percentage) {
            continue;
        }
        let mut achieved = milestone.clone();
        achieved.achieved = true;
        achieved.achieved_at = Some(now);
        outcome.newly_achieved.push(achieved.percentage);
        if SHIELD_AWARD_PERCENTAGES.contains(&achieved.percentage) {
            outcome.shields_earned += 1;
        }
        outcome.changed.push(achieved);
    }

    outcome
}

/// Re-evaluation after entries were updated or deleted.
///
/// Bidirectional: every milestone's flag becomes `percentage >= threshold`.
/// A demotion clears `achieved_at` (the original timestamp is lost), and no
/// shield is ever reclaimed; a promotion on this path earns no shield either.
pub fn evaluate_on_edit(
    milestones: &[Milestone],
    percentage: Decimal,
    now: NaiveDateTime,
) -> EvaluationOutcome {
    let mut outcome = EvaluationOutcome::default();

    for milestone in milestones {
        let should_be_achieved = percentage >= Decimal::from(milestone.percentage);
        if should_be_achieved == milestone.achieved {
            continue;
        }
        let mut updated = milestone.clone();
        updated.achieved = should_be_achieved;
        if should_be_achieved {
            updated.achieved_at = Some(now);
            outcome.newly_achieved.push(updated.percentage);
        } else {
            updated.achieved_at = None;
        }
        outcome.changed.push(updated);
    }

    outcome
}

/// Creates the default 25/50/75/100 milestones for a freshly created goal.
///
/// Runs inside the goal-creation transaction. Happens exactly once per goal;
/// milestones are never auto-added again. A goal that somehow starts at or
/// above a threshold gets that milestone created already achieved.
pub fn create_default_milestones_in_tx(
    repository: &dyn MilestoneRepositoryTrait,
    conn: &mut SqliteConnection,
    goal: &Goal,
    percentage: Decimal,
    now: NaiveDateTime,
) -> Result<Vec<Milestone>> {
    let mut created = Vec::with_capacity(DEFAULT_MILESTONE_PERCENTAGES.len());
    for threshold in DEFAULT_MILESTONE_PERCENTAGES {
        let achieved = percentage >= Decimal::from(threshold);
        let new_milestone = NewMilestone {
            id: None,
            goal_id: goal.id.clone(),
            percentage: threshold,
            description: None,
        };
        let milestone =
            repository.insert_milestone_in_tx(conn, new_milestone, achieved, achieved.then_some(now))?;
        created.push(milestone);
    }
    Ok(created)
}
