//! Domain event types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Where a shield award came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShieldSource {
    Journal,
    Milestone,
}

/// Domain events emitted by core services after successful mutations.
///
/// These events represent facts about domain data changes. Runtime adapters
/// translate them into platform-specific actions (push notifications,
/// dashboard refresh, analytics).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    /// A goal crossed its target and transitioned to COMPLETED.
    GoalCompleted { account_id: String, goal_id: String },

    /// A milestone threshold was newly achieved.
    MilestoneAchieved {
        account_id: String,
        goal_id: String,
        percentage: i32,
    },

    /// A shield was added to the account inventory.
    ShieldAwarded {
        account_id: String,
        source: ShieldSource,
        balance: i32,
    },

    /// A shield was consumed to protect a day without real activity.
    ShieldConsumed {
        account_id: String,
        date: NaiveDate,
        balance: i32,
    },

    /// An account-level maintained streak fell back to zero.
    StreakReset { account_id: String },

    /// The capacity lock manager locked and/or unlocked goals.
    GoalsRebalanced {
        account_id: String,
        locked_goal_ids: Vec<String>,
        unlocked_goal_ids: Vec<String>,
    },
}

impl DomainEvent {
    pub fn goal_completed(account_id: impl Into<String>, goal_id: impl Into<String>) -> Self {
        Self::GoalCompleted {
            account_id: account_id.into(),
            goal_id: goal_id.into(),
        }
    }

    pub fn milestone_achieved(
        account_id: impl Into<String>,
        goal_id: impl Into<String>,
        percentage: i32,
    ) -> Self {
        Self::MilestoneAchieved {
            account_id: account_id.into(),
            goal_id: goal_id.into(),
            percentage,
        }
    }

    pub fn shield_awarded(
        account_id: impl Into<String>,
        source: ShieldSource,
        balance: i32,
    ) -> Self {
        Self::ShieldAwarded {
            account_id: account_id.into(),
            source,
            balance,
        }
    }

    pub fn shield_consumed(account_id: impl Into<String>, date: NaiveDate, balance: i32) -> Self {
        Self::ShieldConsumed {
            account_id: account_id.into(),
            date,
            balance,
        }
    }

    pub fn streak_reset(account_id: impl Into<String>) -> Self {
        Self::StreakReset {
            account_id: account_id.into(),
        }
    }

    pub fn goals_rebalanced(
        account_id: impl Into<String>,
        locked_goal_ids: Vec<String>,
        unlocked_goal_ids: Vec<String>,
    ) -> Self {
        Self::GoalsRebalanced {
            account_id: account_id.into(),
            locked_goal_ids,
            unlocked_goal_ids,
        }
    }
}
