//! Streak domain models and the pure counter transition.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{Result, ValidationError};

/// Outcome of a task for one day, as reported by the task collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompletionStatus {
    Completed,
    Partial,
    Missed,
    Rescheduled,
    Pending,
}

impl CompletionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompletionStatus::Completed => "COMPLETED",
            CompletionStatus::Partial => "PARTIAL",
            CompletionStatus::Missed => "MISSED",
            CompletionStatus::Rescheduled => "RESCHEDULED",
            CompletionStatus::Pending => "PENDING",
        }
    }

    pub fn parse(value: &str) -> Option<CompletionStatus> {
        match value {
            "COMPLETED" => Some(CompletionStatus::Completed),
            "PARTIAL" => Some(CompletionStatus::Partial),
            "MISSED" => Some(CompletionStatus::Missed),
            "RESCHEDULED" => Some(CompletionStatus::Rescheduled),
            "PENDING" => Some(CompletionStatus::Pending),
            _ => None,
        }
    }

    /// Whether this status counts as real activity for streak purposes.
    pub fn is_activity(&self) -> bool {
        matches!(self, CompletionStatus::Completed | CompletionStatus::Partial)
    }
}

/// Granularity of a streak record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StreakLevel {
    Account,
    Goal,
    Task,
}

/// Identifies exactly one streak record.
///
/// The discriminator is the (goal, task) pair: both unset is the account
/// level, goal alone is the goal level, and a set task is the task level
/// (carrying its owning goal when it has one).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakKey {
    pub account_id: String,
    pub goal_id: Option<String>,
    pub task_id: Option<String>,
}

impl StreakKey {
    pub fn account(account_id: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            goal_id: None,
            task_id: None,
        }
    }

    pub fn goal(account_id: impl Into<String>, goal_id: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            goal_id: Some(goal_id.into()),
            task_id: None,
        }
    }

    pub fn task(
        account_id: impl Into<String>,
        goal_id: Option<String>,
        task_id: impl Into<String>,
    ) -> Self {
        Self {
            account_id: account_id.into(),
            goal_id,
            task_id: Some(task_id.into()),
        }
    }

    /// Builds a key from a requested level, validating the discriminator.
    pub fn for_level(
        level: StreakLevel,
        account_id: &str,
        goal_id: Option<&str>,
        task_id: Option<&str>,
    ) -> Result<Self> {
        match level {
            StreakLevel::Account => Ok(Self::account(account_id)),
            StreakLevel::Goal => {
                let goal_id = goal_id.ok_or_else(|| {
                    ValidationError::MissingField("goalId".to_string())
                })?;
                Ok(Self::goal(account_id, goal_id))
            }
            StreakLevel::Task => {
                let task_id = task_id.ok_or_else(|| {
                    ValidationError::MissingField("taskId".to_string())
                })?;
                Ok(Self::task(
                    account_id,
                    goal_id.map(|g| g.to_string()),
                    task_id,
                ))
            }
        }
    }

    pub fn level(&self) -> StreakLevel {
        if self.task_id.is_some() {
            StreakLevel::Task
        } else if self.goal_id.is_some() {
            StreakLevel::Goal
        } else {
            StreakLevel::Account
        }
    }
}

/// One streak record: integer counters only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakInfo {
    pub id: String,
    pub account_id: String,
    pub goal_id: Option<String>,
    pub task_id: Option<String>,
    /// Consecutive periods with at least PARTIAL-or-better activity.
    pub current_maintained_streak: i32,
    pub best_maintained_streak: i32,
    /// Consecutive periods with COMPLETED-only activity.
    pub current_perfect_streak: i32,
    pub best_perfect_streak: i32,
    pub last_updated_at: NaiveDateTime,
}

impl StreakInfo {
    /// Zero-valued record for a key with no stored state yet. Queries return
    /// this instead of an absence, so callers never branch on missing
    /// records.
    pub fn zero(key: &StreakKey, now: NaiveDateTime) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            account_id: key.account_id.clone(),
            goal_id: key.goal_id.clone(),
            task_id: key.task_id.clone(),
            current_maintained_streak: 0,
            best_maintained_streak: 0,
            current_perfect_streak: 0,
            best_perfect_streak: 0,
            last_updated_at: now,
        }
    }

    pub fn key(&self) -> StreakKey {
        StreakKey {
            account_id: self.account_id.clone(),
            goal_id: self.goal_id.clone(),
            task_id: self.task_id.clone(),
        }
    }
}

/// Applies one completion status to a streak record.
///
/// COMPLETED advances both counters, PARTIAL keeps the maintained streak
/// alive but breaks the perfect one, MISSED breaks both, and
/// RESCHEDULED/PENDING change nothing. Best-ever counters track the maxima.
pub fn apply_status(info: &mut StreakInfo, status: CompletionStatus, now: NaiveDateTime) {
    match status {
        CompletionStatus::Completed => {
            info.current_maintained_streak += 1;
            info.current_perfect_streak += 1;
        }
        CompletionStatus::Partial => {
            info.current_maintained_streak += 1;
            info.current_perfect_streak = 0;
        }
        CompletionStatus::Missed => {
            info.current_maintained_streak = 0;
            info.current_perfect_streak = 0;
        }
        CompletionStatus::Rescheduled | CompletionStatus::Pending => {}
    }
    info.best_maintained_streak = info.best_maintained_streak.max(info.current_maintained_streak);
    info.best_perfect_streak = info.best_perfect_streak.max(info.current_perfect_streak);
    info.last_updated_at = now;
}

/// What end-of-day processing decided for an account and date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EndOfDayOutcome {
    /// Real activity was found; the maintained streak advanced.
    Advanced,
    /// No real activity, but a journaled day and an available shield.
    ShieldConsumed,
    /// Nothing protected the day; the streak fell back to zero.
    StreakReset,
    /// Nothing to do (no activity and the streak was already zero).
    Unchanged,
}
