//! Goal domain models.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::{Result, ValidationError};

/// Parses a free-form numeric string, falling back to zero.
///
/// Goal targets are historically stored as free-form strings, so a bad value
/// must degrade (logged) rather than fail a read path.
pub fn parse_decimal_string_tolerant(value_str: &str, field_name: &str) -> Decimal {
    match Decimal::from_str(value_str) {
        Ok(d) => d,
        Err(e_decimal) => match Decimal::from_scientific(value_str) {
            Ok(d) => d,
            Err(e_scientific) => {
                log::error!(
                    "Failed to parse {} '{}': as Decimal (err: {}), and as scientific (err: {}). Falling back to ZERO.",
                    field_name, value_str, e_decimal, e_scientific
                );
                Decimal::ZERO
            }
        },
    }
}

/// Lifecycle status of a goal.
///
/// LOCKED is special: it is entered and left only through the capacity lock
/// manager, which stashes the prior status in `previous_status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GoalStatus {
    #[default]
    Active,
    Completed,
    Paused,
    Abandoned,
    Locked,
}

impl GoalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalStatus::Active => "ACTIVE",
            GoalStatus::Completed => "COMPLETED",
            GoalStatus::Paused => "PAUSED",
            GoalStatus::Abandoned => "ABANDONED",
            GoalStatus::Locked => "LOCKED",
        }
    }

    pub fn parse(value: &str) -> Option<GoalStatus> {
        match value {
            "ACTIVE" => Some(GoalStatus::Active),
            "COMPLETED" => Some(GoalStatus::Completed),
            "PAUSED" => Some(GoalStatus::Paused),
            "ABANDONED" => Some(GoalStatus::Abandoned),
            "LOCKED" => Some(GoalStatus::Locked),
            _ => None,
        }
    }
}

/// Domain model representing a goal.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub account_id: String,
    pub title: String,
    pub description: Option<String>,
    /// Free-form numeric string; parse with [`parse_decimal_string_tolerant`].
    pub target_value: String,
    pub unit: String,
    /// Derived: always the sum of the goal's progress entries. Clients never
    /// set this directly.
    pub current_progress: Decimal,
    pub status: GoalStatus,
    /// Non-null exactly while `status == Locked`.
    pub previous_status: Option<GoalStatus>,
    pub start_date: Option<NaiveDate>,
    pub target_date: Option<NaiveDate>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Goal {
    /// The goal's parsed target, zero when unparseable or unset.
    pub fn parsed_target(&self) -> Decimal {
        parse_decimal_string_tolerant(&self.target_value, "target_value")
    }
}

/// Input model for creating a new goal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGoal {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub account_id: String,
    pub title: String,
    pub description: Option<String>,
    pub target_value: String,
    pub unit: String,
    pub start_date: Option<NaiveDate>,
    pub target_date: Option<NaiveDate>,
}

impl NewGoal {
    /// Validates the new goal data.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::MissingField("title".to_string()).into());
        }
        if self.account_id.trim().is_empty() {
            return Err(ValidationError::MissingField("accountId".to_string()).into());
        }
        Ok(())
    }
}

/// Caller-editable fields of a goal. `current_progress` and the lock pair are
/// deliberately absent: the former is derived, the latter belongs to the
/// capacity lock manager.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalUpdate {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub target_value: String,
    pub unit: String,
    pub status: GoalStatus,
    pub start_date: Option<NaiveDate>,
    pub target_date: Option<NaiveDate>,
}
