//! Milestone domain models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A fixed percentage threshold on a goal whose achievement state is derived
/// from the goal's progress, never set directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub id: String,
    pub goal_id: String,
    /// Integer percentage threshold; unique per goal.
    pub percentage: i32,
    pub description: String,
    pub achieved: bool,
    /// Set when achieved; cleared (and lost) if a later edit drops the goal
    /// back under the threshold.
    pub achieved_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

/// Input model for creating a milestone.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMilestone {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub goal_id: String,
    pub percentage: i32,
    pub description: Option<String>,
}

impl NewMilestone {
    /// Default description when the caller provides none.
    pub fn description_or_default(&self) -> String {
        self.description
            .clone()
            .unwrap_or_else(|| format!("Reached {}% of your goal", self.percentage))
    }
}
