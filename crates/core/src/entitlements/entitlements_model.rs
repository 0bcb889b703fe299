//! Entitlement value objects.

use serde::{Deserialize, Serialize};

use crate::constants::FREE_TIER_MAX_ACTIVE_GOALS;

/// Subscription-derived limits for one account, supplied by the billing
/// collaborator. Read-only to this crate and never persisted here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entitlements {
    pub is_premium: bool,
    pub max_active_goals: i32,
}

impl Default for Entitlements {
    /// Free tier. Used whenever the billing collaborator has no record for an
    /// account, so callers never branch on a missing entitlement.
    fn default() -> Self {
        Entitlements {
            is_premium: false,
            max_active_goals: FREE_TIER_MAX_ACTIVE_GOALS,
        }
    }
}
