//! Progress ledger models and the percentage math.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::constants::PERCENTAGE_DECIMAL_PRECISION;
use crate::goals::parse_decimal_string_tolerant;

/// One timestamped delta in a goal's ledger. Mutable and deletable; every
/// mutation triggers a full recompute of the owning goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEntry {
    pub id: String,
    pub goal_id: String,
    pub value: Decimal,
    pub note: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl ProgressEntry {
    /// The civil date this entry counts toward for streak purposes.
    pub fn logged_on(&self) -> NaiveDate {
        self.created_at.date()
    }
}

/// Input model for appending a ledger entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProgressEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub goal_id: String,
    pub value: Decimal,
    pub note: Option<String>,
}

/// Editable fields of a ledger entry. `None` leaves a field unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEntryUpdate {
    pub id: String,
    pub value: Option<Decimal>,
    pub note: Option<String>,
}

/// The ledger fold: cumulative progress is always this sum, never an
/// incrementally patched number.
pub fn sum_entries(entries: &[ProgressEntry]) -> Decimal {
    entries.iter().map(|e| e.value).sum()
}

/// Percentage of target, rounded half-up to two decimal places.
///
/// Targets are free-form numeric strings historically, so a zero or
/// unparseable target degrades to a zero percentage instead of failing the
/// caller.
pub fn percentage_of_target(current: Decimal, target_value: &str) -> Decimal {
    let target = parse_decimal_string_tolerant(target_value, "target_value");
    if target <= Decimal::ZERO {
        log::debug!(
            "Non-positive target '{}', reporting zero percentage",
            target_value
        );
        return Decimal::ZERO;
    }
    (current / target * Decimal::ONE_HUNDRED).round_dp_with_strategy(
        PERCENTAGE_DECIMAL_PRECISION,
        RoundingStrategy::MidpointAwayFromZero,
    )
}
