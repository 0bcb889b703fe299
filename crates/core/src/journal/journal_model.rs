//! Journal domain models.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::errors::{Result, ValidationError};

/// A dated journal entry.
///
/// `shield_protected` is set by end-of-day processing when a shield was spent
/// to cover this day; the flag doubles as the per-week shield usage counter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    pub id: String,
    pub account_id: String,
    pub entry_date: NaiveDate,
    pub content: String,
    pub shield_protected: bool,
    pub created_at: NaiveDateTime,
}

/// Input model for creating a journal entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJournalEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub account_id: String,
    pub entry_date: NaiveDate,
    pub content: String,
}

impl NewJournalEntry {
    pub fn validate(&self) -> Result<()> {
        if self.content.trim().is_empty() {
            return Err(ValidationError::MissingField("content".to_string()).into());
        }
        Ok(())
    }
}
