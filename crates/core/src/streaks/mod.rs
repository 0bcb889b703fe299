//! Streaks module - three-level streak counters, shields, and replay.
//!
//! One completion event fans out to three records (task, owning goal,
//! account) through a single pure transition function. The account-level
//! record additionally participates in end-of-day processing, where a shield
//! can stand in for a day without real activity.

mod streaks_engine;
mod streaks_model;
mod streaks_service;
mod streaks_traits;

#[cfg(test)]
mod streaks_service_tests;

pub use streaks_engine::{
    apply_completion_in_tx, award_shields_in_tx, try_award_journal_shield_in_tx,
};
pub use streaks_model::{
    apply_status, CompletionStatus, EndOfDayOutcome, StreakInfo, StreakKey, StreakLevel,
};
pub use streaks_service::StreakService;
pub use streaks_traits::{StreakRepositoryTrait, StreakServiceTrait};
