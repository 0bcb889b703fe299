//! Progress module - the append-and-recompute ledger behind every goal.

mod progress_model;
mod progress_service;
mod progress_traits;


pub use progress_model::{
    percentage_of_target, sum_entries, NewProgressEntry, ProgressEntry, ProgressEntryUpdate,
};
pub use progress_service::ProgressService;
pub use progress_traits::{ProgressRepositoryTrait, ProgressServiceTrait};
