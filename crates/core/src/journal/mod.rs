//! Journal module - daily entries that can earn and carry streak shields.

mod journal_model;
mod journal_service;
mod journal_traits;


pub use journal_model::{JournalEntry, NewJournalEntry};
pub use journal_service::JournalService;
pub use journal_traits::{JournalRepositoryTrait, JournalServiceTrait};
