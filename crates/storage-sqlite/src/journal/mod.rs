//! SQLite storage implementation for journal entries.

mod model;
mod repository;

pub use model::JournalEntryDB;
pub use repository::JournalRepository;
