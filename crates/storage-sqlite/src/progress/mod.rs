//! SQLite storage implementation for the progress ledger.

mod model;
mod repository;

pub use model::ProgressEntryDB;
pub use repository::ProgressRepository;
