//! SQLite storage implementation for streak records.

mod model;
mod repository;

pub use model::StreakInfoDB;
pub use repository::StreakRepository;
