//! SQLite storage implementation for tasks and completions.

mod model;
mod repository;

pub use model::{TaskCompletionDB, TaskDB};
pub use repository::TaskRepository;
