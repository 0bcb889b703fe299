//! Tasks module - recurring tasks and their dated completions.
//!
//! Completions are the streak engine's primary input: recording one fans out
//! a counter transition to the task, its owning goal, and the account.

mod tasks_model;
mod tasks_service;
mod tasks_traits;


pub use tasks_model::{NewTask, NewTaskCompletion, Task, TaskCompletion};
pub use tasks_service::TaskService;
pub use tasks_traits::{TaskRepositoryTrait, TaskServiceTrait};
