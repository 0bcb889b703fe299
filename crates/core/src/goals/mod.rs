//! Goals module - domain models, service, and traits.

mod goals_model;
mod goals_service;
mod goals_traits;


pub use goals_model::{parse_decimal_string_tolerant, Goal, GoalStatus, GoalUpdate, NewGoal};
pub use goals_service::GoalService;
pub use goals_traits::{GoalRepositoryTrait, GoalServiceTrait};
