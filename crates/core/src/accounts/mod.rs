//! Accounts module - domain model and repository trait.
//!
//! Account identity and sessions live with the auth collaborator; what this
//! crate owns is the per-account gamification state: the shield inventory and
//! the last-activity anchor used by the incremental streak path.

mod accounts_model;
mod accounts_traits;

pub use accounts_model::{Account, NewAccount};
pub use accounts_traits::AccountRepositoryTrait;
