//! Capacity module - entitlement-driven goal lock management.
//!
//! Locking is how tier downgrades are enforced without destroying data: an
//! over-quota goal is parked in LOCKED with its prior status preserved, and
//! restored verbatim when room frees up or the account upgrades.

mod capacity_service;
mod capacity_traits;


pub use capacity_service::CapacityLockService;
pub use capacity_traits::CapacityServiceTrait;
