//! Entitlements module - subscription-derived limits consumed from billing.

mod entitlements_model;
mod entitlements_traits;

pub use entitlements_model::Entitlements;
pub use entitlements_traits::{EntitlementsProviderTrait, StaticEntitlementsProvider};
