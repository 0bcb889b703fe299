use std::collections::HashMap;
use std::sync::RwLock;

use crate::errors::Result;

use super::Entitlements;

/// Boundary to the billing collaborator.
///
/// Implementations may call out to a subscription backend; the capacity lock
/// manager absorbs failures by falling back to the free tier.
pub trait EntitlementsProviderTrait: Send + Sync {
    fn get_entitlements(&self, account_id: &str) -> Result<Entitlements>;
}

/// In-process provider backed by a fixed map, with a configurable fallback.
///
/// Used in tests and in deployments where tier data is pushed into the
/// process rather than queried per request.
#[derive(Default)]
pub struct StaticEntitlementsProvider {
    by_account: RwLock<HashMap<String, Entitlements>>,
    fallback: Entitlements,
}

impl StaticEntitlementsProvider {
    pub fn new(fallback: Entitlements) -> Self {
        Self {
            by_account: RwLock::new(HashMap::new()),
            fallback,
        }
    }

    pub fn set(&self, account_id: &str, entitlements: Entitlements) {
        self.by_account
            .write()
            .unwrap()
            .insert(account_id.to_string(), entitlements);
    }
}

impl EntitlementsProviderTrait for StaticEntitlementsProvider {
    fn get_entitlements(&self, account_id: &str) -> Result<Entitlements> {
        Ok(self
            .by_account
            .read()
            .unwrap()
            .get(account_id)
            .copied()
            .unwrap_or(self.fallback))
    }
}
