//! Identity registry
//!
//! Maps anonymous session tokens to their quota records. Identities are
//! minted here and nowhere else; records are never removed.

use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

use super::types::{Identity, Resolved, SessionRecord};

/// Registry of anonymous identities and their session records
pub struct IdentityRegistry {
    records: RwLock<HashMap<Identity, SessionRecord>>,
}

impl IdentityRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    /// Resolve a client token, minting a new identity when it is absent or
    /// unknown.
    ///
    /// Resolving a known token has no side effect.
    pub async fn resolve(&self, token: Option<&str>) -> Resolved {
        let token = token.map(str::trim).filter(|t| !t.is_empty());

        if let Some(token) = token {
            let records = self.records.read().await;
            let key = Identity::from_known(token);
            if records.contains_key(&key) {
                return Resolved {
                    identity: key,
                    is_new: false,
                };
            }
        }

        // Re-check under the write lock; the read guard was released above
        let mut records = self.records.write().await;
        if let Some(token) = token {
            let key = Identity::from_known(token);
            if records.contains_key(&key) {
                return Resolved {
                    identity: key,
                    is_new: false,
                };
            }
        }

        let identity = Identity::mint();
        records.insert(identity.clone(), SessionRecord::new(identity.clone()));
        debug!("Minted anonymous identity {}", identity);

        Resolved {
            identity,
            is_new: true,
        }
    }

    /// Snapshot of an identity's record
    pub async fn record(&self, identity: &Identity) -> Option<SessionRecord> {
        let records = self.records.read().await;
        records.get(identity).cloned()
    }

    /// Number of known identities
    pub async fn len(&self) -> usize {
        let records = self.records.read().await;
        records.len()
    }

    /// Check if no identity has been minted yet
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Run `f` on an identity's record while holding the write lock.
    ///
    /// Returns `None` for identities this registry never minted; no record
    /// is created here.
    pub(crate) async fn with_record_mut<R>(
        &self,
        identity: &Identity,
        f: impl FnOnce(&mut SessionRecord) -> R,
    ) -> Option<R> {
        let mut records = self.records.write().await;
        records.get_mut(identity).map(f)
    }
}

impl Default for IdentityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_resolve_without_token_mints() {
        let registry = IdentityRegistry::new();
        assert!(registry.is_empty().await);

        let resolved = registry.resolve(None).await;
        assert!(resolved.is_new);
        assert_eq!(registry.len().await, 1);

        let record = registry.record(&resolved.identity).await.unwrap();
        assert_eq!(record.messages_posted, 0);
    }

    #[tokio::test]
    async fn test_resolve_known_token_is_idempotent() {
        let registry = IdentityRegistry::new();
        let first = registry.resolve(None).await;

        let again = registry.resolve(Some(first.identity.as_str())).await;
        assert!(!again.is_new);
        assert_eq!(again.identity, first.identity);

        let third = registry.resolve(Some(first.identity.as_str())).await;
        assert_eq!(third.identity, first.identity);
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn test_resolve_unknown_token_mints_fresh() {
        let registry = IdentityRegistry::new();

        let resolved = registry.resolve(Some("forged-token")).await;
        assert!(resolved.is_new);
        assert_ne!(resolved.identity.as_str(), "forged-token");
    }

    #[tokio::test]
    async fn test_resolve_blank_token_mints() {
        let registry = IdentityRegistry::new();
        let resolved = registry.resolve(Some("   ")).await;
        assert!(resolved.is_new);
    }

    #[tokio::test]
    async fn test_system_token_is_not_resolvable() {
        let registry = IdentityRegistry::new();
        let resolved = registry.resolve(Some("system")).await;
        assert!(resolved.is_new);
        assert!(!resolved.identity.is_system());
    }

    #[tokio::test]
    async fn test_with_record_mut_updates_minted_record() {
        let registry = IdentityRegistry::new();
        let identity = registry.resolve(None).await.identity;

        let posted = registry
            .with_record_mut(&identity, |record| {
                record.messages_posted += 1;
                record.messages_posted
            })
            .await;

        assert_eq!(posted, Some(1));
        assert_eq!(registry.record(&identity).await.unwrap().messages_posted, 1);
    }

    #[tokio::test]
    async fn test_with_record_mut_skips_unknown_identity() {
        let registry = IdentityRegistry::new();
        let stranger = Identity::mint();

        let touched = registry.with_record_mut(&stranger, |_| ()).await;

        assert!(touched.is_none());
        assert!(registry.record(&stranger).await.is_none());
        assert!(registry.is_empty().await);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_first_contact_mints_distinct_identities() {
        let registry = Arc::new(IdentityRegistry::new());

        let mut handles = Vec::new();
        for _ in 0..32 {
            let registry = Arc::clone(&registry);
            handles.push(tokio::spawn(async move { registry.resolve(None).await }));
        }

        let mut seen = HashSet::new();
        for handle in handles {
            let resolved = handle.await.unwrap();
            assert!(resolved.is_new);
            seen.insert(resolved.identity);
        }

        assert_eq!(seen.len(), 32);
        assert_eq!(registry.len().await, 32);
    }
}
