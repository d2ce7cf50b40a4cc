//! Quota gate
//!
//! Admission control for posts. Each identity gets [`MESSAGE_QUOTA`] posts
//! for the lifetime of the process; there is no replenishment.

use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, warn};

use super::registry::IdentityRegistry;
use super::types::{Admission, Identity, MESSAGE_QUOTA};

/// Per-identity post quota enforcement
pub struct QuotaGate {
    registry: Arc<IdentityRegistry>,
}

impl QuotaGate {
    /// Create a gate over the given registry
    pub fn new(registry: Arc<IdentityRegistry>) -> Self {
        Self { registry }
    }

    /// Posts left for an identity. Unknown identities have full quota.
    pub async fn remaining(&self, identity: &Identity) -> u32 {
        match self.registry.record(identity).await {
            Some(record) => record.remaining(),
            None => MESSAGE_QUOTA,
        }
    }

    /// Check and consume one unit of quota.
    ///
    /// The check and the increment happen under a single registry write
    /// lock, so concurrent posts by one identity can never both take the
    /// last slot. Returns `None` for identities the registry never minted.
    pub async fn try_consume(&self, identity: &Identity) -> Option<Admission> {
        let admission = self
            .registry
            .with_record_mut(identity, |record| {
                if record.is_exhausted() {
                    return Admission {
                        admitted: false,
                        remaining_after: 0,
                    };
                }

                record.messages_posted += 1;
                record.last_active = Utc::now();

                Admission {
                    admitted: true,
                    remaining_after: record.remaining(),
                }
            })
            .await;

        match admission {
            Some(admission) if admission.admitted => debug!(
                "Admitted post for {} ({} remaining)",
                identity, admission.remaining_after
            ),
            Some(_) => warn!(
                "Message quota exceeded for {} ({} posts)",
                identity, MESSAGE_QUOTA
            ),
            None => warn!("Refused post from unknown identity {}", identity),
        }

        admission
    }
}
