//! Session store
//!
//! Single access surface over the identity registry, the quota gate and
//! the message feed. Constructed once at startup and shared by handle.

use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info};

use super::feed::MessageFeed;
use super::quota::QuotaGate;
use super::registry::IdentityRegistry;
use super::types::{Identity, Message, Resolved};
use crate::error::PostRejection;

/// Text of the message seeded into every new feed
pub const WELCOME_MESSAGE: &str = "Welcome to ShadowSpeak! Share your thoughts anonymously.";

/// An accepted post
#[derive(Debug, Clone, PartialEq)]
pub struct Posted {
    pub message: Message,
    pub remaining_after: u32,
}

/// What a page view needs to know about the visitor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub identity: Identity,
    pub is_new: bool,
    pub remaining: u32,
}

/// Outcome of a post request, with the identity it was resolved to
#[derive(Debug, Clone, PartialEq)]
pub struct PostReceipt {
    pub identity: Identity,
    pub is_new: bool,
    pub outcome: Result<Posted, PostRejection>,
}

/// Store counters for health reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    pub sessions: usize,
    pub messages: usize,
}

/// Session-scoped, quota-limited message store
pub struct SessionStore {
    registry: Arc<IdentityRegistry>,
    quota: QuotaGate,
    feed: MessageFeed,
}

impl SessionStore {
    /// Create a store whose feed holds only the system welcome message
    pub async fn new() -> Self {
        let registry = Arc::new(IdentityRegistry::new());
        let quota = QuotaGate::new(Arc::clone(&registry));
        let feed = MessageFeed::new();

        // The system author bypasses the quota gate entirely
        if let Err(e) = feed.append(WELCOME_MESSAGE, &Identity::system()).await {
            error!("Failed to seed welcome message: {}", e);
        }
        info!("Session store initialized");

        Self {
            registry,
            quota,
            feed,
        }
    }

    /// Resolve a client token, minting a new identity when needed.
    ///
    /// Returns the identity and whether it was just created.
    pub async fn resolve_or_create_identity(&self, token: Option<&str>) -> (Identity, bool) {
        let Resolved { identity, is_new } = self.registry.resolve(token).await;
        (identity, is_new)
    }

    /// Posts left for an identity
    pub async fn remaining_quota(&self, identity: &Identity) -> u32 {
        self.quota.remaining(identity).await
    }

    /// The whole feed, oldest first
    pub async fn list_messages(&self) -> Vec<Message> {
        self.feed.snapshot().await
    }

    /// Post a message as `identity`.
    ///
    /// Quota is checked and consumed before content is validated. A post
    /// rejected for empty content still uses up its unit of quota.
    /// Identities this store never minted are refused without creating a
    /// session.
    pub async fn post_message(
        &self,
        identity: &Identity,
        content: &str,
    ) -> Result<Posted, PostRejection> {
        let Some(admission) = self.quota.try_consume(identity).await else {
            return Err(PostRejection::UnknownIdentity);
        };
        if !admission.admitted {
            return Err(PostRejection::QuotaExceeded);
        }

        let message = self.feed.append(content, identity).await?;
        debug!("Accepted message {} from {}", message.id, identity);

        Ok(Posted {
            message,
            remaining_after: admission.remaining_after,
        })
    }

    /// Resolve the visitor and report their remaining quota
    pub async fn handle_view(&self, token: Option<&str>) -> View {
        let (identity, is_new) = self.resolve_or_create_identity(token).await;
        let remaining = self.remaining_quota(&identity).await;

        View {
            identity,
            is_new,
            remaining,
        }
    }

    /// Resolve the poster and attempt the post
    pub async fn handle_post(&self, token: Option<&str>, content: &str) -> PostReceipt {
        let (identity, is_new) = self.resolve_or_create_identity(token).await;
        let outcome = self.post_message(&identity, content).await;

        PostReceipt {
            identity,
            is_new,
            outcome,
        }
    }

    /// Current number of sessions and messages
    pub async fn stats(&self) -> StoreStats {
        StoreStats {
            sessions: self.registry.len().await,
            messages: self.feed.len().await,
        }
    }
}
